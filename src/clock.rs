use crate::pins::{Level, PinMode, Pins};
use spin_sleep::SpinSleeper;
use std::time::Duration;

/// Generates the CPU's clock: one low-then-high pulse per bus cycle, with a
/// runtime-tunable half-period. The only constraint on the half-period is
/// staying within the attached CPU's minimum cycle time.
pub struct Clock {
    pin: u8,
    half_period: Duration,
    sleeper: SpinSleeper,
}

impl Clock {
    pub fn new(pin: u8, half_period: Duration, pins: &mut dyn Pins) -> Self {
        pins.set_mode(pin, PinMode::Output);
        Clock {
            pin,
            half_period,
            sleeper: SpinSleeper::default(),
        }
    }

    /// retune on the fly, e.g. from a speed control read each cycle
    pub fn set_half_period(&mut self, half_period: Duration) {
        self.half_period = half_period;
    }

    /// one bus cycle: low phase, the `mid` step, high phase. The CPU moves
    /// its R/W line during the low phase, so `mid` is where the bus
    /// direction gets re-evaluated.
    pub fn pulse(&self, pins: &mut dyn Pins, mid: impl FnOnce(&mut dyn Pins)) {
        pins.write(self.pin, Level::Low);
        self.sleeper.sleep(self.half_period);
        mid(pins);
        pins.write(self.pin, Level::High);
        self.sleeper.sleep(self.half_period);
    }
}
