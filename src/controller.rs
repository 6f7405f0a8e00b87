use crate::bus::{BusSampler, Direction};
use crate::clock::Clock;
use crate::memory::AddressSpace;
use crate::pins::{PinMap, Pins};
use crate::terminal::Terminal;
use std::io;
use std::time::Duration;

/// Ties the pieces together. One `step` is one bus cycle of the attached
/// CPU: pulse the clock (re-evaluating direction between the phases), sample
/// the address, dispatch a read or write if anything changed, then poll the
/// keyboard. Everything runs on the caller's thread; nothing blocks.
pub struct BusController<P: Pins, T: Terminal> {
    clock: Clock,
    sampler: BusSampler,
    space: AddressSpace,
    pins: P,
    terminal: T,
    last: Option<(u16, Direction)>,
}

impl<P: Pins, T: Terminal> BusController<P, T> {
    pub fn new(
        map: PinMap,
        half_period: Duration,
        space: AddressSpace,
        mut pins: P,
        terminal: T,
    ) -> Self {
        let clock = Clock::new(map.clock, half_period, &mut pins);
        let sampler = BusSampler::new(map, &mut pins);
        BusController {
            clock,
            sampler,
            space,
            pins,
            terminal,
            last: None,
        }
    }

    /// one full bus cycle
    pub fn step(&mut self) -> Result<(), io::Error> {
        self.clock
            .pulse(&mut self.pins, |p| self.sampler.update_direction(p));

        let addr = self.sampler.sample_address(&self.pins);
        let direction = self.sampler.direction();

        // an unchanged (address, direction) pair means the CPU is still in
        // the same access; dispatching again would repeat side effects
        if self.last != Some((addr, direction)) {
            match direction {
                Direction::CpuRead => {
                    let byte = self.space.read(addr);
                    self.sampler.drive_data(&mut self.pins, byte);
                }
                Direction::CpuWrite => {
                    let byte = self.sampler.read_data(&self.pins);
                    self.space.write(addr, byte, &mut self.terminal)?;
                }
            }
            self.last = Some((addr, direction));
        }

        // strictly after dispatch, so a fresh keystroke becomes visible to
        // the CPU no earlier than the next cycle
        if let Some(byte) = self.terminal.poll()? {
            self.space.pia.accept_key(byte);
        }
        Ok(())
    }

    /// run the bus for `cycles` cycles
    pub fn main_loop(&mut self, cycles: u64) -> Result<(), io::Error> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pia;
    use crate::pins::{Level, SimPins};
    use crate::terminal::DummyTerminal;

    fn controller(
        space: AddressSpace,
        pins: SimPins,
        terminal: DummyTerminal,
    ) -> BusController<SimPins, DummyTerminal> {
        BusController::new(PinMap::default(), Duration::ZERO, space, pins, terminal)
    }

    #[test]
    fn test_read_cycle_drives_rom_byte() {
        let map = PinMap::default();
        let mut pins = SimPins::new();
        let mut space = AddressSpace::new();
        let mut image: &[u8] = &[0xa9, 0x09];
        space.load_rom(&mut image).unwrap();

        pins.drive_address(&map, 0xff01);
        pins.drive_rw(&map, Level::High);
        let mut ctl = controller(space, pins, DummyTerminal::new(&[]));
        ctl.step().unwrap();
        assert_eq!(ctl.pins.data_byte(&map), 0x09);
    }

    #[test]
    fn test_write_cycle_stores_to_ram() {
        let map = PinMap::default();
        let mut pins = SimPins::new();

        pins.drive_address(&map, 0x0010);
        pins.drive_rw(&map, Level::Low);
        pins.drive_data(&map, 0x42);
        let mut ctl = controller(AddressSpace::new(), pins, DummyTerminal::new(&[]));
        ctl.step().unwrap();
        assert_eq!(ctl.space.read(0x0010), 0x42);
    }

    #[test]
    fn test_redundant_cycles_are_suppressed() {
        let map = PinMap::default();
        let mut pins = SimPins::new();

        // CPU holds a display write across three cycles
        pins.drive_address(&map, pia::DSP_ADDR);
        pins.drive_rw(&map, Level::Low);
        pins.drive_data(&map, b'A');
        let mut ctl = controller(AddressSpace::new(), pins, DummyTerminal::new(&[]));
        ctl.main_loop(3).unwrap();
        assert_eq!(ctl.terminal.sent(), &[b'A']);
    }

    #[test]
    fn test_address_change_dispatches_again() {
        let map = PinMap::default();
        let mut pins = SimPins::new();

        pins.drive_address(&map, pia::DSP_ADDR);
        pins.drive_rw(&map, Level::Low);
        pins.drive_data(&map, b'H');
        let mut ctl = controller(AddressSpace::new(), pins, DummyTerminal::new(&[]));
        ctl.step().unwrap();
        // CPU touches another address, then writes the display again
        ctl.pins.drive_address(&map, pia::DSP_CR_ADDR);
        ctl.step().unwrap();
        ctl.pins.drive_address(&map, pia::DSP_ADDR);
        ctl.pins.drive_data(&map, b'I');
        ctl.step().unwrap();
        assert_eq!(ctl.terminal.sent(), &[b'H', b'I']);
    }

    #[test]
    fn test_keystroke_lands_after_dispatch() {
        let map = PinMap::default();
        let mut pins = SimPins::new();

        // CPU reads the keyboard register on the very cycle the key arrives
        pins.drive_address(&map, pia::KBD_ADDR);
        pins.drive_rw(&map, Level::High);
        let mut ctl = controller(
            AddressSpace::new(),
            pins,
            DummyTerminal::new(&[b'x']),
        );
        ctl.step().unwrap();
        // too late for this cycle: the bus saw the old (empty) register
        assert_eq!(ctl.pins.data_byte(&map), 0);
        // a fresh access on a later cycle sees it
        ctl.pins.drive_address(&map, pia::KBD_CR_ADDR);
        ctl.step().unwrap();
        assert_eq!(ctl.pins.data_byte(&map), 0x80);
        ctl.pins.drive_address(&map, pia::KBD_ADDR);
        ctl.step().unwrap();
        assert_eq!(ctl.pins.data_byte(&map), b'x' | 0x80);
    }

    #[test]
    fn test_direction_change_alone_redispatches() {
        let map = PinMap::default();
        let mut pins = SimPins::new();

        // write then read back the same RAM address without moving it
        pins.drive_address(&map, 0x0024);
        pins.drive_rw(&map, Level::Low);
        pins.drive_data(&map, 0x7b);
        let mut ctl = controller(AddressSpace::new(), pins, DummyTerminal::new(&[]));
        ctl.step().unwrap();
        // CPU lets go of the data lines and flips to reading
        ctl.pins.drive_data(&map, 0x00);
        ctl.pins.drive_rw(&map, Level::High);
        ctl.step().unwrap();
        assert_eq!(ctl.pins.data_byte(&map), 0x7b);
    }
}
