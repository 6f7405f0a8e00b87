use crate::pins::{Level, PinMap, PinMode, Pins};

/// Which party drives the data bus this cycle, derived from the R/W line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    /// R/W high: the CPU is reading, so we drive the data pins
    CpuRead,
    /// R/W low: the CPU is writing, so we listen
    CpuWrite,
}

/// Samples the address and R/W lines once per cycle and keeps the data pins'
/// electrical direction in step with the CPU.
pub struct BusSampler {
    map: PinMap,
    direction: Direction,
}

impl BusSampler {
    /// configure the bus pins: address and R/W as inputs, data driving,
    /// matching a CPU that comes out of reset with R/W high
    pub fn new(map: PinMap, pins: &mut dyn Pins) -> Self {
        for &pin in &map.address {
            pins.set_mode(pin, PinMode::Input);
        }
        pins.set_mode(map.rw, PinMode::Input);
        for &pin in &map.data {
            pins.set_mode(pin, PinMode::Output);
        }
        BusSampler {
            map,
            direction: Direction::CpuRead,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// assemble the 16 address lines, MSB first
    pub fn sample_address(&self, pins: &dyn Pins) -> u16 {
        let mut addr = 0u16;
        for &pin in self.map.address.iter().rev() {
            addr <<= 1;
            if pins.read(pin) == Level::High {
                addr |= 1;
            }
        }
        addr
    }

    pub fn sample_direction(&self, pins: &dyn Pins) -> Direction {
        match pins.read(self.map.rw) {
            Level::High => Direction::CpuRead,
            Level::Low => Direction::CpuWrite,
        }
    }

    /// flip the data pins between driving and listening, but only on an
    /// observed transition of the R/W line; reconfiguring them every cycle
    /// can glitch the bus
    pub fn update_direction(&mut self, pins: &mut dyn Pins) {
        let sampled = self.sample_direction(pins);
        if sampled == self.direction {
            return;
        }
        self.direction = sampled;
        let mode = match sampled {
            Direction::CpuRead => PinMode::Output,
            Direction::CpuWrite => PinMode::Input,
        };
        for &pin in &self.map.data {
            pins.set_mode(pin, mode);
        }
    }

    /// byte the CPU is driving on the data lines
    pub fn read_data(&self, pins: &dyn Pins) -> u8 {
        let mut byte = 0u8;
        for &pin in self.map.data.iter().rev() {
            byte <<= 1;
            if pins.read(pin) == Level::High {
                byte |= 1;
            }
        }
        byte
    }

    /// put a byte on the data lines for the CPU to read
    pub fn drive_data(&self, pins: &mut dyn Pins, byte: u8) {
        for (bit, &pin) in self.map.data.iter().enumerate() {
            let level = if byte >> bit & 1 == 1 {
                Level::High
            } else {
                Level::Low
            };
            pins.write(pin, level);
        }
    }
}
