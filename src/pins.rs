/// Electrical level on one digital pin.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Low,
    High,
}

/// Electrical direction of one digital pin.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinMode {
    Input,
    Output,
}

/// The capability the bus logic needs from the hardware: read a pin, write a
/// pin, flip a pin between input and output. A port to real hardware
/// implements this over its GPIO; tests use [`SimPins`].
pub trait Pins {
    fn read(&self, pin: u8) -> Level;
    fn write(&mut self, pin: u8, level: Level);
    fn set_mode(&mut self, pin: u8, mode: PinMode);
}

/// Which pin each bus line is wired to. `address[0]` carries A0 and
/// `data[0]` carries D0.
pub struct PinMap {
    pub clock: u8,
    pub rw: u8,
    pub address: [u8; 16],
    pub data: [u8; 8],
}

impl Default for PinMap {
    /// wiring of the original Mega 2560 shim board
    fn default() -> Self {
        PinMap {
            clock: 52,
            rw: 53,
            address: [44, 45, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 46, 47],
            data: [30, 31, 32, 33, 34, 35, 36, 37],
        }
    }
}

/// enough for the Mega's numbering
const SIM_PIN_COUNT: usize = 64;

/// Software-simulated pin bank. Tests (and hardware-less host runs) script
/// the CPU side of the bus with the `drive_*` helpers and read back what the
/// controller drove.
pub struct SimPins {
    levels: [Level; SIM_PIN_COUNT],
    modes: [PinMode; SIM_PIN_COUNT],
}

impl SimPins {
    pub fn new() -> Self {
        SimPins {
            levels: [Level::Low; SIM_PIN_COUNT],
            modes: [PinMode::Input; SIM_PIN_COUNT],
        }
    }

    /// present an address on the address lines, as the CPU would
    pub fn drive_address(&mut self, map: &PinMap, addr: u16) {
        for (bit, &pin) in map.address.iter().enumerate() {
            self.levels[pin as usize] = bit_level(addr >> bit);
        }
    }

    /// present a level on the R/W line
    pub fn drive_rw(&mut self, map: &PinMap, level: Level) {
        self.levels[map.rw as usize] = level;
    }

    /// present a byte on the data lines, as the CPU would when writing
    pub fn drive_data(&mut self, map: &PinMap, byte: u8) {
        for (bit, &pin) in map.data.iter().enumerate() {
            self.levels[pin as usize] = bit_level(u16::from(byte) >> bit);
        }
    }

    /// byte currently on the data lines
    pub fn data_byte(&self, map: &PinMap) -> u8 {
        let mut byte = 0u8;
        for &pin in map.data.iter().rev() {
            byte <<= 1;
            if self.levels[pin as usize] == Level::High {
                byte |= 1;
            }
        }
        byte
    }

    pub fn mode(&self, pin: u8) -> PinMode {
        self.modes[pin as usize]
    }
}

fn bit_level(shifted: u16) -> Level {
    if shifted & 1 == 1 {
        Level::High
    } else {
        Level::Low
    }
}

impl Pins for SimPins {
    fn read(&self, pin: u8) -> Level {
        self.levels[pin as usize]
    }

    fn write(&mut self, pin: u8, level: Level) {
        self.levels[pin as usize] = level;
    }

    fn set_mode(&mut self, pin: u8, mode: PinMode) {
        self.modes[pin as usize] = mode;
    }
}
