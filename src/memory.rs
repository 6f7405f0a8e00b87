use crate::pia::Pia;
use crate::terminal::Terminal;
use std::io;
use std::io::Read;

// NB. addresses are u16 as per the 6502; lengths are usize to stop endless casting

pub const RAM_BANK_SIZE: usize = 4096;
pub const ROM_SIZE: usize = 256;

pub const RAM_BANK2_ADDR: u16 = 0xe000;
pub const ROM_ADDR: u16 = 0xff00;

/// where a sampled address lands, resolved once per cycle
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Target {
    RamBank1,
    RamBank2,
    Rom,
    Peripheral,
    Unmapped,
}

/// route by the address's high nibble, like the decoder on the real board
fn decode(addr: u16) -> Target {
    match addr >> 12 {
        0x0 => Target::RamBank1,
        0xd => Target::Peripheral,
        0xe => Target::RamBank2,
        0xf if addr >= ROM_ADDR => Target::Rom,
        _ => Target::Unmapped,
    }
}

/// Every byte the CPU can address, in one place:
///
///   0x0000-0x0fff  RAM bank 1 (zero page, stack, programs)
///   0xd010-0xd013  PIA registers
///   0xe000-0xefff  RAM bank 2 (a BASIC image goes here)
///   0xff00-0xffff  ROM (the monitor)
///
/// everything else reads 0 and swallows writes.
pub struct AddressSpace {
    ram_bank1: Box<[u8; RAM_BANK_SIZE]>,
    ram_bank2: Box<[u8; RAM_BANK_SIZE]>,
    rom: [u8; ROM_SIZE],
    pub pia: Pia,
}

impl AddressSpace {
    pub fn new() -> Self {
        AddressSpace {
            ram_bank1: Box::new([0u8; RAM_BANK_SIZE]),
            ram_bank2: Box::new([0u8; RAM_BANK_SIZE]),
            rom: [0u8; ROM_SIZE],
            pia: Pia::new(),
        }
    }

    /// handle a cycle where the CPU reads: pick the byte to drive
    pub fn read(&mut self, addr: u16) -> u8 {
        match decode(addr) {
            Target::RamBank1 => self.ram_bank1[addr as usize],
            Target::RamBank2 => self.ram_bank2[(addr - RAM_BANK2_ADDR) as usize],
            Target::Rom => self.rom[(addr - ROM_ADDR) as usize],
            Target::Peripheral => self.pia.read(addr),
            Target::Unmapped => 0,
        }
    }

    /// handle a cycle where the CPU writes `byte` at `addr`
    pub fn write(
        &mut self,
        addr: u16,
        byte: u8,
        terminal: &mut dyn Terminal,
    ) -> Result<(), io::Error> {
        match decode(addr) {
            Target::RamBank1 => self.ram_bank1[addr as usize] = byte,
            Target::RamBank2 => self.ram_bank2[(addr - RAM_BANK2_ADDR) as usize] = byte,
            Target::Peripheral => self.pia.write(addr, byte, terminal)?,
            // ROM is read-only; unmapped is absorbed
            Target::Rom | Target::Unmapped => {}
        }
        Ok(())
    }

    /// seed the monitor ROM; the image may be shorter than the 256-byte
    /// window but never longer
    pub fn load_rom(&mut self, reader: &mut impl Read) -> Result<(), io::Error> {
        let image = read_image(reader, ROM_SIZE)?;
        self.rom[..image.len()].copy_from_slice(&image);
        Ok(())
    }

    /// seed RAM bank 2 from 0xe000 up, e.g. with a BASIC interpreter
    pub fn load_interpreter(&mut self, reader: &mut impl Read) -> Result<(), io::Error> {
        let image = read_image(reader, RAM_BANK_SIZE)?;
        self.ram_bank2[..image.len()].copy_from_slice(&image);
        Ok(())
    }

    /// load a program into RAM bank 1. the first two bytes of the image are
    /// its load address, little-endian like everything 6502
    pub fn load_program(&mut self, reader: &mut impl Read) -> Result<(), io::Error> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        if image.len() < 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "program image has no load address",
            ));
        }
        let addr = u16::from_le_bytes([image[0], image[1]]) as usize;
        let body = &image[2..];
        if addr + body.len() > RAM_BANK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "program does not fit in RAM bank 1",
            ));
        }
        self.ram_bank1[addr..addr + body.len()].copy_from_slice(body);
        Ok(())
    }
}

fn read_image(reader: &mut impl Read, max: usize) -> Result<Vec<u8>, io::Error> {
    let mut image = Vec::new();
    reader.read_to_end(&mut image)?;
    if image.len() > max {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("image is {} bytes; at most {} fit", image.len(), max),
        ));
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pia;
    use crate::terminal::DummyTerminal;

    fn write(space: &mut AddressSpace, addr: u16, byte: u8) {
        let mut term = DummyTerminal::new(&[]);
        space.write(addr, byte, &mut term).unwrap();
    }

    #[test]
    fn test_ram_bank1_round_trip() {
        let mut space = AddressSpace::new();
        write(&mut space, 0x0000, 0xa9);
        write(&mut space, 0x0fff, 0x60);
        assert_eq!(space.read(0x0000), 0xa9);
        assert_eq!(space.read(0x0fff), 0x60);
    }

    #[test]
    fn test_ram_bank2_round_trip() {
        let mut space = AddressSpace::new();
        write(&mut space, 0xe000, 0x12);
        write(&mut space, 0xefff, 0x34);
        assert_eq!(space.read(0xe000), 0x12);
        assert_eq!(space.read(0xefff), 0x34);
    }

    #[test]
    fn test_rom_is_immutable() {
        let mut space = AddressSpace::new();
        let mut image: &[u8] = &[0xd8, 0x58];
        space.load_rom(&mut image).unwrap();
        write(&mut space, 0xff00, 0xee);
        assert_eq!(space.read(0xff00), 0xd8);
        assert_eq!(space.read(0xff01), 0x58);
    }

    #[test]
    fn test_bank_boundary_is_unmapped() {
        let mut space = AddressSpace::new();
        write(&mut space, 0x0fff, 0x77);
        write(&mut space, 0x1000, 0xee);
        assert_eq!(space.read(0x1000), 0);
        assert_eq!(space.read(0x0fff), 0x77);
        // the stray write landed nowhere in bank 1
        assert_eq!(space.read(0x0000), 0);
    }

    #[test]
    fn test_low_rom_page_is_unmapped() {
        let mut space = AddressSpace::new();
        // 0xf000-0xfeff shares the high nibble with ROM but isn't backed
        assert_eq!(space.read(0xf000), 0);
        assert_eq!(space.read(0xfeff), 0);
    }

    #[test]
    fn test_peripheral_write_routed() {
        let mut space = AddressSpace::new();
        let mut term = DummyTerminal::new(&[]);
        space.write(pia::DSP_ADDR, 0x41, &mut term).unwrap();
        assert_eq!(term.sent(), &[0x41]);
    }

    #[test]
    fn test_rom_load_rejects_oversize() {
        let mut space = AddressSpace::new();
        let mut image: &[u8] = &[0u8; 257];
        assert!(space.load_rom(&mut image).is_err());
    }

    #[test]
    fn test_interpreter_load_lands_in_bank2() {
        let mut space = AddressSpace::new();
        let mut image: &[u8] = &[0x4c, 0x00, 0xe0];
        space.load_interpreter(&mut image).unwrap();
        assert_eq!(space.read(0xe000), 0x4c);
        assert_eq!(space.read(0xe002), 0xe0);
    }

    #[test]
    fn test_program_load_honours_header_address() {
        let mut space = AddressSpace::new();
        // load at 0x0280: the original "hello world" home
        let mut image: &[u8] = &[0x80, 0x02, 0xa2, 0x0c];
        space.load_program(&mut image).unwrap();
        assert_eq!(space.read(0x0280), 0xa2);
        assert_eq!(space.read(0x0281), 0x0c);
    }

    #[test]
    fn test_program_load_rejects_overflow() {
        let mut space = AddressSpace::new();
        let mut image = vec![0xff, 0x0f]; // load at 0x0fff
        image.extend_from_slice(&[0, 0]);
        assert!(space.load_program(&mut image.as_slice()).is_err());
    }
}
