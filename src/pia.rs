use crate::terminal::Terminal;
use std::io;

// the four registers of the 6821, as the Apple 1 wired them up
pub const KBD_ADDR: u16 = 0xd010;
pub const KBD_CR_ADDR: u16 = 0xd011;
pub const DSP_ADDR: u16 = 0xd012;
pub const DSP_CR_ADDR: u16 = 0xd013;

/// what the monitor writes to the display for carriage return
const DSP_CR: u8 = 0x8d;
/// what the monitor writes to the display for rubout ('_' with bit 7 set)
const DSP_RUBOUT: u8 = 0xdf;
/// modern terminals erase with a real backspace
const BACKSPACE: u8 = 0x08;

/// terminals that send CR+LF pairs would double up our newlines
const LINE_FEED: u8 = 0x0a;
const CARRIAGE_RETURN: u8 = 0x0d;
/// inbound delete key, and the erase byte the monitor actually understands
const DELETE: u8 = 0x7f;
const RUBOUT: u8 = 0x5f;

/// One 8-bit PIA register. Bit 7 is the pending flag: 1 means a value has
/// been produced and not yet consumed, the handshake the monitor busy-polls
/// on.
#[derive(Clone, Copy, Default)]
pub struct Register(u8);

impl Register {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    pub fn is_pending(self) -> bool {
        self.0 & 0x80 != 0
    }

    pub fn mark_pending(&mut self) {
        self.0 |= 0x80;
    }

    pub fn clear_pending(&mut self) {
        self.0 &= 0x7f;
    }
}

/// Emulates the keyboard/display PIA: keyboard data and status, display data
/// and status. The keyboard side is fed from terminal input, the display
/// side drains to terminal output.
#[derive(Default)]
pub struct Pia {
    kbd: Register,
    kbd_ctrl: Register,
    dsp: Register,
    dsp_ctrl: Register,
}

impl Pia {
    pub fn new() -> Self {
        Pia::default()
    }

    /// CPU read of a peripheral address. Reading the keyboard register is
    /// the consumption point, so it acknowledges the pending character by
    /// clearing the status flag.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            KBD_ADDR => {
                self.kbd_ctrl.clear_pending();
                self.kbd.get()
            }
            KBD_CR_ADDR => self.kbd_ctrl.get(),
            DSP_ADDR => self.dsp.get(),
            DSP_CR_ADDR => self.dsp_ctrl.get(),
            _ => 0,
        }
    }

    /// CPU write of a peripheral address. A display-data write is emitted on
    /// the terminal at once, then acknowledged by clearing its pending bit.
    pub fn write(
        &mut self,
        addr: u16,
        byte: u8,
        terminal: &mut dyn Terminal,
    ) -> Result<(), io::Error> {
        match addr {
            KBD_ADDR => self.kbd.set(byte),
            KBD_CR_ADDR => self.kbd_ctrl.set(byte),
            DSP_ADDR => {
                self.dsp.set(byte);
                match byte {
                    DSP_CR => {
                        terminal.send(CARRIAGE_RETURN)?;
                        terminal.send(LINE_FEED)?;
                    }
                    DSP_RUBOUT => terminal.send(BACKSPACE)?,
                    b => terminal.send(b & 0x7f)?,
                }
                self.dsp.clear_pending();
            }
            DSP_CR_ADDR => self.dsp_ctrl.set(byte),
            _ => {}
        }
        Ok(())
    }

    /// one byte arriving from the terminal keyboard: drop line feeds, remap
    /// delete to the monitor's rubout, flag everything else as pending
    pub fn accept_key(&mut self, byte: u8) {
        let key = match byte {
            LINE_FEED => return,
            DELETE => RUBOUT,
            b => b,
        };
        self.kbd.set(key);
        self.kbd.mark_pending();
        self.kbd_ctrl.mark_pending();
    }
}
