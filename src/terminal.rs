use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::VecDeque;
use std::io;
use std::io::Write;
use std::time::Duration;

/// The byte channel to the human: outbound display characters, inbound
/// keystrokes. `poll` must never block and consumes at most one byte; the
/// bus loop calls it once per cycle.
pub trait Terminal {
    fn send(&mut self, byte: u8) -> Result<(), io::Error>;
    fn poll(&mut self) -> Result<Option<u8>, io::Error>;
}

/// Raw-mode terminal over stdin/stdout. Esc or ctrl-c surface as
/// `ErrorKind::Interrupted` so the loop can be ended from the keyboard;
/// everything else is the CPU's business.
pub struct CrosstermTerminal {
    stdout: io::Stdout,
}

impl CrosstermTerminal {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(CrosstermTerminal {
            stdout: io::stdout(),
        })
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        terminal::disable_raw_mode().unwrap();
    }
}

impl Terminal for CrosstermTerminal {
    fn send(&mut self, byte: u8) -> Result<(), io::Error> {
        self.stdout.write_all(&[byte])?;
        self.stdout.flush()
    }

    fn poll(&mut self) -> Result<Option<u8>, io::Error> {
        if !poll(Duration::from_millis(0))? {
            return Ok(None);
        }
        match read()? {
            Event::Key(evt) => match evt.code {
                KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                    Err(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"))
                }
                KeyCode::Esc => Err(io::Error::new(io::ErrorKind::Interrupted, "esc")),
                KeyCode::Char(key) if key.is_ascii() => Ok(Some(key as u8)),
                KeyCode::Char(key) => {
                    warn!("can't put {:?} on a 7-bit keyboard", key);
                    Ok(None)
                }
                KeyCode::Enter => Ok(Some(0x0d)),
                KeyCode::Backspace | KeyCode::Delete => Ok(Some(0x7f)),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }
}

/// records the outbound stream and replays a scripted inbound one; for tests
pub struct DummyTerminal {
    sent: Vec<u8>,
    incoming: VecDeque<u8>,
}

impl DummyTerminal {
    pub fn new(incoming: &[u8]) -> Self {
        DummyTerminal {
            sent: Vec::new(),
            incoming: incoming.iter().copied().collect(),
        }
    }

    pub fn sent(&self) -> &[u8] {
        self.sent.as_slice()
    }
}

impl Terminal for DummyTerminal {
    fn send(&mut self, byte: u8) -> Result<(), io::Error> {
        self.sent.push(byte);
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<u8>, io::Error> {
        Ok(self.incoming.pop_front())
    }
}
