//! # apple1-bus
//!
//! Turns the host into the memory and I/O half of an Apple 1 replica: a real
//! 6502 on the other end of the wires does the thinking, we do everything
//! else. We generate its clock, watch its address and R/W lines every cycle,
//! and stand in for ROM, RAM and the keyboard/display PIA.
//!
//! ## Design
//!
//! * one `pulse()` of the clock per bus cycle; the CPU moves its R/W line
//!   during the low phase, so direction is re-evaluated between the phases
//! * the data pins flip between driving and listening only when R/W actually
//!   changes, to keep off the bus while the CPU is on it
//! * all pin access goes through a small capability trait so the decoder and
//!   PIA logic run against a software-simulated bus in tests
//! * the memory map decodes by high nibble to one of
//!   {RAM bank 1, RAM bank 2, ROM, PIA, unmapped}
//! * bit 7 of each PIA register is the pending flag, cleared at consumption
//!   time, so the monitor's busy-poll handshake works unmodified
//! * the main loop is a counted step function, not a bare `loop {}`, so a
//!   test harness can run it one simulated cycle at a time
//!
//! Model
//!
//! BusController
//!  |-- clock(pin, half-period), sampler(pin map, direction)
//!  |-- address space(ram banks, rom, pia), terminal
//!  `-- main loop
//!       |-- clock.pulse        // direction update between the phases
//!       |-- sample address
//!       |-- dispatch one read or write, but only if (address, direction)
//!       |   changed since the previous cycle
//!       `-- poll keyboard -> pia registers

pub mod bus;
pub mod clock;
pub mod controller;
pub mod memory;
pub mod pia;
pub mod pins;
pub mod terminal;
