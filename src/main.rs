use std::env;
use std::error::Error;
use std::fs::File;
use std::io;
use std::time::Duration;

use apple1_bus::controller::BusController;
use apple1_bus::memory::{AddressSpace, RAM_BANK_SIZE, ROM_SIZE};
use apple1_bus::pins::{PinMap, SimPins};
use apple1_bus::terminal::CrosstermTerminal;
use log::info;

/// ~100us per half-phase keeps a real 6502 well within spec
const CLOCK_HALF_PERIOD: Duration = Duration::from_micros(100);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // boot-time seeding: ROM is required, a program and a BASIC image in
    // bank 2 are optional
    let mut space = AddressSpace::new();
    let rom_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "roms/wozmon.bin".to_string());
    space.load_rom(&mut File::open(&rom_path)?)?;
    info!("loaded ROM from {}", rom_path);
    if let Some(path) = env::args().nth(2) {
        space.load_program(&mut File::open(&path)?)?;
        info!("loaded program from {}", path);
    }
    if let Some(path) = env::args().nth(3) {
        space.load_interpreter(&mut File::open(&path)?)?;
        info!("loaded interpreter image from {}", path);
    }

    println!("----------------------------");
    println!("APPLE 1 REPLICA BUS");
    println!("----------------------------");
    println!("ROM:  {} BYTE", ROM_SIZE);
    println!("RAM:  {} BYTE", RAM_BANK_SIZE);
    println!("ERAM: {} BYTE", RAM_BANK_SIZE);
    println!("----------------------------");

    // stand-in pin bank; a port to real hardware implements Pins over its
    // GPIO and hands that in instead
    let pins = SimPins::new();
    let terminal = CrosstermTerminal::new()?;
    let mut controller =
        BusController::new(PinMap::default(), CLOCK_HALF_PERIOD, space, pins, terminal);

    // powered until told otherwise: esc or ctrl-c ends the session
    match controller.main_loop(u64::MAX) {
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
        result => result?,
    }
    Ok(())
}
