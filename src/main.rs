use clap::{Parser, Subcommand};
use socbus::addr::Addr;
use socbus::bus::{
    BusSlave, RamSlave, RomSlave, SocBus, StateStore, Transaction,
};
use socbus::parse::{ScriptCommand, parse_script};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a transaction script against a demo bus.
    Run {
        /// The transaction script to run.
        script: PathBuf,
    },
}

//===========================================================================//

/// Builds the demo bus: 64kB of RAM at $00000000 and 4kB of ROM at
/// $10000000, with the ROM seeded with a recognizable pattern.
fn make_demo_bus() -> SocBus {
    let mut bus = SocBus::new();
    let ram = RamSlave::new(
        Addr::from(0u8),
        vec![0u8; 0x10000].into_boxed_slice(),
    );
    let mut rom_data = vec![0u8; 0x1000];
    for (index, byte) in rom_data.iter_mut().enumerate() {
        *byte = index as u8;
    }
    let rom = RomSlave::new(
        Addr::from(0x1000_0000u32),
        rom_data.into_boxed_slice(),
    );
    let ram: Rc<RefCell<dyn BusSlave>> = Rc::new(RefCell::new(ram));
    let rom: Rc<RefCell<dyn BusSlave>> = Rc::new(RefCell::new(rom));
    bus.register_slave(&ram);
    bus.register_slave(&rom);
    bus
}

fn run_command(
    bus: &SocBus,
    store: &mut StateStore,
    command: &ScriptCommand,
) {
    match *command {
        ScriptCommand::Read { addr, size } => {
            dispatch_and_print(bus, store, Transaction::read(addr, size));
        }
        ScriptCommand::Write { addr, size, data } => {
            dispatch_and_print(
                bus,
                store,
                Transaction::write(addr, size, data),
            );
        }
        ScriptCommand::Atomic { addr, size, data } => {
            dispatch_and_print(
                bus,
                store,
                Transaction::atomic(addr, size, data),
            );
        }
        ScriptCommand::Peek { addr, size } => {
            let mut transaction = Transaction::read(addr, size);
            transaction.set_hidden();
            bus.dispatch(store, &mut transaction);
            println!("     - {transaction}");
        }
        ScriptCommand::Reset => {
            bus.set_reset(store, true);
            bus.set_reset(store, false);
        }
        ScriptCommand::Trace { count } => {
            let history = match store.state(bus.id()) {
                Some(state) => state.history(),
                None => return,
            };
            if history.is_empty() {
                println!("(no trace)");
            } else {
                for entry in history.iter_recent().take(count) {
                    println!("{entry}");
                }
            }
        }
        ScriptCommand::Map => {
            for slave in bus.slaves().slaves() {
                let overlap = bus.slaves().overlaps_another(slave);
                let slave = slave.borrow();
                let range = slave.mapped_range();
                print!(
                    "${:08x}-${:08x}  {}",
                    range.start(),
                    range.end(),
                    slave.description()
                );
                if overlap {
                    print!("  (overlaps another device)");
                }
                println!();
            }
        }
    }
}

fn dispatch_and_print(
    bus: &SocBus,
    store: &mut StateStore,
    mut transaction: Transaction,
) {
    let index = match store.state(bus.id()) {
        Some(state) => state.history().next_index(),
        None => 0,
    };
    bus.dispatch(store, &mut transaction);
    println!("{index:6} {transaction}");
}

//===========================================================================//

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { script } => {
            let source = fs::read_to_string(&script)?;
            let commands = match parse_script(&source) {
                Ok(commands) => commands,
                Err(errors) => {
                    for error in errors {
                        eprintln!(
                            "error at {}: {}",
                            error.location, error.message
                        );
                    }
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "failed to parse script",
                    ));
                }
            };
            let bus = make_demo_bus();
            let mut store = StateStore::new();
            store.ensure_state(bus.id());
            for command in &commands {
                run_command(&bus, &mut store, command);
            }
        }
    }
    Ok(())
}

//===========================================================================//
