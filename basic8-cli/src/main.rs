//! Interactive REPL front-end for the `basic8` interpreter (spec.md §6 "Interactive surface").
//!
//! Per spec.md §6 there are no command-line flags; the only runtime-selectable knob is the
//! program buffer size, read once from the `BASIC8_MEMORY` environment variable
//! (SPEC_FULL.md §3.3). Everything else is wired to host-backed adapters from `basic8-shims` and
//! handed to [`basic8::Interpreter::run_repl`], which owns the whole session from there.

use std::env;

use basic8::constants::DEFAULT_MEMORY_SIZE;
use basic8::Interpreter;
use basic8_shims::{FileStream, InMemoryStream, LoggingAudioSink, SimGpio, StdioTerminal, SystemClock};

const EEPROM_PATH: &str = "basic8.eeprom";

fn memory_size() -> usize {
    match env::var("BASIC8_MEMORY") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            eprintln!("BASIC8_MEMORY={:?} is not a valid size, using the default", value);
            DEFAULT_MEMORY_SIZE
        }),
        Err(_) => DEFAULT_MEMORY_SIZE,
    }
}

fn main() {
    env_logger::init();

    let memory_size = memory_size();
    let eeprom = match FileStream::open(EEPROM_PATH) {
        Ok(stream) => Box::new(stream) as Box<dyn basic8::shims::Stream>,
        Err(err) => {
            log::warn!("could not open {}: {}, using an in-memory EEPROM", EEPROM_PATH, err);
            Box::new(InMemoryStream::new())
        }
    };

    let mut interpreter = Interpreter::new(
        memory_size,
        Box::new(SimGpio::new()),
        Box::new(LoggingAudioSink::default()),
        Box::new(SystemClock::default()),
        Box::new(StdioTerminal::new()),
        eeprom,
        // No physical serial link on a hosted port; SSAVE/SLOAD target an in-memory stream that
        // lives only for the process's lifetime.
        Box::new(InMemoryStream::new()),
    );

    interpreter.cold_start();
    println!("{} BYTES FREE", interpreter.buffer().free_bytes());
    println!("OK");
    interpreter.run_repl();
}
