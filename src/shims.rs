//! Component I — External Interface Shim contracts (spec.md §6).
//!
//! The language core never touches a keyboard, a VGA controller, a GPIO header, or a wall clock
//! directly; it only ever calls through these traits. DESIGN NOTES §9 ("Ownership of streams")
//! asks for small capability interfaces injected into the interpreter rather than global file
//! handles, mirroring how the teacher's `vcpu-interop` crate sits on the far side of a contract
//! from `vcpu` itself — except here the contracts live with the core that defines the call sites,
//! and `basic8-shims` is the crate of concrete adapters that implement them.

use crate::error::ErrorKind;

/// The interactive terminal (spec.md §4.G, §6 "Character I/O").
pub trait CharIo {
    /// Reads the next input byte, or `None` on EOF.
    fn read_byte(&mut self) -> Option<u8>;
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

/// A forward-sequential persistent byte stream (EEPROM or serial; spec.md §6 "Persistent
/// stores"). `getc` returns `0` at end of stream, matching the firmware's convention exactly so
/// the line editor's "zero byte ends the ingest stream" rule (spec.md §4.G) needs no translation.
pub trait Stream {
    fn getc(&mut self) -> u8;
    fn putc(&mut self, byte: u8);
}

/// Eight bidirectional digital pins plus one 8-channel ADC (spec.md §6 "GPIO").
pub trait Gpio {
    fn set_direction(&mut self, pin: u8, output: bool) -> Result<(), ErrorKind>;
    fn digital_read(&mut self, pin: u8) -> Result<bool, ErrorKind>;
    fn digital_write(&mut self, pin: u8, high: bool) -> Result<(), ErrorKind>;
    fn analog_read(&mut self, pin: u8) -> Result<u16, ErrorKind>;
}

/// The audio command stream (spec.md §6 "Audio command stream"). Methods mirror the wire
/// opcodes one-to-one; `basic8-shims` is responsible for the actual byte packing described
/// there.
pub trait AudioSink {
    fn play(&mut self);
    fn stop(&mut self);
    fn set_tempo(&mut self, tempo: u8);
    fn enable_channel(&mut self, channel: u8);
    fn disable_channel(&mut self, channel: u8);
    fn clear_channel(&mut self, channel: u8);
    fn insert_notes(&mut self, channel: u8, notes: &[u8]);
    fn abort(&mut self);
}

/// Wall-clock/timing primitives (spec.md §5 "Suspension points", §6). The core's own PRNG (see
/// [`crate::rng`]) asks this trait for an entropy source when `RANDOMIZE` runs; it never reads a
/// clock directly.
pub trait Clock {
    fn delay_ms(&mut self, ms: u32);
    fn free_running_seed(&mut self) -> u32;
}
