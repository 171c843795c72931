//! Concrete adapters for the capability traits declared in `basic8::shims` (spec.md §6).
//!
//! The core crate only ever calls through [`basic8::shims::CharIo`], [`basic8::shims::Stream`],
//! [`basic8::shims::Gpio`], [`basic8::shims::AudioSink`] and [`basic8::shims::Clock`]; this crate
//! is the far side of that contract, mirroring how the teacher's `vcpu-interop` sits on the far
//! side of `vcpu`'s own contracts. Each module here pairs a host-backed implementation (stdio,
//! the filesystem, the system clock) with a small deterministic in-memory double of the same
//! trait, so integration tests can drive the interpreter without a terminal or a disk.

pub mod audio;
pub mod clock;
pub mod gpio;
pub mod stream;
pub mod terminal;

pub use audio::{InMemoryAudioSink, LoggingAudioSink};
pub use clock::{FixedClock, SystemClock};
pub use gpio::SimGpio;
pub use stream::{FileStream, InMemoryStream};
pub use terminal::{InMemoryTerminal, StdioTerminal};
