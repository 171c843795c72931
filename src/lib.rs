//! Core interpreter for a line-numbered BASIC dialect targeting an 8-bit homebrew computer.
//!
//! The crate is organized the way the original design's components are laid out (spec.md §2):
//! keyword matcher, program store, variable store, expression evaluator, statement dispatcher,
//! control-flow stack, error reporter, and a set of host capability traits the rest of the
//! engine is injected with. [`Interpreter`] is the single state value everything else is a
//! method on, threaded through instead of the firmware's file-scope globals (DESIGN NOTES §9).

extern crate num;
#[macro_use]
extern crate num_derive;

pub mod constants;
pub mod control_stack;
mod dispatcher;
pub mod error;
pub mod eval;
pub mod interpreter;
pub mod keywords;
pub mod line_editor;
pub mod memory;
pub mod program_store;
pub mod rng;
mod scan;
pub mod shims;
pub mod variables;

pub use dispatcher::PostCondition;
pub use error::ErrorKind;
pub use interpreter::Interpreter;
