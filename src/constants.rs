use std::mem;

/// Default size of the flat program buffer when no size is supplied by the host.
///
/// Chosen to match the usable SRAM of the reference 8-bit target once the
/// firmware's own working set is subtracted; hosted ports are free to pick
/// a larger arena by passing a different size to
/// [`Interpreter::new`](crate::interpreter::Interpreter::new).
pub const DEFAULT_MEMORY_SIZE: usize = 4096;

pub const VARIABLE_COUNT: usize = 26;
pub const VARIABLE_BYTES: usize = mem::size_of::<i16>();
pub const VARIABLE_REGION_BYTES: usize = VARIABLE_COUNT * VARIABLE_BYTES;

/// Program-record header: `line_no: u16` followed by `length: u8`.
pub const RECORD_HEADER_BYTES: usize = mem::size_of::<u16>() + mem::size_of::<u8>();

/// `line_no` is valid in `1..=LINE_NO_MAX`; `0` means direct mode, `LINE_NO_SENTINEL` is the
/// overflow sentinel produced by saturating line-number parsing (spec.md §4.G).
pub const LINE_NO_DIRECT: u16 = 0;
pub const LINE_NO_MAX: u16 = 65534;
pub const LINE_NO_SENTINEL: u16 = 65535;

/// Byte emitted by the line editor/terminal shim on backspace-underflow and on buffer-full.
pub const BEL: u8 = 0x07;
pub const BS: u8 = 0x08;
pub const LF: u8 = 0x0A;
pub const CR: u8 = 0x0D;

/// Maximum length of a single edited line, including its trailing LF.
pub const MAX_LINE_BYTES: usize = 255;

/// Single-byte in-line editing keys the line editor recognizes from the terminal shim
/// (spec.md §4.G: "left/right arrow", "HOME/END"). The reference hardware has no multi-byte
/// escape sequences to decode, so these are plain control-code values, clear of BS/BEL/CR/LF —
/// a wire-format choice spec.md leaves open (see `DESIGN.md`).
pub mod control_key {
    pub const HOME: u8 = 0x01;
    pub const LEFT: u8 = 0x02;
    pub const END: u8 = 0x05;
    pub const RIGHT: u8 = 0x06;
}

pub const FOR_FRAME_TAG: u8 = b'F';
pub const GOSUB_FRAME_TAG: u8 = b'G';

/// Pen color the error reporter selects before printing a message (spec.md §7: "the message is
/// printed in the 'error' text color with paper color 0"), matching the reference firmware's
/// `TXT_COL_ERROR`.
pub const ERROR_TEXT_COLOR: u8 = 3;

/// Wire opcodes the character shim recognizes for screen control (spec.md §6), each followed by
/// its listed operand bytes. Chosen in the `0x80..` range, clear of printable ASCII and of the
/// LF/CR/BS/BEL/FF control bytes the core also emits directly; the exact values are a wire-format
/// choice spec.md leaves open (see `DESIGN.md`).
pub mod screen_opcode {
    pub const RESET: u8 = 0x80;
    pub const CLEAR: u8 = 0x81;
    pub const SET_PEN: u8 = 0x82;
    pub const SET_PAPER: u8 = 0x83;
    pub const LOCATE: u8 = 0x84;
    pub const PLOT: u8 = 0x85;
    pub const CURSOR: u8 = 0x86;
}

/// Default number of nested FOR frames guaranteed by spec.md (C6): at least five, plus one
/// more to observe the overflow.
pub const MIN_GUARANTEED_FOR_DEPTH: usize = 5;
