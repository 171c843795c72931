use num::FromPrimitive;

/// The interpreter's single error state (spec.md §7).
///
/// Numbered exactly as the reference firmware numbers them, so that `ErrorKind as u8`/
/// [`FromPrimitive`] round-trips with the wire representation used by [`PEEK`](crate::eval)-visible
/// diagnostics and by `basic8-shims`' serial error reporting.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum ErrorKind {
    //  Code | Meaning
    //-------+--------------------------------------------------------------
    NotImplemented    = 1,  // Feature recognized but not implemented
    Syntax            = 2,  // Unparseable statement
    StackOverflow     = 3,  // Control-flow stack exhausted
    UnexpectedChar    = 4,  // Evaluator found a byte it could not classify
    MissingLParen     = 5,  // Function call / grouping missing '('
    MissingRParen     = 6,  // Function call / grouping missing ')'
    VariableExpected  = 7,  // Assignment target is not a single letter
    JumpPointNotFound = 8,  // NEXT/RETURN found no matching frame
    InvalidLineNumber = 9,  // Line number out of 1..=65534, or overflowed
    OperatorExpected  = 10, // Evaluator expected '+','-','*','/' or a relop
    DivisionByZero    = 11, // Division or modulo by zero
    InvalidPin        = 12, // Pin index outside 0..8
    PinIoError        = 13, // Pin used in the wrong direction
    UnknownFunction   = 14, // Identifier looked like a call but isn't known
    UnknownCommand    = 15, // Leading keyword matched nothing
    InvalidCoordinate = 16, // PLOT/LOCATE argument out of range
    InvalidVariableName = 17, // More than one letter used as a variable name
    ExpectedByte      = 18, // POKE value not in 0..=255
    OutOfRange        = 19, // PEEK/POKE address beyond the buffer, RND bound invalid, etc.
    ExpectedColor     = 20, // COLOR argument not in 0..=127
}

impl ErrorKind {
    /// The fixed English message printed by the error reporter (spec.md §4.H, §7).
    pub fn message(self) -> &'static str {
        use ErrorKind::*;
        match self {
            NotImplemented => "NOT YET IMPLEMENTED",
            Syntax => "SYNTAX ERROR",
            StackOverflow => "STACK OVERFLOW",
            UnexpectedChar => "UNEXPECTED CHARACTER",
            MissingLParen => "LEFT PARENTHESIS MISSING",
            MissingRParen => "RIGHT PARENTHESIS MISSING",
            VariableExpected => "VARIABLE EXPECTED",
            JumpPointNotFound => "JUMP POINT NOT FOUND",
            InvalidLineNumber => "INVALID LINE NUMBER",
            OperatorExpected => "OPERATOR EXPECTED",
            DivisionByZero => "DIVISION BY ZERO",
            InvalidPin => "INVALID PIN",
            PinIoError => "PIN I/O ERROR",
            UnknownFunction => "UNKNOWN FUNCTION",
            UnknownCommand => "UNKNOWN COMMAND",
            InvalidCoordinate => "INVALID COORDINATES",
            InvalidVariableName => "INVALID VARIABLE NAME",
            ExpectedByte => "EXPECTED BYTE (0..255)",
            OutOfRange => "OUT OF RANGE",
            ExpectedColor => "EXPECTED COLOR (0..127)",
        }
    }

    /// Reconstructs an `ErrorKind` from its wire code, mainly useful to round-trip values that
    /// crossed a `basic8-shims` stream as a raw byte.
    pub fn from_code(code: u8) -> Option<ErrorKind> {
        FromPrimitive::from_u8(code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// The statement/expression layer's unwind value: every fallible helper returns this instead of
/// panicking or using exceptions, per spec.md §7's propagation policy, and the dispatcher checks
/// it after every call.
pub type EvalResult<T> = Result<T, ErrorKind>;
