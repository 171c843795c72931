//! Component A — Keyword Table Matcher (spec.md §4.A).
//!
//! Each of [`Command`], [`Function`], [`RelOp`] and [`ForKeyword`] is a small fieldless enum
//! deriving `basic8_util_derive::KeywordTable`, which builds a static `(keyword bytes, variant)`
//! table from the enum (variant identifiers double as keyword text for word-shaped keywords;
//! symbol keywords like the relational operators override the text with `#[kw = "..."]`). This
//! mirrors how the teacher's `InteropGetName` built a static ordinal table straight from an
//! opcode enum's variant names.
//!
//! [`match_keyword`] then scans a table for the longest byte-prefix of the input that matches an
//! entry. The original firmware's table walker required the author to hand-order entries so that
//! a keyword's prefix never shadowed the longer keyword it belongs to (e.g. `>` must never be
//! tried before `>=`); here the matcher itself always keeps the longest candidate, so declaration
//! order carries no such obligation.

use basic8_util::KeywordTable;
use basic8_util_derive::KeywordTable;

/// Statement-leading keywords recognized by the dispatcher (spec.md §4.E and the supplemental
/// statements from SPEC_FULL.md §2). `LET` is optional in front of an assignment; `?` is an
/// alias for `PRINT` handled directly by the dispatcher since it isn't a letter keyword.
#[derive(Clone, Copy, PartialEq, Eq, Debug, KeywordTable)]
#[allow(non_camel_case_types)]
pub enum Command {
    LET,
    GOTO,
    GOSUB,
    RETURN,
    FOR,
    NEXT,
    INPUT,
    POKE,
    PRINT,
    LIST,
    MEM,
    NEW,
    RUN,
    END,
    STOP,
    RANDOMIZE,
    RNDSEED,
    DELAY,
    REM,
    IF,
    CLS,
    PINMODE,
    PINWRITE,
    TONE,
    NOTE,
    SOUND,
    CLEAR,
    TEMPO,
    COLOR,
    LOCATE,
    PLOT,
    CURSOR,
    ESAVE,
    ELOAD,
    SSAVE,
    SLOAD,
}

/// Built-in functions (spec.md §4.D). Every call requires parentheses; see `eval::Evaluator::primary`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, KeywordTable)]
#[allow(non_camel_case_types)]
pub enum Function {
    PEEK,
    ABS,
    RND,
    PINDREAD,
    PINAREAD,
}

/// Relational operators (spec.md §4.A, §4.D). Mutually exclusive at a given position; the
/// grammar allows at most one per `cmp` production, never chained.
#[derive(Clone, Copy, PartialEq, Eq, Debug, KeywordTable)]
pub enum RelOp {
    #[kw = ">="]
    Ge,
    #[kw = "<>"]
    Ne1,
    #[kw = ">"]
    Gt,
    #[kw = "="]
    Eq,
    #[kw = "<="]
    Le,
    #[kw = "<"]
    Lt,
    #[kw = "!="]
    Ne2,
}

impl RelOp {
    /// Collapses the two spellings of "not equal" into one logical comparison.
    pub fn apply(self, lhs: i16, rhs: i16) -> bool {
        match self {
            RelOp::Ge => lhs >= rhs,
            RelOp::Gt => lhs > rhs,
            RelOp::Eq => lhs == rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Lt => lhs < rhs,
            RelOp::Ne1 | RelOp::Ne2 => lhs != rhs,
        }
    }
}

/// `FOR v = a TO b [STEP s]` clause keywords.
#[derive(Clone, Copy, PartialEq, Eq, Debug, KeywordTable)]
#[allow(non_camel_case_types)]
pub enum ForKeyword {
    TO,
    STEP,
}

/// Scans `table` for the longest entry whose bytes are a prefix of `text[pos..]`, then skips any
/// spaces that follow the match. Returns `None`, with `pos` untouched by the caller, when nothing
/// matches.
pub fn match_keyword<T: KeywordTable>(text: &[u8], pos: usize) -> Option<(T, usize)> {
    let remaining = &text[pos..];
    let mut best: Option<(T, usize)> = None;

    for &(kw, variant) in T::keywords() {
        if remaining.len() >= kw.len() && &remaining[..kw.len()] == kw {
            if best.map_or(true, |(_, len)| kw.len() > len) {
                best = Some((variant, kw.len()));
            }
        }
    }

    best.map(|(variant, len)| {
        let mut end = pos + len;
        while text.get(end) == Some(&b' ') {
            end += 1;
        }
        (variant, end)
    })
}
