//! Component D — Expression Evaluator (spec.md §4.D).
//!
//! A four-level recursive-descent evaluator: `cmp` over `add` over `mul` over `primary`, each
//! level calling straight into the next exactly as the grammar in spec.md §4.D lays it out. All
//! arithmetic runs through `Wrapping<i16>` so overflow wraps like two's-complement hardware math
//! (E1) instead of panicking, the same idiom the teacher's `Processor` core uses for its 32-bit
//! ALU ops.

use std::num::Wrapping;

use crate::error::ErrorKind;
use crate::keywords::{match_keyword, Function, RelOp};
use crate::memory::{ProgramBuffer, Storage};
use crate::rng::Rng;
use crate::scan::{peek, skip_spaces};
use crate::shims::Gpio;

pub struct Evaluator<'a> {
    pub buffer: &'a ProgramBuffer,
    pub rng: &'a mut Rng,
    pub gpio: &'a mut dyn Gpio,
}

impl<'a> Evaluator<'a> {
    pub fn new(buffer: &'a ProgramBuffer, rng: &'a mut Rng, gpio: &'a mut dyn Gpio) -> Self {
        Evaluator { buffer, rng, gpio }
    }

    /// `expr := cmp`.
    pub fn eval(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        self.cmp(text, pos)
    }

    /// `cmp := add (relop add)?` — at most one comparison, never chained (E3).
    fn cmp(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        let lhs = self.add(text, pos)?;
        skip_spaces(text, pos);
        match match_keyword::<RelOp>(text, *pos) {
            Some((op, after)) => {
                *pos = after;
                let rhs = self.add(text, pos)?;
                Ok(if op.apply(lhs, rhs) { 1 } else { 0 })
            }
            None => Ok(lhs),
        }
    }

    /// `add := ['+'|'-']? mul (('+'|'-') mul)*`.
    fn add(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        skip_spaces(text, pos);
        let negate_first = match peek(text, *pos) {
            Some(b'-') => {
                *pos += 1;
                true
            }
            Some(b'+') => {
                *pos += 1;
                false
            }
            _ => false,
        };

        let mut acc = Wrapping(self.mul(text, pos)?);
        if negate_first {
            acc = -acc;
        }

        loop {
            skip_spaces(text, pos);
            match peek(text, *pos) {
                Some(b'+') => {
                    *pos += 1;
                    acc += Wrapping(self.mul(text, pos)?);
                }
                Some(b'-') => {
                    *pos += 1;
                    acc -= Wrapping(self.mul(text, pos)?);
                }
                _ => break,
            }
        }
        Ok(acc.0)
    }

    /// `mul := primary (('*'|'/') primary)*`.
    fn mul(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        let mut acc = Wrapping(self.primary(text, pos)?);
        loop {
            skip_spaces(text, pos);
            match peek(text, *pos) {
                Some(b'*') => {
                    *pos += 1;
                    acc *= Wrapping(self.primary(text, pos)?);
                }
                Some(b'/') => {
                    *pos += 1;
                    let rhs = self.primary(text, pos)?;
                    if rhs == 0 {
                        return Err(ErrorKind::DivisionByZero);
                    }
                    acc = Wrapping(acc.0.wrapping_div(rhs));
                }
                _ => break,
            }
        }
        Ok(acc.0)
    }

    /// ```text
    /// primary := '-' primary
    ///          | INTLIT
    ///          | VARLETTER (not followed by letter)
    ///          | FNNAME '(' expr ')'
    ///          | '(' expr ')'
    /// ```
    fn primary(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        skip_spaces(text, pos);
        match peek(text, *pos) {
            Some(b'-') => {
                *pos += 1;
                Ok((-Wrapping(self.primary(text, pos)?)).0)
            }
            Some(b'(') => {
                *pos += 1;
                let value = self.eval(text, pos)?;
                skip_spaces(text, pos);
                if peek(text, *pos) != Some(b')') {
                    return Err(ErrorKind::MissingRParen);
                }
                *pos += 1;
                Ok(value)
            }
            Some(byte) if byte.is_ascii_digit() => Ok(self.integer_literal(text, pos)),
            Some(byte) if byte.is_ascii_uppercase() => self.name(text, pos),
            _ => Err(ErrorKind::UnexpectedChar),
        }
    }

    /// "a leading `0` consumes one digit and yields 0" (spec.md §4.D) — no multi-digit literal
    /// ever starts with `0`.
    fn integer_literal(&mut self, text: &[u8], pos: &mut usize) -> i16 {
        if peek(text, *pos) == Some(b'0') {
            *pos += 1;
            return 0;
        }
        let mut value = Wrapping(0i16);
        while let Some(byte) = peek(text, *pos) {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value * Wrapping(10) + Wrapping(i16::from(byte - b'0'));
            *pos += 1;
        }
        value.0
    }

    /// A run of uppercase letters: either a single-letter variable, or a recognized function name
    /// (which must be followed by `(`).
    fn name(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        if let Some((function, after)) = match_keyword::<Function>(text, *pos) {
            // Reject a single-letter match that is really a variable, e.g. `A` must never be
            // mistaken for part of a longer function name it happens to prefix.
            let run_end = {
                let mut end = *pos;
                while peek(text, end).map_or(false, |b| b.is_ascii_uppercase()) {
                    end += 1;
                }
                end
            };
            if run_end - *pos > 1 {
                *pos = after;
                skip_spaces(text, pos);
                if peek(text, *pos) != Some(b'(') {
                    return Err(ErrorKind::MissingLParen);
                }
                *pos += 1;
                return self.call(function, text, pos);
            }
        }

        let run_end = {
            let mut end = *pos;
            while peek(text, end).map_or(false, |b| b.is_ascii_uppercase()) {
                end += 1;
            }
            end
        };
        if run_end - *pos == 1 {
            let letter = text[*pos];
            *pos += 1;
            return Ok(self.buffer.get_variable(letter));
        }
        Err(ErrorKind::UnknownFunction)
    }

    fn call(&mut self, function: Function, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        let arg = self.eval(text, pos)?;
        skip_spaces(text, pos);
        if peek(text, *pos) != Some(b')') {
            return Err(ErrorKind::MissingRParen);
        }
        *pos += 1;

        match function {
            Function::PEEK => {
                if arg < 0 {
                    return Err(ErrorKind::OutOfRange);
                }
                Ok(i16::from(self.buffer.read_byte(arg as usize)?))
            }
            Function::ABS => Ok(if arg == i16::MIN { i16::MIN } else { arg.abs() }),
            Function::RND => Ok(self.rng.next_in_range(arg)),
            Function::PINDREAD => {
                let pin = pin_number(arg)?;
                Ok(self.gpio.digital_read(pin)? as i16)
            }
            Function::PINAREAD => {
                let pin = pin_number(arg)?;
                Ok((self.gpio.analog_read(pin)? >> 1) as i16)
            }
        }
    }
}

fn pin_number(arg: i16) -> Result<u8, ErrorKind> {
    if (0..=7).contains(&arg) {
        Ok(arg as u8)
    } else {
        Err(ErrorKind::InvalidPin)
    }
}
