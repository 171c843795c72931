//! Component E — Statement Dispatcher (spec.md §4.E) plus the supplemental statements from
//! SPEC_FULL.md §2.
//!
//! One [`Interpreter::dispatch_statement`] call handles exactly one statement: it clones the
//! current statement text out of `self` (ending any borrow of `self.buffer`/`self.direct_buffer`
//! before touching anything else), recognizes a leading keyword or falls back to a bare
//! assignment, runs the matching handler, and returns a [`PostCondition`]. DESIGN NOTES §9 asks
//! for a handler-plus-post-condition table instead of the firmware's goto-threaded switch; here
//! that's an ordinary Rust `match` over [`crate::keywords::Command`], same as the teacher's
//! `Processor::step` matches over its `OpCode`.
//!
//! Handlers that jump somewhere other than "the next statement in sequence" — `RETURN`, a
//! continuing `NEXT`, a taken `IF`, `GOTO`/`GOSUB`/`RUN` — set `current_line`/`txtpos` themselves
//! and report that by returning [`PostCondition::Loop`] or [`PostCondition::ExecLine`]; the
//! wrapper only ever writes `txtpos` back for the two conditions that mean "keep scanning this
//! same statement text" ([`PostCondition::DoNothing`]/[`PostCondition::NextStatement`]).

use crate::constants::{self, screen_opcode};
use crate::control_stack::{self, Frame, ForFrame, GosubFrame};
use crate::error::ErrorKind;
use crate::eval::Evaluator;
use crate::interpreter::Interpreter;
use crate::keywords::{match_keyword, Command, ForKeyword};
use crate::memory::Storage;
use crate::program_store;
use crate::scan::{peek, skip_spaces};
use crate::shims::{AudioSink, CharIo, Clock, Gpio};

/// The dispatcher's next action after one statement (spec.md §4.E, glossary "Post-condition").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PostCondition {
    /// Continue scanning the same line: advance past `:` if present, else treat as next-line.
    /// Identical in effect to `NextStatement`; kept as a distinct variant because some handlers
    /// (comments, the bare `:` separator) have already consumed to end-of-statement themselves.
    DoNothing,
    /// Advance past `:` if present, else advance to the successor record.
    NextStatement,
    /// Advance to the successor record unconditionally (the rest of this line is moot, e.g. `IF`
    /// false).
    NextLine,
    /// Continue at `current_line`, `txtpos` 0 — a forward jump to the start of a line.
    ExecLine,
    /// Re-enter the dispatcher at `current_line`/`txtpos` exactly as the handler left them — used
    /// whenever the handler resumes somewhere other than the start of a line.
    Loop,
    /// Return to the line editor's prompt with no error to report.
    Prompt,
    /// Return to the line editor's prompt, reporting `self.error` first if set.
    WarmReset,
}

use PostCondition::*;

impl Interpreter {
    /// Entry point called once per statement by [`Interpreter::drive`].
    pub(crate) fn dispatch_statement(&mut self) -> PostCondition {
        let text = self.statement_text().to_vec();
        let mut pos = self.txtpos;
        let result = self.dispatch_inner(&text, &mut pos);
        if let DoNothing | NextStatement = result {
            self.txtpos = pos;
        }
        result
    }

    fn dispatch_inner(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        skip_spaces(text, pos);
        match peek(text, *pos) {
            None | Some(constants::LF) => DoNothing,
            Some(b'\'') | Some(b'#') => {
                *pos = text.len();
                DoNothing
            }
            Some(b'?') => {
                *pos += 1;
                self.do_print(text, pos)
            }
            _ => {
                if let Some((command, after)) = match_keyword::<Command>(text, *pos) {
                    *pos = after;
                    self.dispatch_command(command, text, pos)
                } else {
                    self.do_assignment(text, pos)
                }
            }
        }
    }

    fn dispatch_command(&mut self, command: Command, text: &[u8], pos: &mut usize) -> PostCondition {
        match command {
            Command::REM => {
                *pos = text.len();
                DoNothing
            }
            Command::LET => self.do_assignment(text, pos),
            Command::IF => self.do_if(text, pos),
            Command::GOTO => self.do_goto(text, pos),
            Command::GOSUB => self.do_gosub(text, pos),
            Command::RETURN => self.do_return(),
            Command::FOR => self.do_for(text, pos),
            Command::NEXT => self.do_next(text, pos),
            Command::INPUT => self.do_input(text, pos),
            Command::POKE => self.do_poke(text, pos),
            Command::PRINT => self.do_print(text, pos),
            Command::LIST => self.do_list(text, pos),
            Command::MEM => self.do_mem(),
            Command::NEW => {
                self.new_program();
                NextStatement
            }
            Command::RUN => self.do_run(),
            Command::END | Command::STOP => {
                self.current_line = None;
                WarmReset
            }
            Command::RANDOMIZE => {
                let seed = self.clock.free_running_seed();
                self.rng.seed(seed);
                NextStatement
            }
            Command::RNDSEED => self.with_i16(text, pos, |me, v| {
                me.rng.seed(v as u32);
                NextStatement
            }),
            Command::DELAY => self.with_i16(text, pos, |me, v| {
                me.clock.delay_ms(v.max(0) as u32);
                NextStatement
            }),
            Command::CLS => {
                self.terminal.write_byte(screen_opcode::CLEAR);
                self.print_column = 0;
                NextStatement
            }
            Command::PINMODE => self.do_pinmode(text, pos),
            Command::PINWRITE => self.do_pinwrite(text, pos),
            Command::TONE | Command::NOTE => self.do_note(text, pos),
            Command::SOUND => self.do_sound(text, pos),
            Command::CLEAR => self.with_channel(text, pos, |me, channel| {
                me.audio.clear_channel(channel);
                NextStatement
            }),
            Command::TEMPO => self.with_i16(text, pos, |me, v| {
                me.audio.set_tempo(v.max(0) as u8);
                NextStatement
            }),
            Command::COLOR => self.do_color(text, pos),
            Command::LOCATE => self.do_locate(text, pos),
            Command::PLOT => self.do_plot(text, pos),
            Command::CURSOR => self.do_cursor(text, pos),
            Command::ESAVE => {
                program_store::save(&self.buffer, self.eeprom.as_mut());
                NextStatement
            }
            Command::ELOAD => self.do_load_from(Source::Eeprom),
            Command::SSAVE => {
                program_store::save(&self.buffer, self.serial.as_mut());
                NextStatement
            }
            Command::SLOAD => self.do_load_from(Source::Serial),
        }
    }

    // ---- expressions -------------------------------------------------------------------

    /// Parses one expression starting at `*pos`, through the shared evaluator (Component D).
    pub(crate) fn eval_expr(&mut self, text: &[u8], pos: &mut usize) -> Result<i16, ErrorKind> {
        let mut evaluator = Evaluator::new(&self.buffer, &mut self.rng, self.gpio.as_mut());
        evaluator.eval(text, pos)
    }

    /// `count` comma-separated expressions, e.g. `PLOT x, y, color`.
    fn parse_exprs(
        &mut self,
        text: &[u8],
        pos: &mut usize,
        count: usize,
    ) -> Result<Vec<i16>, ErrorKind> {
        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                skip_spaces(text, pos);
                if peek(text, *pos) != Some(b',') {
                    return Err(ErrorKind::Syntax);
                }
                *pos += 1;
            }
            values.push(self.eval_expr(text, pos)?);
        }
        Ok(values)
    }

    fn with_i16(
        &mut self,
        text: &[u8],
        pos: &mut usize,
        then: impl FnOnce(&mut Self, i16) -> PostCondition,
    ) -> PostCondition {
        match self.eval_expr(text, pos) {
            Ok(value) => then(self, value),
            Err(kind) => self.fail(kind),
        }
    }

    fn with_channel(
        &mut self,
        text: &[u8],
        pos: &mut usize,
        then: impl FnOnce(&mut Self, u8) -> PostCondition,
    ) -> PostCondition {
        match self.eval_expr(text, pos).and_then(channel_number) {
            Ok(channel) => then(self, channel),
            Err(kind) => self.fail(kind),
        }
    }

    fn fail(&mut self, kind: ErrorKind) -> PostCondition {
        self.error = Some(kind);
        WarmReset
    }

    /// A run of uppercase letters used as an assignment/`FOR`/`NEXT`/`INPUT` target: exactly one
    /// letter, never more (spec.md §4.C, error 7/17).
    fn expect_variable(&mut self, text: &[u8], pos: &mut usize) -> Result<u8, ErrorKind> {
        skip_spaces(text, pos);
        let mut end = *pos;
        while peek(text, end).map_or(false, |b| b.is_ascii_uppercase()) {
            end += 1;
        }
        if end == *pos {
            return Err(ErrorKind::VariableExpected);
        }
        let letter = crate::variables::validate_letter(&text[*pos..end])?;
        *pos = end;
        Ok(letter)
    }

    fn expect_byte(&mut self, text: &[u8], pos: &mut usize, bytes: &[u8]) -> bool {
        skip_spaces(text, pos);
        if text[*pos..].starts_with(bytes) {
            *pos += bytes.len();
            true
        } else {
            false
        }
    }

    // ---- assignment / IF / jumps -------------------------------------------------------

    fn do_assignment(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let letter = match self.expect_variable(text, pos) {
            Ok(letter) => letter,
            Err(kind) => return self.fail(kind),
        };
        skip_spaces(text, pos);
        if peek(text, *pos) != Some(b'=') {
            return self.fail(ErrorKind::Syntax);
        }
        *pos += 1;
        match self.eval_expr(text, pos) {
            Ok(value) => {
                self.buffer.set_variable(letter, value);
                NextStatement
            }
            Err(kind) => self.fail(kind),
        }
    }

    fn do_if(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.eval_expr(text, pos) {
            Ok(0) => NextLine,
            Ok(_) => {
                self.txtpos = *pos;
                Loop
            }
            Err(kind) => self.fail(kind),
        }
    }

    /// Jumps to the first line numbered `>= n` (spec.md §4.E), or returns to the prompt if none
    /// exists — the same `WarmReset` `do_run` takes when the program is empty, not a dangling
    /// `current_line` the driving loop would spin on forever in direct mode (`self.direct_buffer`
    /// would stay non-empty with `current_line == None`, and `Interpreter::drive`'s loop only
    /// exits on both being empty/`None` together).
    fn goto_line(&mut self, n: u16) -> PostCondition {
        let target = program_store::find(&self.buffer, n);
        if target >= self.buffer.program_slice().len() {
            self.current_line = None;
            WarmReset
        } else {
            self.current_line = Some(target);
            ExecLine
        }
    }

    fn do_goto(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.eval_expr(text, pos) {
            Ok(n) if n >= 0 => self.goto_line(n as u16),
            Ok(_) => self.fail(ErrorKind::InvalidLineNumber),
            Err(kind) => self.fail(kind),
        }
    }

    fn do_gosub(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let n = match self.eval_expr(text, pos) {
            Ok(n) if n >= 0 => n as u16,
            Ok(_) => return self.fail(ErrorKind::InvalidLineNumber),
            Err(kind) => return self.fail(kind),
        };
        let (resume_line, resume_txt) = self.advance_point(self.current_line, *pos);
        let frame = GosubFrame {
            resume_line,
            resume_txt,
        };
        if let Err(kind) = control_stack::push_gosub(&mut self.buffer, frame) {
            return self.fail(kind);
        }
        self.goto_line(n)
    }

    fn do_return(&mut self) -> PostCondition {
        match control_stack::find_gosub(&self.buffer) {
            Some((offset, frame)) => {
                control_stack::remove(&mut self.buffer, offset, control_stack::frame_len(&Frame::Gosub(frame)));
                self.current_line = frame.resume_line;
                self.txtpos = frame.resume_txt;
                Loop
            }
            None => self.fail(ErrorKind::JumpPointNotFound),
        }
    }

    // ---- FOR / NEXT ---------------------------------------------------------------------

    fn do_for(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let var = match self.expect_variable(text, pos) {
            Ok(letter) => letter,
            Err(kind) => return self.fail(kind),
        };
        skip_spaces(text, pos);
        if peek(text, *pos) != Some(b'=') {
            return self.fail(ErrorKind::Syntax);
        }
        *pos += 1;
        let start = match self.eval_expr(text, pos) {
            Ok(value) => value,
            Err(kind) => return self.fail(kind),
        };
        skip_spaces(text, pos);
        match match_keyword::<ForKeyword>(text, *pos) {
            Some((ForKeyword::TO, after)) => *pos = after,
            _ => return self.fail(ErrorKind::Syntax),
        }
        let terminal = match self.eval_expr(text, pos) {
            Ok(value) => value,
            Err(kind) => return self.fail(kind),
        };
        skip_spaces(text, pos);
        let step = match match_keyword::<ForKeyword>(text, *pos) {
            Some((ForKeyword::STEP, after)) => {
                *pos = after;
                match self.eval_expr(text, pos) {
                    Ok(value) => value,
                    Err(kind) => return self.fail(kind),
                }
            }
            _ => 1,
        };

        self.buffer.set_variable(var, start);
        let (resume_line, resume_txt) = self.advance_point(self.current_line, *pos);
        let frame = ForFrame {
            var,
            terminal,
            step,
            resume_line,
            resume_txt,
        };
        match control_stack::push_for(&mut self.buffer, frame) {
            Ok(()) => NextStatement,
            Err(kind) => self.fail(kind),
        }
    }

    fn do_next(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let var = match self.expect_variable(text, pos) {
            Ok(letter) => letter,
            Err(kind) => return self.fail(kind),
        };
        let (offset, frame) = match control_stack::find_for(&self.buffer, var) {
            Ok(found) => found,
            Err(kind) => return self.fail(kind),
        };

        let next_value = self.buffer.get_variable(var).wrapping_add(frame.step);
        self.buffer.set_variable(var, next_value);
        let continue_loop = if frame.step > 0 {
            next_value <= frame.terminal
        } else if frame.step < 0 {
            next_value >= frame.terminal
        } else {
            false
        };

        if continue_loop {
            self.current_line = frame.resume_line;
            self.txtpos = frame.resume_txt;
            Loop
        } else {
            control_stack::remove(&mut self.buffer, offset, control_stack::frame_len(&Frame::For(frame)));
            NextStatement
        }
    }

    // ---- INPUT / POKE / PRINT -------------------------------------------------------------

    fn do_input(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let var = match self.expect_variable(text, pos) {
            Ok(letter) => letter,
            Err(kind) => return self.fail(kind),
        };
        let mut value = std::num::Wrapping(0i16);
        let mut negative = false;
        let mut first = true;
        loop {
            let byte = match self.terminal.read_byte() {
                Some(byte) => byte,
                None => break,
            };
            if byte == constants::LF {
                break;
            }
            if first && byte == b'-' {
                negative = true;
            } else if byte.is_ascii_digit() {
                value = value * std::num::Wrapping(10) + std::num::Wrapping(i16::from(byte - b'0'));
            }
            first = false;
        }
        let result = if negative { -value } else { value };
        self.buffer.set_variable(var, result.0);
        NextStatement
    }

    fn do_poke(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 2) {
            Ok(values) => {
                let (address, value) = (values[0], values[1]);
                if address < 0 {
                    return self.fail(ErrorKind::OutOfRange);
                }
                if !(0..=255).contains(&value) {
                    return self.fail(ErrorKind::ExpectedByte);
                }
                match self.buffer.write_byte(address as usize, value as u8) {
                    Ok(()) => NextStatement,
                    Err(kind) => self.fail(kind),
                }
            }
            Err(kind) => self.fail(kind),
        }
    }

    fn do_print(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let mut suppress_newline = false;
        loop {
            skip_spaces(text, pos);
            match peek(text, *pos) {
                None | Some(constants::LF) | Some(b':') => break,
                Some(quote @ b'"') | Some(quote @ b'\'') => {
                    *pos += 1;
                    let start = *pos;
                    while peek(text, *pos).map_or(false, |byte| byte != quote) {
                        *pos += 1;
                    }
                    self.write_print(&text[start..*pos]);
                    if peek(text, *pos) == Some(quote) {
                        *pos += 1;
                    }
                }
                _ if text[*pos..].starts_with(b"TAB(") => {
                    *pos += 4;
                    let column = match self.eval_expr(text, pos) {
                        Ok(value) => value,
                        Err(kind) => return self.fail(kind),
                    };
                    skip_spaces(text, pos);
                    if peek(text, *pos) != Some(b')') {
                        return self.fail(ErrorKind::MissingRParen);
                    }
                    *pos += 1;
                    let target = column.max(0) as usize;
                    if target > self.print_column {
                        let pad = target - self.print_column;
                        self.write_print(&vec![b' '; pad]);
                    }
                }
                _ => {
                    let value = match self.eval_expr(text, pos) {
                        Ok(value) => value,
                        Err(kind) => return self.fail(kind),
                    };
                    self.write_print(value.to_string().as_bytes());
                }
            }

            skip_spaces(text, pos);
            match peek(text, *pos) {
                Some(b',') => {
                    *pos += 1;
                    self.write_print(b" ");
                    suppress_newline = false;
                }
                Some(b';') => {
                    *pos += 1;
                    skip_spaces(text, pos);
                    match peek(text, *pos) {
                        None | Some(constants::LF) | Some(b':') => {
                            suppress_newline = true;
                            break;
                        }
                        _ => suppress_newline = false,
                    }
                }
                _ => break,
            }
        }
        if !suppress_newline {
            self.terminal.write_bytes(b"\r\n");
            self.print_column = 0;
        }
        NextStatement
    }

    fn write_print(&mut self, bytes: &[u8]) {
        self.terminal.write_bytes(bytes);
        self.print_column += bytes.len();
    }

    // ---- LIST / MEM / RUN -----------------------------------------------------------------

    fn do_list(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        skip_spaces(text, pos);
        let start = match peek(text, *pos) {
            None | Some(constants::LF) | Some(b':') => 0,
            _ => match self.eval_expr(text, pos) {
                Ok(value) if value >= 0 => value as u16,
                Ok(_) => return self.fail(ErrorKind::InvalidLineNumber),
                Err(kind) => return self.fail(kind),
            },
        };
        program_store::list(&self.buffer, start, self.terminal.as_mut());
        NextStatement
    }

    fn do_mem(&mut self) -> PostCondition {
        let message = format!("{} BYTES FREE\r\n", self.buffer.free_bytes());
        self.terminal.write_bytes(message.as_bytes());
        NextStatement
    }

    /// `RUN` as a statement: redirects the cursor rather than recursing into [`Interpreter::drive`]
    /// again, so the driving loop that's already running carries it out.
    fn do_run(&mut self) -> PostCondition {
        self.buffer.reset_stack();
        let first = program_store::find(&self.buffer, constants::LINE_NO_DIRECT + 1);
        if first >= self.buffer.program_slice().len() {
            WarmReset
        } else {
            self.current_line = Some(first);
            ExecLine
        }
    }

    // ---- GPIO -------------------------------------------------------------------------------

    fn do_pinmode(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 2) {
            Ok(values) => match pin_number(values[0]) {
                Ok(pin) => match self.gpio.set_direction(pin, values[1] != 0) {
                    Ok(()) => NextStatement,
                    Err(kind) => self.fail(kind),
                },
                Err(kind) => self.fail(kind),
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn do_pinwrite(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 2) {
            Ok(values) => match pin_number(values[0]) {
                Ok(pin) => match self.gpio.digital_write(pin, values[1] != 0) {
                    Ok(()) => NextStatement,
                    Err(kind) => self.fail(kind),
                },
                Err(kind) => self.fail(kind),
            },
            Err(kind) => self.fail(kind),
        }
    }

    // ---- Audio ------------------------------------------------------------------------------

    fn do_note(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 5) {
            Ok(values) => {
                let [channel, octave, pitch, duration, effect] = [
                    values[0], values[1], values[2], values[3], values[4],
                ];
                match pack_note(channel, octave, pitch, duration, effect) {
                    Ok((ch, note, params)) => {
                        self.audio.insert_notes(ch, &[note, params]);
                        NextStatement
                    }
                    Err(kind) => self.fail(kind),
                }
            }
            Err(kind) => self.fail(kind),
        }
    }

    fn do_sound(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let channel = match self.eval_expr(text, pos).and_then(channel_number) {
            Ok(channel) => channel,
            Err(kind) => return self.fail(kind),
        };
        skip_spaces(text, pos);
        if peek(text, *pos) != Some(b',') {
            return self.fail(ErrorKind::Syntax);
        }
        *pos += 1;
        if self.expect_byte(text, pos, b"ON") {
            self.audio.enable_channel(channel);
            self.audio.play();
        } else if self.expect_byte(text, pos, b"OFF") {
            self.audio.disable_channel(channel);
        } else {
            return self.fail(ErrorKind::Syntax);
        }
        NextStatement
    }

    // ---- Screen -----------------------------------------------------------------------------

    fn do_color(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 2) {
            Ok(values) => match (color_byte(values[0]), color_byte(values[1])) {
                (Ok(pen), Ok(paper)) => {
                    self.pen_color = pen;
                    self.paper_color = paper;
                    self.terminal.write_byte(screen_opcode::SET_PEN);
                    self.terminal.write_byte(pen);
                    self.terminal.write_byte(screen_opcode::SET_PAPER);
                    self.terminal.write_byte(paper);
                    NextStatement
                }
                _ => self.fail(ErrorKind::ExpectedColor),
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn do_locate(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 2) {
            Ok(values) => match (coordinate_byte(values[0]), coordinate_byte(values[1])) {
                (Ok(row), Ok(col)) => {
                    self.terminal.write_byte(screen_opcode::LOCATE);
                    self.terminal.write_byte(row);
                    self.terminal.write_byte(col);
                    NextStatement
                }
                _ => self.fail(ErrorKind::InvalidCoordinate),
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn do_plot(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        match self.parse_exprs(text, pos, 3) {
            Ok(values) => match (
                coordinate_byte(values[0]),
                coordinate_byte(values[1]),
                color_byte(values[2]),
            ) {
                (Ok(x), Ok(y), Ok(color)) => {
                    self.terminal.write_byte(screen_opcode::PLOT);
                    self.terminal.write_byte(x);
                    self.terminal.write_byte(y);
                    self.terminal.write_byte(color);
                    NextStatement
                }
                _ => self.fail(ErrorKind::InvalidCoordinate),
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn do_cursor(&mut self, text: &[u8], pos: &mut usize) -> PostCondition {
        let on = if self.expect_byte(text, pos, b"ON") {
            1
        } else if self.expect_byte(text, pos, b"OFF") {
            0
        } else {
            return self.fail(ErrorKind::Syntax);
        };
        self.terminal.write_byte(screen_opcode::CURSOR);
        self.terminal.write_byte(on);
        NextStatement
    }

    // ---- Persistence -------------------------------------------------------------------------

    fn do_load_from(&mut self, source: Source) -> PostCondition {
        let result = match source {
            Source::Eeprom => program_store::load(&mut self.buffer, self.eeprom.as_mut()),
            Source::Serial => program_store::load(&mut self.buffer, self.serial.as_mut()),
        };
        match result {
            Ok(()) => {
                if self.run_after_load {
                    self.do_run()
                } else {
                    NextStatement
                }
            }
            Err(kind) => self.fail(kind),
        }
    }
}

enum Source {
    Eeprom,
    Serial,
}

fn pin_number(value: i16) -> Result<u8, ErrorKind> {
    if (0..=7).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ErrorKind::InvalidPin)
    }
}

fn channel_number(value: i16) -> Result<u8, ErrorKind> {
    if (1..=4).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ErrorKind::OutOfRange)
    }
}

fn color_byte(value: i16) -> Result<u8, ErrorKind> {
    if (0..=127).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ErrorKind::ExpectedColor)
    }
}

fn coordinate_byte(value: i16) -> Result<u8, ErrorKind> {
    if (0..=255).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ErrorKind::InvalidCoordinate)
    }
}

/// Packs one `TONE`/`NOTE` argument list into the wire form spec.md §6 describes: `note = 24 *
/// (octave - 2) + 2 * (pitch - 1)`, or `144` for a rest (`pitch == 13`); `params = (duration - 1)
/// | (effect << 6)`.
fn pack_note(
    channel: i16,
    octave: i16,
    pitch: i16,
    duration: i16,
    effect: i16,
) -> Result<(u8, u8, u8), ErrorKind> {
    let channel = channel_number(channel)?;
    if !(2..=7).contains(&octave) || !(1..=13).contains(&pitch) {
        return Err(ErrorKind::OutOfRange);
    }
    if !(1..=8).contains(&duration) || !(0..=3).contains(&effect) {
        return Err(ErrorKind::OutOfRange);
    }
    let note = if pitch == 13 {
        144
    } else {
        24 * (octave - 2) + 2 * (pitch - 1)
    };
    let params = (duration - 1) as u8 | ((effect as u8) << 6);
    Ok((channel, note as u8, params))
}

#[cfg(test)]
mod test;
