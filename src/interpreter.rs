//! Thread a single interpreter state value through every handler (DESIGN NOTES §9), instead of
//! the firmware's file-scope globals (`txtpos`, `current_line`, `error_code`, ...). `Interpreter`
//! owns the program buffer, the PRNG, the execution cursor, and the external shims; everything in
//! [`crate::dispatcher`] and [`crate::line_editor`] is a method on it.

use crate::constants::{self, screen_opcode};
use crate::error::ErrorKind;
use crate::memory::ProgramBuffer;
use crate::program_store;
use crate::rng::Rng;
use crate::shims::{AudioSink, CharIo, Clock, Gpio, Stream};

/// `current_line`/`txtpos` (spec.md §3 "Execution cursor"). `None` is direct mode: the owned
/// [`Interpreter::direct_buffer`] stands in for the relocated raw-line buffer the firmware reuses
/// out of the control-stack region — see `DESIGN.md` for why a small owned buffer replaces that
/// relocation trick in this port.
pub type LinePtr = Option<usize>;

pub struct Interpreter {
    pub(crate) buffer: ProgramBuffer,
    pub(crate) rng: Rng,
    pub(crate) current_line: LinePtr,
    pub(crate) txtpos: usize,
    pub(crate) direct_buffer: Vec<u8>,
    pub(crate) error: Option<ErrorKind>,
    pub(crate) break_flag: bool,
    pub(crate) run_after_load: bool,
    pub(crate) pen_color: u8,
    pub(crate) paper_color: u8,
    /// Cursor column since the last newline, tracked for `PRINT`'s `TAB(n)` item (SPEC_FULL §2).
    pub(crate) print_column: usize,
    pub(crate) gpio: Box<dyn Gpio>,
    pub(crate) audio: Box<dyn AudioSink>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) terminal: Box<dyn CharIo>,
    pub(crate) eeprom: Box<dyn Stream>,
    pub(crate) serial: Box<dyn Stream>,
}

impl Interpreter {
    pub fn new(
        memory_size: usize,
        gpio: Box<dyn Gpio>,
        audio: Box<dyn AudioSink>,
        clock: Box<dyn Clock>,
        terminal: Box<dyn CharIo>,
        eeprom: Box<dyn Stream>,
        serial: Box<dyn Stream>,
    ) -> Interpreter {
        Interpreter {
            buffer: ProgramBuffer::new(memory_size),
            rng: Rng::new(),
            current_line: None,
            txtpos: 0,
            direct_buffer: Vec::new(),
            error: None,
            break_flag: false,
            run_after_load: false,
            pen_color: 0,
            paper_color: 0,
            print_column: 0,
            gpio,
            audio,
            clock,
            terminal,
            eeprom,
            serial,
        }
    }

    pub fn buffer(&self) -> &ProgramBuffer {
        &self.buffer
    }

    pub fn request_break(&mut self) {
        self.break_flag = true;
    }

    /// Every statement and every iteration of the input loop polls this (spec.md §5).
    pub(crate) fn check_break(&mut self) -> bool {
        if self.break_flag {
            self.break_flag = false;
            self.terminal.write_bytes(b"BREAK\r\n");
            true
        } else {
            false
        }
    }

    /// The bytes of the statement currently being executed — either a stored record's body
    /// (`current_line`, sans header) or the direct-mode line.
    pub(crate) fn statement_text(&self) -> &[u8] {
        self.text_for(self.current_line)
    }

    /// The body of whichever line `line` names — a stored record (sans header) or, for `None`,
    /// the direct-mode line. Lets the dispatcher compute a `FOR`/`GOSUB` resume point for a line
    /// other than the one currently executing, without touching the cursor itself.
    pub(crate) fn text_for(&self, line: LinePtr) -> &[u8] {
        match line {
            Some(offset) => {
                let program = self.buffer.program_slice();
                let header = &program[offset..offset + constants::RECORD_HEADER_BYTES];
                let length = header[2] as usize;
                &program[offset + constants::RECORD_HEADER_BYTES..offset + length]
            }
            None => &self.direct_buffer,
        }
    }

    /// Where execution lands after `line` runs off its last statement: the successor record's
    /// header, or `None` once the program buffer is exhausted.
    pub(crate) fn next_line_point(&self, line: LinePtr) -> (LinePtr, usize) {
        match line {
            Some(offset) => {
                let program = self.buffer.program_slice();
                let length = program[offset + 2] as usize;
                let next = offset + length;
                if next >= program.len() {
                    (None, 0)
                } else {
                    (Some(next), 0)
                }
            }
            None => (None, 0),
        }
    }

    /// The resume point a `NextStatement` post-condition would land on for `(line, pos)`: past a
    /// `:` separator if one follows, otherwise the start of the next line. `FOR`/`GOSUB` frames
    /// record this so `NEXT`/`RETURN` can jump back to exactly where normal fall-through would
    /// have gone.
    pub(crate) fn advance_point(&self, line: LinePtr, pos: usize) -> (LinePtr, usize) {
        if crate::scan::peek(self.text_for(line), pos) == Some(b':') {
            (line, pos + 1)
        } else {
            self.next_line_point(line)
        }
    }

    /// `cold start`: empties the program, zeroes variables (spec.md glossary).
    pub fn cold_start(&mut self) {
        self.buffer.reset_program();
        self.buffer.reset_stack();
        self.buffer.reset_variables();
        self.current_line = None;
        self.error = None;
    }

    /// `NEW`: empties the program store, leaves variables undefined (spec.md §4.E).
    pub(crate) fn new_program(&mut self) {
        self.buffer.reset_program();
        self.buffer.reset_stack();
        self.current_line = None;
    }

    /// `RUN`: resets the execution cursor to the first record (spec.md §4.E).
    pub fn run(&mut self) {
        self.buffer.reset_stack();
        let first = program_store::find(&self.buffer, constants::LINE_NO_DIRECT + 1);
        if first >= self.buffer.program_slice().len() {
            return;
        }
        self.current_line = Some(first);
        self.txtpos = 0;
        self.drive();
    }

    /// Executes an unnumbered line once, then discards it (spec.md §4.G step 4, "Direct mode").
    pub(crate) fn execute_direct(&mut self, line: Vec<u8>) {
        self.current_line = None;
        self.direct_buffer = line;
        self.txtpos = 0;
        self.drive();
    }

    /// Drives statements until the dispatcher hands control back to the prompt.
    pub(crate) fn drive(&mut self) {
        loop {
            if self.check_break() {
                return;
            }
            if self.current_line.is_none() && self.direct_buffer.is_empty() {
                return;
            }
            self.error = None;
            use crate::dispatcher::PostCondition::*;
            match self.dispatch_statement() {
                // Most statements fall through as NextStatement; DoNothing is for handlers
                // (comments, the bare `:` separator) that already consumed to end-of-statement
                // themselves — the driver's action is identical either way.
                DoNothing | NextStatement => {
                    if !self.advance_past_colon() {
                        self.advance_line();
                    }
                }
                NextLine => self.advance_line(),
                ExecLine => self.txtpos = 0,
                Loop => {}
                Prompt => {
                    self.direct_buffer.clear();
                    return;
                }
                WarmReset => {
                    if let Some(kind) = self.error {
                        self.report_error(kind);
                    }
                    self.direct_buffer.clear();
                    return;
                }
            }
        }
    }

    fn advance_past_colon(&mut self) -> bool {
        let text = self.statement_text();
        if crate::scan::peek(text, self.txtpos) == Some(b':') {
            self.txtpos += 1;
            true
        } else {
            false
        }
    }

    fn advance_line(&mut self) {
        let (next_line, txtpos) = self.next_line_point(self.current_line);
        if next_line.is_none() {
            self.direct_buffer.clear();
        }
        self.current_line = next_line;
        self.txtpos = txtpos;
    }

    /// Component H: prints the canonical message, and for a syntax error, the offending line
    /// with a caret substituted at `txtpos` (spec.md §4.H). Bracketed in the "error" text color
    /// with paper color 0 (spec.md §7), restored to whatever `COLOR` last set afterward.
    pub(crate) fn report_error(&mut self, kind: ErrorKind) {
        let pen_color = self.pen_color;
        let paper_color = self.paper_color;
        self.terminal.write_byte(screen_opcode::SET_PEN);
        self.terminal.write_byte(constants::ERROR_TEXT_COLOR);
        self.terminal.write_byte(screen_opcode::SET_PAPER);
        self.terminal.write_byte(0);

        if kind == ErrorKind::Syntax {
            let mut line = self.statement_text().to_vec();
            if let Some(byte) = line.get_mut(self.txtpos) {
                *byte = b'^';
            } else {
                line.push(b'^');
            }
            self.terminal.write_bytes(&line);
            self.terminal.write_bytes(b"\r\n");
        }
        self.terminal.write_bytes(kind.message().as_bytes());
        self.terminal.write_bytes(b"\r\n");

        self.terminal.write_byte(screen_opcode::SET_PEN);
        self.terminal.write_byte(pen_color);
        self.terminal.write_byte(screen_opcode::SET_PAPER);
        self.terminal.write_byte(paper_color);
    }
}
