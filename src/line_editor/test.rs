use super::*;
use crate::shims::{AudioSink, Clock, Gpio, Stream};

struct ScriptedTerminal {
    input: std::collections::VecDeque<u8>,
    output: Vec<u8>,
}

impl CharIo for ScriptedTerminal {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }
    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

struct NullGpio;
impl Gpio for NullGpio {
    fn set_direction(&mut self, _pin: u8, _output: bool) -> Result<(), ErrorKind> {
        Ok(())
    }
    fn digital_read(&mut self, _pin: u8) -> Result<bool, ErrorKind> {
        Ok(false)
    }
    fn digital_write(&mut self, _pin: u8, _high: bool) -> Result<(), ErrorKind> {
        Ok(())
    }
    fn analog_read(&mut self, _pin: u8) -> Result<u16, ErrorKind> {
        Ok(0)
    }
}

struct NullAudio;
impl AudioSink for NullAudio {
    fn play(&mut self) {}
    fn stop(&mut self) {}
    fn set_tempo(&mut self, _tempo: u8) {}
    fn enable_channel(&mut self, _channel: u8) {}
    fn disable_channel(&mut self, _channel: u8) {}
    fn clear_channel(&mut self, _channel: u8) {}
    fn insert_notes(&mut self, _channel: u8, _notes: &[u8]) {}
    fn abort(&mut self) {}
}

struct NullClock;
impl Clock for NullClock {
    fn delay_ms(&mut self, _ms: u32) {}
    fn free_running_seed(&mut self) -> u32 {
        0
    }
}

struct NullStream;
impl Stream for NullStream {
    fn getc(&mut self) -> u8 {
        0
    }
    fn putc(&mut self, _byte: u8) {}
}

fn interpreter_with(input: &[u8]) -> Interpreter {
    Interpreter::new(
        512,
        Box::new(NullGpio),
        Box::new(NullAudio),
        Box::new(NullClock),
        Box::new(ScriptedTerminal {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }),
        Box::new(NullStream),
        Box::new(NullStream),
    )
}

#[test]
fn read_line_stops_at_lf_and_does_not_include_it() {
    let mut interp = interpreter_with(b"10 PRINT 1\n");
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"10 PRINT 1\n");
}

#[test]
fn read_line_treats_cr_as_a_terminator_too() {
    let mut interp = interpreter_with(b"PRINT 1\r");
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"PRINT 1\n");
}

#[test]
fn read_line_returns_none_on_immediate_eof() {
    let mut interp = interpreter_with(b"");
    assert_eq!(interp.read_line(), None);
}

#[test]
fn backspace_removes_the_previous_character() {
    let mut interp = interpreter_with(b"AB\x08C\n");
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"AC\n");
}

#[test]
fn backspace_at_start_of_line_rings_the_bell_and_changes_nothing() {
    let mut interp = interpreter_with(&[constants::BS, b'A', constants::LF]);
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"A\n");
}

#[test]
fn left_arrow_then_insert_splices_into_the_middle() {
    let mut input = b"AC".to_vec();
    input.push(control_key::LEFT);
    input.push(b'B');
    input.push(constants::LF);
    let mut interp = interpreter_with(&input);
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"ABC\n");
}

#[test]
fn home_then_end_round_trip_leaves_the_line_unchanged() {
    let mut input = b"AB".to_vec();
    input.push(control_key::HOME);
    input.push(control_key::END);
    input.push(b'C');
    input.push(constants::LF);
    let mut interp = interpreter_with(&input);
    let line = interp.read_line().unwrap();
    assert_eq!(line, b"ABC\n");
}

#[test]
fn normalize_case_upper_cases_outside_quotes_only() {
    let mut line = b"print \"hi there\" ; a\n".to_vec();
    normalize_case(&mut line);
    assert_eq!(&line, b"PRINT \"hi there\" ; A\n");
}

#[test]
fn normalize_case_handles_single_quotes_too() {
    let mut line = b"a = 'xy'\n".to_vec();
    normalize_case(&mut line);
    assert_eq!(&line, b"A = 'xy'\n");
}

#[test]
fn parse_line_number_reads_leading_digits_and_reports_their_width() {
    assert_eq!(parse_line_number(b"10 PRINT 1\n"), (Some(10), 2));
}

#[test]
fn parse_line_number_returns_none_for_a_direct_mode_statement() {
    assert_eq!(parse_line_number(b"PRINT 1\n"), (None, 0));
}

#[test]
fn parse_line_number_saturates_at_the_sentinel_on_overflow() {
    let (number, _) = parse_line_number(b"999999 PRINT 1\n");
    assert_eq!(number, Some(constants::LINE_NO_SENTINEL));
}

#[test]
fn ingest_line_without_a_number_runs_once_and_leaves_no_stored_line() {
    let mut interp = interpreter_with(b"");
    interp.ingest_line(b"PRINT 1\n".to_vec());
    assert_eq!(interp.buffer().program_slice().len(), 0);
}

#[test]
fn ingest_line_with_a_number_and_a_body_stores_the_line() {
    let mut interp = interpreter_with(b"");
    interp.ingest_line(b"10 PRINT 1\n".to_vec());
    let mut out = Vec::new();
    program_store::list(interp.buffer(), 0, &mut TestSink(&mut out));
    assert_eq!(out, b"10 PRINT 1\n");
}

#[test]
fn ingest_line_with_a_number_and_an_empty_body_deletes_the_line() {
    let mut interp = interpreter_with(b"");
    interp.ingest_line(b"10 PRINT 1\n".to_vec());
    interp.ingest_line(b"10\n".to_vec());
    assert_eq!(interp.buffer().program_slice().len(), 0);
}

struct TestSink<'a>(&'a mut Vec<u8>);
impl<'a> CharIo for TestSink<'a> {
    fn read_byte(&mut self) -> Option<u8> {
        None
    }
    fn write_byte(&mut self, byte: u8) {
        self.0.push(byte);
    }
}
