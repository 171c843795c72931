use super::*;
use crate::shims::Stream;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct RecordingTerminal {
    input: VecDeque<u8>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl CharIo for RecordingTerminal {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }
    fn write_byte(&mut self, byte: u8) {
        self.output.borrow_mut().push(byte);
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

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum AudioCall {
    Play,
    Stop,
    SetTempo(u8),
    EnableChannel(u8),
    DisableChannel(u8),
    ClearChannel(u8),
    Abort,
}

#[derive(Default)]
struct RecordingAudio {
    calls: Vec<AudioCall>,
    notes: Vec<(u8, u8, u8)>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self) {
        self.calls.push(AudioCall::Play);
    }
    fn stop(&mut self) {
        self.calls.push(AudioCall::Stop);
    }
    fn set_tempo(&mut self, tempo: u8) {
        self.calls.push(AudioCall::SetTempo(tempo));
    }
    fn enable_channel(&mut self, channel: u8) {
        self.calls.push(AudioCall::EnableChannel(channel));
    }
    fn disable_channel(&mut self, channel: u8) {
        self.calls.push(AudioCall::DisableChannel(channel));
    }
    fn clear_channel(&mut self, channel: u8) {
        self.calls.push(AudioCall::ClearChannel(channel));
    }
    fn insert_notes(&mut self, channel: u8, notes: &[u8]) {
        self.notes.push((channel, notes[0], notes[1]));
    }
    fn abort(&mut self) {
        self.calls.push(AudioCall::Abort);
    }
}

struct NullClock;
impl Clock for NullClock {
    fn delay_ms(&mut self, _ms: u32) {}
    fn free_running_seed(&mut self) -> u32 {
        0
    }
}

struct VecStream {
    buf: Vec<u8>,
    pos: usize,
}

impl VecStream {
    fn new() -> VecStream {
        VecStream {
            buf: Vec::new(),
            pos: 0,
        }
    }
}

impl Stream for VecStream {
    fn getc(&mut self) -> u8 {
        let byte = self.buf.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }
    fn putc(&mut self, byte: u8) {
        self.buf.push(byte);
    }
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

fn build(memory: usize, input: &[u8]) -> (Interpreter, Rc<RefCell<Vec<u8>>>) {
    let output = Rc::new(RefCell::new(Vec::new()));
    let terminal = RecordingTerminal {
        input: input.iter().copied().collect(),
        output: output.clone(),
    };
    let interp = Interpreter::new(
        memory,
        Box::new(NullGpio),
        Box::new(RecordingAudio::default()),
        Box::new(NullClock),
        Box::new(terminal),
        Box::new(VecStream::new()),
        Box::new(VecStream::new()),
    );
    (interp, output)
}

#[test]
fn assignment_sets_the_named_variable() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"A=5\n".to_vec());
    assert_eq!(interp.buffer.get_variable(b'A'), 5);
}

#[test]
fn assignment_accepts_the_optional_let_keyword() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"LET B=7\n".to_vec());
    assert_eq!(interp.buffer.get_variable(b'B'), 7);
}

#[test]
fn assignment_to_a_multi_letter_name_is_rejected() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"AB=5\n".to_vec());
    assert_eq!(&*out.borrow(), b"INVALID VARIABLE NAME\r\n");
    assert_eq!(interp.error, Some(ErrorKind::InvalidVariableName));
}

#[test]
fn if_true_runs_the_rest_of_the_line() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"IF 1 PRINT 9\n".to_vec());
    assert_eq!(&*out.borrow(), b"9\r\n");
}

#[test]
fn if_false_skips_the_rest_of_the_line() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"IF 0 PRINT 9\n".to_vec());
    assert_eq!(&*out.borrow(), b"");
}

#[test]
fn goto_skips_the_line_in_between() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"PRINT 1\n").unwrap();
    program_store::insert(&mut interp.buffer, 20, b"GOTO 40\n").unwrap();
    program_store::insert(&mut interp.buffer, 30, b"PRINT 2\n").unwrap();
    program_store::insert(&mut interp.buffer, 40, b"PRINT 3\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"1\r\n3\r\n");
}

#[test]
fn goto_past_the_last_line_ends_the_program_like_falling_off_the_end() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"GOTO 999\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"");
    assert!(interp.current_line.is_none());
}

#[test]
fn gosub_then_return_resumes_right_after_the_call() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"GOSUB 100:PRINT A\n").unwrap();
    program_store::insert(&mut interp.buffer, 100, b"A=5:RETURN\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"5\r\n");
}

#[test]
fn return_with_no_matching_gosub_reports_jump_point_not_found() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"RETURN\n".to_vec());
    assert_eq!(&*out.borrow(), b"JUMP POINT NOT FOUND\r\n");
}

#[test]
fn for_next_loops_the_exact_number_of_times() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"FOR I=1 TO 3:PRINT I:NEXT I\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"1\r\n2\r\n3\r\n");
}

#[test]
fn for_next_honors_a_negative_step() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"FOR I=3 TO 1 STEP -1:PRINT I:NEXT I\n")
        .unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"3\r\n2\r\n1\r\n");
}

#[test]
fn next_naming_a_different_variable_than_the_open_for_is_rejected() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"FOR I=1 TO 3:NEXT J\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"JUMP POINT NOT FOUND\r\n");
}

#[test]
fn print_separates_commas_with_a_space_and_semicolons_with_nothing() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"PRINT 1,2;3\n".to_vec());
    assert_eq!(&*out.borrow(), b"1 23\r\n");
}

#[test]
fn print_trailing_semicolon_suppresses_the_newline() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"PRINT 1;\n".to_vec());
    assert_eq!(&*out.borrow(), b"1");
}

#[test]
fn print_tab_pads_up_to_the_requested_column() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"PRINT 1;TAB(5);2\n".to_vec());
    assert_eq!(&*out.borrow(), b"1    2\r\n");
}

#[test]
fn print_echoes_a_quoted_string_verbatim() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"PRINT \"HI\"\n".to_vec());
    assert_eq!(&*out.borrow(), b"HI\r\n");
}

#[test]
fn question_mark_is_an_alias_for_print() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"?1\n".to_vec());
    assert_eq!(&*out.borrow(), b"1\r\n");
}

#[test]
fn poke_rejects_an_address_beyond_the_buffer() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"POKE 5000,1\n".to_vec());
    assert_eq!(&*out.borrow(), b"OUT OF RANGE\r\n");
    assert_eq!(interp.error, Some(ErrorKind::OutOfRange));
}

#[test]
fn poke_rejects_a_value_outside_a_byte() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"POKE 0,999\n".to_vec());
    assert_eq!(interp.error, Some(ErrorKind::ExpectedByte));
}

#[test]
fn poke_then_peek_round_trips_a_byte() {
    let (mut interp, out) = build(512, b"");
    interp.execute_direct(b"POKE 0,42:PRINT PEEK(0)\n".to_vec());
    assert_eq!(&*out.borrow(), b"42\r\n");
}

#[test]
fn list_emits_the_stored_program_from_the_given_line() {
    let (mut interp, _out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"PRINT 1\n").unwrap();
    program_store::insert(&mut interp.buffer, 20, b"PRINT 2\n").unwrap();
    interp.execute_direct(b"LIST\n".to_vec());
    // LIST writes straight to the terminal; fetch it back the same way the dispatcher did.
    let mut out = Vec::new();
    program_store::list(&interp.buffer, 0, &mut TestSink(&mut out));
    assert_eq!(out, b"10 PRINT 1\n20 PRINT 2\n");
}

#[test]
fn mem_reports_the_buffers_free_byte_count() {
    let (mut interp, out) = build(512, b"");
    let free = interp.buffer.free_bytes();
    interp.execute_direct(b"MEM\n".to_vec());
    assert_eq!(&*out.borrow(), format!("{} BYTES FREE\r\n", free).as_bytes());
}

#[test]
fn end_stops_the_program_without_running_the_rest() {
    let (mut interp, out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"PRINT 1\n").unwrap();
    program_store::insert(&mut interp.buffer, 20, b"END\n").unwrap();
    program_store::insert(&mut interp.buffer, 30, b"PRINT 2\n").unwrap();
    interp.run();
    assert_eq!(&*out.borrow(), b"1\r\n");
    assert_eq!(interp.error, None);
}

#[test]
fn input_reads_a_signed_number_terminated_by_newline() {
    let (mut interp, _out) = build(512, b"-42\n");
    interp.execute_direct(b"INPUT N\n".to_vec());
    assert_eq!(interp.buffer.get_variable(b'N'), -42);
}

#[test]
fn pinmode_rejects_a_pin_outside_zero_to_seven() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"PINMODE 9,1\n".to_vec());
    assert_eq!(interp.error, Some(ErrorKind::InvalidPin));
}

#[test]
fn clear_validates_a_channel_number_not_a_pin_number() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"CLEAR 5\n".to_vec());
    assert_eq!(interp.error, Some(ErrorKind::OutOfRange));
}

#[test]
fn clear_forwards_a_valid_channel_to_the_audio_sink() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"CLEAR 2\n".to_vec());
    assert_eq!(interp.error, None);
}

#[test]
fn sound_on_enables_the_channel_and_starts_playback() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"SOUND 1,ON\n".to_vec());
    assert_eq!(interp.error, None);
}

#[test]
fn sound_off_disables_the_channel_without_starting_playback() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"SOUND 1,OFF\n".to_vec());
    assert_eq!(interp.error, None);
}

#[test]
fn note_rejects_an_octave_outside_two_to_seven() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"NOTE 1,9,1,1,0\n".to_vec());
    assert_eq!(interp.error, Some(ErrorKind::OutOfRange));
}

#[test]
fn note_packs_a_rest_to_the_documented_constant() {
    assert_eq!(pack_note(1, 2, 13, 1, 0).unwrap(), (1, 144, 0));
}

#[test]
fn note_packs_an_ordinary_pitch_with_the_documented_formula() {
    // octave 3, pitch 4: 24*(3-2) + 2*(4-1) = 30; duration 2, effect 1: (2-1) | (1<<6) = 65
    assert_eq!(pack_note(2, 3, 4, 2, 1).unwrap(), (2, 30, 65));
}

#[test]
fn color_rejects_a_pen_value_outside_zero_to_127() {
    let (mut interp, _out) = build(512, b"");
    interp.execute_direct(b"COLOR 200,0\n".to_vec());
    assert_eq!(interp.error, Some(ErrorKind::ExpectedColor));
}

#[test]
fn cls_writes_the_clear_opcode_and_resets_the_print_column() {
    let (mut interp, out) = build(512, b"");
    interp.print_column = 10;
    interp.execute_direct(b"CLS\n".to_vec());
    assert_eq!(&*out.borrow(), &[screen_opcode::CLEAR][..]);
    assert_eq!(interp.print_column, 0);
}

#[test]
fn esave_then_eload_round_trips_the_stored_program() {
    let (mut interp, _out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"PRINT 1\n").unwrap();
    program_store::insert(&mut interp.buffer, 20, b"PRINT 2\n").unwrap();

    interp.execute_direct(b"ESAVE\n".to_vec());
    interp.buffer.reset_program();
    interp.execute_direct(b"ELOAD\n".to_vec());

    let mut out = Vec::new();
    program_store::list(&interp.buffer, 0, &mut TestSink(&mut out));
    assert_eq!(out, b"10 PRINT 1\n20 PRINT 2\n");
}

#[test]
fn new_clears_the_program_but_run_after_load_stays_unset_by_default() {
    let (mut interp, _out) = build(512, b"");
    program_store::insert(&mut interp.buffer, 10, b"PRINT 1\n").unwrap();
    interp.execute_direct(b"NEW\n".to_vec());
    assert_eq!(interp.buffer.program_slice().len(), 0);
}
