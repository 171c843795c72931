//! `AudioSink` adapters (spec.md §6 "Audio command stream").
//!
//! A host machine has no four-channel wavetable synth attached, so [`LoggingAudioSink`] is the
//! "real" adapter: it traces every opcode through the `log` facade at debug level instead of
//! silently dropping it, so `RUST_LOG=debug` shows the same command stream a real synth chip
//! would receive (SPEC_FULL.md §3.2).

use log::debug;

use basic8::shims::AudioSink;

#[derive(Default)]
pub struct LoggingAudioSink;

impl AudioSink for LoggingAudioSink {
    fn play(&mut self) {
        debug!("audio: play");
    }

    fn stop(&mut self) {
        debug!("audio: stop");
    }

    fn set_tempo(&mut self, tempo: u8) {
        debug!("audio: set_tempo({})", tempo);
    }

    fn enable_channel(&mut self, channel: u8) {
        debug!("audio: enable_channel({})", channel);
    }

    fn disable_channel(&mut self, channel: u8) {
        debug!("audio: disable_channel({})", channel);
    }

    fn clear_channel(&mut self, channel: u8) {
        debug!("audio: clear_channel({})", channel);
    }

    fn insert_notes(&mut self, channel: u8, notes: &[u8]) {
        debug!("audio: insert_notes({}, {:?})", channel, notes);
    }

    fn abort(&mut self) {
        debug!("audio: abort");
    }
}

/// A deterministic in-memory double recording every call verbatim, for integration tests that
/// assert on the exact command sequence a `SOUND`/`TONE`/`TEMPO` statement produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AudioCall {
    Play,
    Stop,
    SetTempo(u8),
    EnableChannel(u8),
    DisableChannel(u8),
    ClearChannel(u8),
    InsertNotes(u8, u8, u8),
    Abort,
}

#[derive(Default)]
pub struct InMemoryAudioSink {
    pub calls: Vec<AudioCall>,
}

impl InMemoryAudioSink {
    pub fn new() -> InMemoryAudioSink {
        InMemoryAudioSink::default()
    }
}

impl AudioSink for InMemoryAudioSink {
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
        self.calls
            .push(AudioCall::InsertNotes(channel, notes[0], notes[1]));
    }

    fn abort(&mut self) {
        self.calls.push(AudioCall::Abort);
    }
}
