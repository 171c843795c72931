//! Component F — Control-Flow Stack (spec.md §3, §4.F).
//!
//! Frames are tagged unions in the firmware, aliased directly onto stack bytes; DESIGN NOTES §9
//! asks for a discriminated Rust variant instead of that byte-aliasing trick, while still
//! keeping frames physically co-resident with the program in one shared arena (so that pushing a
//! frame can genuinely collide with program growth, and vice versa — the property the stack
//! overflow / out-of-memory tests in spec.md §8 exercise). [`Frame`] is the typed view;
//! [`encode`]/[`decode`] are the only places that turn it into the bytes
//! [`crate::memory::ProgramBuffer`] actually stores, via `byteorder`, matching how the teacher's
//! `Memory`/`Storage` pair always goes through an explicit codec rather than a transmute.

use basic8_util::Endian;
use byteorder::ByteOrder;

use crate::constants::{FOR_FRAME_TAG, GOSUB_FRAME_TAG};
use crate::error::ErrorKind;
use crate::memory::{ProgramBuffer, Storage};

/// `resume_line` is `None` for a `FOR`/`GOSUB` executed in direct mode (spec.md's "Direct mode"
/// glossary entry); otherwise the byte offset of the resumed record's header.
pub type LinePtr = Option<usize>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ForFrame {
    pub var: u8,
    pub terminal: i16,
    pub step: i16,
    pub resume_line: LinePtr,
    pub resume_txt: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GosubFrame {
    pub resume_line: LinePtr,
    pub resume_txt: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Frame {
    For(ForFrame),
    Gosub(GosubFrame),
}

const NO_LINE: u16 = 0xFFFF;
const FOR_FRAME_BYTES: usize = 1 + 1 + 2 + 2 + 2 + 2;
const GOSUB_FRAME_BYTES: usize = 1 + 2 + 2;

fn encode_ptr(ptr: LinePtr) -> u16 {
    match ptr {
        Some(offset) => {
            debug_assert!(offset < NO_LINE as usize);
            offset as u16
        }
        None => NO_LINE,
    }
}

fn decode_ptr(raw: u16) -> LinePtr {
    if raw == NO_LINE {
        None
    } else {
        Some(raw as usize)
    }
}

fn encode(frame: &Frame) -> Vec<u8> {
    match frame {
        Frame::For(f) => {
            let mut bytes = vec![0u8; FOR_FRAME_BYTES];
            bytes[0] = FOR_FRAME_TAG;
            bytes[1] = f.var;
            Endian::write_i16(&mut bytes[2..4], f.terminal);
            Endian::write_i16(&mut bytes[4..6], f.step);
            Endian::write_u16(&mut bytes[6..8], encode_ptr(f.resume_line));
            Endian::write_u16(&mut bytes[8..10], f.resume_txt as u16);
            bytes
        }
        Frame::Gosub(f) => {
            let mut bytes = vec![0u8; GOSUB_FRAME_BYTES];
            bytes[0] = GOSUB_FRAME_TAG;
            Endian::write_u16(&mut bytes[1..3], encode_ptr(f.resume_line));
            Endian::write_u16(&mut bytes[3..5], f.resume_txt as u16);
            bytes
        }
    }
}

/// Decodes the frame starting at `data[0]`, returning it along with its encoded length.
fn decode(data: &[u8]) -> (Frame, usize) {
    match data[0] {
        FOR_FRAME_TAG => {
            let frame = ForFrame {
                var: data[1],
                terminal: Endian::read_i16(&data[2..4]),
                step: Endian::read_i16(&data[4..6]),
                resume_line: decode_ptr(Endian::read_u16(&data[6..8])),
                resume_txt: Endian::read_u16(&data[8..10]) as usize,
            };
            (Frame::For(frame), FOR_FRAME_BYTES)
        }
        GOSUB_FRAME_TAG => {
            let frame = GosubFrame {
                resume_line: decode_ptr(Endian::read_u16(&data[1..3])),
                resume_txt: Endian::read_u16(&data[3..5]) as usize,
            };
            (Frame::Gosub(frame), GOSUB_FRAME_BYTES)
        }
        other => unreachable!("corrupt control-flow stack: tag byte {}", other),
    }
}

pub fn push_for(buffer: &mut ProgramBuffer, frame: ForFrame) -> Result<(), ErrorKind> {
    buffer.push_frame_bytes(&encode(&Frame::For(frame)))
}

pub fn push_gosub(buffer: &mut ProgramBuffer, frame: GosubFrame) -> Result<(), ErrorKind> {
    buffer.push_frame_bytes(&encode(&Frame::Gosub(frame)))
}

/// Scans from the current top (spec.md §4.F: "scan from the current top always encounters the
/// most recent FOR that mentions the referenced variable"), yielding `(absolute offset, frame)`
/// pairs from newest to oldest.
pub fn frames(buffer: &ProgramBuffer) -> impl Iterator<Item = (usize, Frame)> + '_ {
    let base = buffer.stack_ptr();
    let region = buffer.stack_slice();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= region.len() {
            return None;
        }
        let (frame, len) = decode(&region[pos..]);
        let offset = base + pos;
        pos += len;
        Some((offset, frame))
    })
}

/// `NEXT v`: the innermost `FOR` loop must be the one named. `GOSUB` frames above it are
/// transparent and get walked past, but the first `FOR` frame found has to be the match — a
/// different, still-open `FOR` there means mismatched nesting (spec.md §8's C5) and is reported
/// the same way as no match at all.
pub fn find_for(buffer: &ProgramBuffer, var: u8) -> Result<(usize, ForFrame), ErrorKind> {
    for (offset, frame) in frames(buffer) {
        match frame {
            Frame::Gosub(_) => continue,
            Frame::For(f) if f.var == var => return Ok((offset, f)),
            Frame::For(_) => return Err(ErrorKind::JumpPointNotFound),
        }
    }
    Err(ErrorKind::JumpPointNotFound)
}

/// `RETURN`: the first (most recent) `GOSUB` frame. Any `FOR` frames found first are skipped,
/// not popped — they remain on the stack, abandoned, exactly as spec.md §4.F describes.
pub fn find_gosub(buffer: &ProgramBuffer) -> Option<(usize, GosubFrame)> {
    frames(buffer).find_map(|(offset, frame)| match frame {
        Frame::Gosub(f) => Some((offset, f)),
        _ => None,
    })
}

/// Re-encodes the frame at `offset` in place (same tag, same size) after `NEXT` advances its
/// loop variable.
pub fn update_for(buffer: &mut ProgramBuffer, offset: usize, frame: &ForFrame) {
    let bytes = encode(&Frame::For(*frame));
    buffer
        .borrow_slice_mut(offset, bytes.len())
        .expect("frame offset came from a live scan")
        .copy_from_slice(&bytes);
}

/// Removes exactly the frame at `offset` (size `len`), shifting anything newer back together so
/// older frames below it are left untouched. Used by `NEXT`'s fall-through pop and by `RETURN`.
pub fn remove(buffer: &mut ProgramBuffer, offset: usize, len: usize) {
    buffer.remove_frame_bytes(offset, len);
}

pub fn frame_len(frame: &Frame) -> usize {
    match frame {
        Frame::For(_) => FOR_FRAME_BYTES,
        Frame::Gosub(_) => GOSUB_FRAME_BYTES,
    }
}

#[cfg(test)]
mod test;
