//! Component B — Program Store (spec.md §3, §4.B).
//!
//! The stored program is a packed, ascending-by-`line_no` sequence of
//! `{ line_no: u16, length: u8, body }` records living in
//! [`crate::memory::ProgramBuffer`]'s program region. `length` counts the whole record —
//! header and trailing LF included — so a record's span on disk is exactly
//! `[offset, offset + length)`.

use basic8_util::Endian;
use byteorder::ByteOrder;

use crate::constants::RECORD_HEADER_BYTES;
use crate::error::ErrorKind;
use crate::memory::ProgramBuffer;
use crate::shims::{CharIo, Stream};

fn record_header(buffer: &ProgramBuffer, offset: usize) -> (u16, u8) {
    let header = &buffer.program_slice()[offset..offset + RECORD_HEADER_BYTES];
    (Endian::read_u16(&header[0..2]), header[2])
}

/// First record whose stored number is `>= line_no`, else `program_end` (spec.md §4.B `find`).
pub fn find(buffer: &ProgramBuffer, line_no: u16) -> usize {
    let mut offset = 0;
    let end = buffer.program_slice().len();
    while offset < end {
        let (stored, length) = record_header(buffer, offset);
        if stored >= line_no {
            return offset;
        }
        offset += length as usize;
    }
    end
}

/// Removes any existing record numbered `line_no`, then splices in a freshly built one.
/// `body` must end in `LF` and exclude the header (spec.md §4.B `insert`, §4.G step 6).
pub fn insert(buffer: &mut ProgramBuffer, line_no: u16, body: &[u8]) -> Result<(), ErrorKind> {
    remove(buffer, line_no);

    let length = RECORD_HEADER_BYTES + body.len();
    let mut record = Vec::with_capacity(length);
    let mut header = [0u8; 2];
    Endian::write_u16(&mut header, line_no);
    record.extend_from_slice(&header);
    record.push(length as u8);
    record.extend_from_slice(body);

    let at = find(buffer, line_no);
    buffer.insert_program_bytes(at, &record)
}

/// Deletes the record numbered `line_no`, if present. A no-op otherwise (spec.md §4.G step 5).
pub fn remove(buffer: &mut ProgramBuffer, line_no: u16) {
    let at = find(buffer, line_no);
    if at >= buffer.program_slice().len() {
        return;
    }
    let (stored, length) = record_header(buffer, at);
    if stored == line_no {
        buffer.remove_program_bytes(at, length as usize);
    }
}

/// Emits every record from `find(line_no)` to `program_end` as `"<n> <body>"`, `body` already
/// ending in `LF` (spec.md §4.B `list`, §4.E `LIST`).
pub fn list(buffer: &ProgramBuffer, line_no: u16, out: &mut dyn CharIo) {
    let mut offset = find(buffer, line_no);
    let end = buffer.program_slice().len();
    while offset < end {
        let (stored, length) = record_header(buffer, offset);
        let body = &buffer.program_slice()[offset + RECORD_HEADER_BYTES..offset + length as usize];
        out.write_bytes(stored.to_string().as_bytes());
        out.write_byte(b' ');
        out.write_bytes(body);
        offset += length as usize;
    }
}

/// `ESAVE`/`SSAVE`: the same text form `list` writes to the terminal, to a persistent stream,
/// terminated by a single `0` byte (spec.md §6 "Persistent stores").
pub fn save(buffer: &ProgramBuffer, stream: &mut dyn Stream) {
    struct StreamSink<'a>(&'a mut dyn Stream);
    impl<'a> CharIo for StreamSink<'a> {
        fn read_byte(&mut self) -> Option<u8> {
            None
        }
        fn write_byte(&mut self, byte: u8) {
            self.0.putc(byte);
        }
    }

    let mut sink = StreamSink(stream);
    list(buffer, 0, &mut sink);
    sink.0.putc(0);
}

/// `ELOAD`/`SLOAD`: reads `save`'s text form back in one pass and inserts every line (spec.md
/// §4.B `load`, property P3). The firmware instead redirects the line editor's ingest source to
/// the stream and replays each line through the normal interactive path; since EEPROM/serial
/// ingest never needs that path's control-key handling, reading the whole stream directly here is
/// observably the same for a forward-sequential, non-interactive source (see `DESIGN.md`).
pub fn load(buffer: &mut ProgramBuffer, stream: &mut dyn Stream) -> Result<(), ErrorKind> {
    let mut line = Vec::new();
    loop {
        let byte = stream.getc();
        if byte == 0 {
            break;
        }
        if byte == b'\n' {
            if let Some(space) = line.iter().position(|&b| b == b' ') {
                if let Ok(text) = std::str::from_utf8(&line[..space]) {
                    if let Ok(line_no) = text.parse::<u16>() {
                        let mut body = line[space + 1..].to_vec();
                        body.push(b'\n');
                        insert(buffer, line_no, &body)?;
                    }
                }
            }
            line.clear();
        } else {
            line.push(byte);
        }
    }
    Ok(())
}
