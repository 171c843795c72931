//! `Stream` adapters for the EEPROM and serial persistent stores (spec.md §6 "Persistent
//! stores"): forward-sequential byte streams with `getc`/`putc` and an implicit position. Neither
//! `getc` nor `putc` ever rewinds the stream itself — exactly like the reference hardware's
//! EEPROM write head, which only resets on a fresh device or an explicit erase, not on every
//! `ESAVE` (see `DESIGN.md`).

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use basic8::shims::Stream;

/// A persistent store backed by a single file, read and written one byte at a time through the
/// OS's own file cursor — the simplest honest stand-in for a device with an implicit position.
/// `getc` past end-of-file returns `0`, matching spec.md §6's "a read returns 0 on end".
pub struct FileStream {
    file: File,
}

impl FileStream {
    pub fn open(path: impl AsRef<Path>) -> io::Result<FileStream> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(FileStream { file })
    }
}

impl Stream for FileStream {
    fn getc(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        match self.file.read(&mut byte) {
            Ok(1) => byte[0],
            _ => 0,
        }
    }

    fn putc(&mut self, byte: u8) {
        let _ = self.file.write_all(&[byte]);
    }
}

/// A deterministic in-memory double of a persistent stream, for tests that exercise
/// `ESAVE`/`ELOAD`/`SSAVE`/`SLOAD` without touching the filesystem.
#[derive(Default)]
pub struct InMemoryStream {
    buf: Vec<u8>,
    pos: usize,
}

impl InMemoryStream {
    pub fn new() -> InMemoryStream {
        InMemoryStream::default()
    }

    /// Seeds the stream with pre-written content and rewinds it, as if freshly loaded from a
    /// device that already held a saved program.
    pub fn with_content(content: &[u8]) -> InMemoryStream {
        InMemoryStream {
            buf: content.to_vec(),
            pos: 0,
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.buf
    }
}

impl Stream for InMemoryStream {
    fn getc(&mut self) -> u8 {
        let byte = self.buf.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    fn putc(&mut self, byte: u8) {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
        } else {
            self.buf.push(byte);
        }
        self.pos += 1;
    }
}
