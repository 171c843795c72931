//! The flat program buffer (spec.md §3).
//!
//! A single contiguous byte region holds, at once: the packed program records (growing up from
//! address 0), a fixed 26-slot variable block near the top, and the control-flow-frame stack
//! (growing down). This keeps the teacher's flat-memory-plus-moving-boundaries idea (see
//! `vcpu`'s `Memory`/`Storage`) but expresses the three regions as typed indices over one owned
//! `Vec<u8>` with bounds-checked access, per DESIGN NOTES §9, rather than as raw pointer
//! arithmetic into file-scope globals.

use basic8_util::Endian;
use byteorder::ByteOrder;

use crate::constants;
use crate::error::ErrorKind;

/// Bounds-checked byte access into the program buffer.
///
/// Mirrors the shape of the teacher's `Storage` trait (`length`/`check_range`/`borrow_slice`),
/// generalized to report a [`ErrorKind`] instead of `()` since every caller ultimately needs one
/// to hand to the error reporter.
pub trait Storage {
    /// Total addressable length of the buffer.
    ///
    /// # Examples
    /// ```
    /// use basic8::memory::{ProgramBuffer, Storage};
    ///
    /// let buf = ProgramBuffer::new(256);
    /// assert_eq!(buf.length(), 256);
    /// ```
    fn length(&self) -> usize;

    fn check_range(&self, address: usize, length: usize) -> bool {
        address <= self.length() && length <= self.length() - address
    }

    fn borrow_slice(&self, address: usize, length: usize) -> Result<&[u8], ErrorKind>;
    fn borrow_slice_mut(&mut self, address: usize, length: usize) -> Result<&mut [u8], ErrorKind>;

    /// `PEEK` (spec.md §4.D): a single byte at `address`.
    ///
    /// # Examples
    /// ```
    /// use basic8::memory::{ProgramBuffer, Storage};
    ///
    /// let buf = ProgramBuffer::new(16);
    /// assert_eq!(buf.read_byte(0), Ok(0));
    /// assert!(buf.read_byte(16).is_err());
    /// ```
    fn read_byte(&self, address: usize) -> Result<u8, ErrorKind> {
        Ok(self.borrow_slice(address, 1)?[0])
    }

    /// `POKE` (spec.md §4.E): stores one byte. `value` must already be in `0..=255`, which is
    /// trivially true for `u8`; the statement handler is responsible for rejecting out-of-range
    /// expression results (error 18) before it ever reaches here.
    fn write_byte(&mut self, address: usize, value: u8) -> Result<(), ErrorKind> {
        self.borrow_slice_mut(address, 1)?[0] = value;
        Ok(())
    }

    fn read_i16(&self, address: usize) -> Result<i16, ErrorKind> {
        Ok(Endian::read_i16(self.borrow_slice(address, 2)?))
    }

    fn write_i16(&mut self, address: usize, value: i16) -> Result<(), ErrorKind> {
        Endian::write_i16(self.borrow_slice_mut(address, 2)?, value);
        Ok(())
    }
}

/// The three moving boundaries of spec.md §3, plus the fixed top of the variable block.
///
/// Layout, low to high address:
///
/// ```text
/// [0, program_end)            program records, growing upward
/// [program_end, stack_ptr)    free space
/// [stack_ptr, variables_begin) control-flow frames, growing downward
/// [variables_begin, length)   26 fixed i16 variable slots
/// ```
///
/// `variables_begin` is fixed for the buffer's lifetime at `length - VARIABLE_REGION_BYTES`; it
/// plays the role of spec.md §3's "stack_limit" upper bound for the stack region. The *lower*
/// bound for the stack — spec.md §4.F's overflow check — is the dynamic `program_end`: stack and
/// program collide when they'd otherwise overlap, which is the only place the two regions can
/// meet since `variables_begin` never moves. See `DESIGN.md` for why this reading was chosen
/// over the other ways §3/§4.F's shared term "stack_limit" could be parsed.
pub struct ProgramBuffer {
    data: Vec<u8>,
    program_end: usize,
    stack_ptr: usize,
    variables_begin: usize,
}

impl ProgramBuffer {
    /// Constructs a buffer of the given total length, with an empty program, an empty
    /// control-flow stack, and variables implicitly zeroed (cold-start semantics; see
    /// [`Self::reset_variables`] for the warm-reset/`NEW` distinction).
    pub fn new(length: usize) -> ProgramBuffer {
        let variables_begin = length.saturating_sub(constants::VARIABLE_REGION_BYTES);
        ProgramBuffer {
            data: vec![0; length],
            program_end: 0,
            stack_ptr: variables_begin,
            variables_begin,
        }
    }

    pub fn program_end(&self) -> usize {
        self.program_end
    }

    pub fn stack_ptr(&self) -> usize {
        self.stack_ptr
    }

    pub fn variables_begin(&self) -> usize {
        self.variables_begin
    }

    /// Bytes available for the program and the stack to grow into (`MEM`, spec.md §4.E).
    pub fn free_bytes(&self) -> usize {
        self.stack_ptr - self.program_end
    }

    /// The bytes making up the packed program records.
    pub fn program_slice(&self) -> &[u8] {
        &self.data[..self.program_end]
    }

    /// Inserts `bytes` at `at` (which must be `<= program_end`), shifting everything from `at` to
    /// `program_end` upward. Used by the Program Store (spec.md §4.B) to splice a new record in
    /// sorted position.
    pub fn insert_program_bytes(&mut self, at: usize, bytes: &[u8]) -> Result<(), ErrorKind> {
        debug_assert!(at <= self.program_end);
        let new_end = self.program_end + bytes.len();
        if new_end > self.stack_ptr {
            return Err(ErrorKind::StackOverflow);
        }

        self.data.copy_within(at..self.program_end, at + bytes.len());
        self.data[at..at + bytes.len()].copy_from_slice(bytes);
        self.program_end = new_end;
        Ok(())
    }

    /// Removes `length` bytes at `at`, shifting the remainder of the program down to close the
    /// gap.
    pub fn remove_program_bytes(&mut self, at: usize, length: usize) {
        debug_assert!(at + length <= self.program_end);
        self.data.copy_within(at + length..self.program_end, at);
        self.program_end -= length;
    }

    pub fn reset_program(&mut self) {
        self.program_end = 0;
    }

    /// `A..Z` -> the fixed offset of that variable's two-byte slot.
    fn variable_offset(&self, letter: u8) -> usize {
        self.variables_begin + (letter - b'A') as usize * constants::VARIABLE_BYTES
    }

    pub fn get_variable(&self, letter: u8) -> i16 {
        Endian::read_i16(&self.data[self.variable_offset(letter)..][..2])
    }

    pub fn set_variable(&mut self, letter: u8, value: i16) {
        let offset = self.variable_offset(letter);
        Endian::write_i16(&mut self.data[offset..][..2], value);
    }

    pub fn reset_variables(&mut self) {
        for byte in &mut self.data[self.variables_begin..] {
            *byte = 0;
        }
    }

    /// Pushes `bytes` onto the control-flow stack (spec.md §4.F), growing it downward.
    pub fn push_frame_bytes(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        if self.stack_ptr < self.program_end + bytes.len() {
            return Err(ErrorKind::StackOverflow);
        }
        self.stack_ptr -= bytes.len();
        self.data[self.stack_ptr..self.stack_ptr + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// The live portion of the control-flow stack, from `stack_ptr` up to `variables_begin`,
    /// i.e. most-recently-pushed frame first.
    pub fn stack_slice(&self) -> &[u8] {
        &self.data[self.stack_ptr..self.variables_begin]
    }

    /// Discards everything below `new_stack_ptr`, used when `NEXT`/`RETURN` pop a frame.
    pub fn set_stack_ptr(&mut self, new_stack_ptr: usize) {
        debug_assert!(new_stack_ptr >= self.program_end && new_stack_ptr <= self.variables_begin);
        self.stack_ptr = new_stack_ptr;
    }

    /// Removes exactly the frame occupying `[at, at + length)`, shifting anything newer (the
    /// bytes between `stack_ptr` and `at`) up to close the gap so any older frames below `at` are
    /// left untouched. Lets `NEXT`/`RETURN` drop a single frame that isn't necessarily the one on
    /// top, without disturbing frames that sit below it (spec.md §4.F).
    pub fn remove_frame_bytes(&mut self, at: usize, length: usize) {
        debug_assert!(self.stack_ptr <= at && at + length <= self.variables_begin);
        self.data.copy_within(self.stack_ptr..at, self.stack_ptr + length);
        self.stack_ptr += length;
    }

    pub fn reset_stack(&mut self) {
        self.stack_ptr = self.variables_begin;
    }
}

impl Storage for ProgramBuffer {
    fn length(&self) -> usize {
        self.data.len()
    }

    fn borrow_slice(&self, address: usize, length: usize) -> Result<&[u8], ErrorKind> {
        if self.check_range(address, length) {
            Ok(&self.data[address..address + length])
        } else {
            Err(ErrorKind::OutOfRange)
        }
    }

    fn borrow_slice_mut(&mut self, address: usize, length: usize) -> Result<&mut [u8], ErrorKind> {
        if self.check_range(address, length) {
            Ok(&mut self.data[address..address + length])
        } else {
            Err(ErrorKind::OutOfRange)
        }
    }
}
