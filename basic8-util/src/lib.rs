/// Endianness used for every multi-byte value packed into the program buffer: variable slots,
/// control-flow frame fields, and `PEEK`/`POKE` multi-byte helpers.
pub type Endian = byteorder::LittleEndian;

/// A static `(keyword bytes, variant)` table, generated by `#[derive(KeywordTable)]`.
///
/// Implementors are small fieldless enums enumerating one of spec.md §4.A's keyword sets
/// (commands, functions, relational operators, `FOR`'s `TO`/`STEP`). The keyword matcher in
/// `basic8::keywords` scans `KEYWORDS` looking for the longest byte-prefix of the input that
/// matches an entry.
pub trait KeywordTable: Sized + Copy + 'static {
    /// The table, in declaration order. The matcher does not rely on any particular order
    /// (it scans the whole table and keeps the longest match), so declaration order is free
    /// to follow whatever grouping reads best, unlike the original byte-table walker's
    /// "longer keyword must come first" requirement.
    fn keywords() -> &'static [(&'static [u8], Self)];
}
