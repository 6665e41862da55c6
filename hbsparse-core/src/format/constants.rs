//! Fixed-column layout constants of the Harwell-Boeing format

/// Width of every header line and of a full data record
pub const LINE_WIDTH: usize = 80;

/// Columns reserved for the title on header line 1
pub const TITLE_WIDTH: usize = 72;

/// Columns reserved for the key on header line 1
pub const KEY_WIDTH: usize = 8;

/// Width of the integer fields on header lines 2 and 3
pub const HEADER_FIELD_WIDTH: usize = 14;

/// Number of header lines before the data section
pub const HEADER_LINES: usize = 4;

/// Column widths of the pointer, indices and values descriptors on line 4
pub mod descriptor {
    /// Pointer format column width
    pub const POINTER_WIDTH: usize = 16;

    /// Indices format column width
    pub const INDICES_WIDTH: usize = 16;

    /// Values format column width
    pub const VALUES_WIDTH: usize = 20;
}

/// Digits after the decimal point of a derived exponential field
pub const DEFAULT_SIGNIFICAND_DIGITS: usize = 16;

/// Exponent digits of a derived exponential field
pub const DEFAULT_EXPONENT_DIGITS: usize = 3;
