//! Parsing utilities for fixed-column header text
//!
//! This module provides pure parsing functions with no I/O dependencies.

use crate::SparseError;
use alloc::format;
use alloc::string::ToString;
use core::ops::Range;

/// Whether a slice of header text holds only blanks
pub fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b == b' ')
}

/// Parse the right-justified integer stored in `line[range]`
///
/// Errors are reported against header line `line_no`.
pub fn parse_field(line: &str, range: Range<usize>, line_no: usize) -> Result<usize, SparseError> {
    let field = line.get(range.clone()).ok_or_else(|| {
        SparseError::malformed_header(
            line_no,
            format!("columns {}..{} are out of range", range.start + 1, range.end),
        )
    })?;
    parse_usize(field.trim()).map_err(|_| {
        SparseError::malformed_header(
            line_no,
            format!(
                "columns {}..{} do not hold an integer: '{field}'",
                range.start + 1,
                range.end
            ),
        )
    })
}

/// Parse a usize from a string with error handling
pub fn parse_usize(s: &str) -> Result<usize, SparseError> {
    // Handle empty strings
    if s.is_empty() {
        return Err(SparseError::InvalidNumber(s.to_string()));
    }

    let mut result: usize = 0;

    for byte in s.bytes() {
        if !byte.is_ascii_digit() {
            return Err(SparseError::InvalidNumber(s.to_string()));
        }

        let digit = (byte - b'0') as usize;

        // Check for overflow
        if result > (usize::MAX - digit) / 10 {
            return Err(SparseError::InvalidNumber(s.to_string()));
        }

        result = result * 10 + digit;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usize() {
        assert_eq!(parse_usize("0"), Ok(0));
        assert_eq!(parse_usize("123"), Ok(123));
        assert_eq!(parse_usize("999999"), Ok(999999));

        // Invalid cases
        assert_eq!(parse_usize(""), Err(SparseError::InvalidNumber("".to_string())));
        assert_eq!(parse_usize("abc"), Err(SparseError::InvalidNumber("abc".to_string())));
        assert_eq!(parse_usize("12a"), Err(SparseError::InvalidNumber("12a".to_string())));
        assert_eq!(parse_usize("-123"), Err(SparseError::InvalidNumber("-123".to_string())));
        assert!(parse_usize("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_field() {
        let line = "            12             7";
        assert_eq!(parse_field(line, 0..14, 2), Ok(12));
        assert_eq!(parse_field(line, 14..28, 2), Ok(7));
        assert!(matches!(
            parse_field(line, 28..42, 2),
            Err(SparseError::MalformedHeader { line: 2, .. })
        ));
        assert!(matches!(
            parse_field("      x2", 0..8, 3),
            Err(SparseError::MalformedHeader { line: 3, .. })
        ));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("    "));
        assert!(!is_blank("  x "));
    }
}
