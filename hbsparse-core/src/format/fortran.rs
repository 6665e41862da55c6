//! Fortran fixed-field format descriptors
//!
//! Only the two edit descriptors Harwell-Boeing files use for their data
//! sections are modelled: integer (`I`) and exponential (`E`, `D`) fields,
//! each with a repeat count. Descriptors look like `(26I3)` or
//! `(3E25.16E3)`; the parentheses are optional on input.

use super::constants::{DEFAULT_EXPONENT_DIGITS, DEFAULT_SIGNIFICAND_DIGITS, LINE_WIDTH};
use crate::validation::record_count;
use crate::{Result, SparseError};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Write;

/// Which edit descriptor a field uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    Integer,
    Exponential,
}

/// Exponent letter of an exponential field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExponentMarker {
    /// Single precision style, `1.0E+00`
    E,
    /// Double precision style, `1.0D+00`
    D,
}

impl ExponentMarker {
    const fn as_char(self) -> char {
        match self {
            ExponentMarker::E => 'E',
            ExponentMarker::D => 'D',
        }
    }
}

/// `rI<w>[.m]` descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegerField {
    /// Fields per line
    pub repeat: usize,
    /// Characters per field
    pub width: usize,
    /// Minimum number of digits, zero padded
    pub min_digits: Option<usize>,
}

/// `rE<w>.<d>[E<e>]` descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentialField {
    /// Fields per line
    pub repeat: usize,
    /// Characters per field
    pub width: usize,
    /// Digits after the decimal point
    pub digits: usize,
    /// Digits of the exponent, if fixed
    pub exponent_digits: Option<usize>,
    /// Exponent letter
    pub marker: ExponentMarker,
}

/// A value to render into a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
}

/// Parsed Fortran field format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldFormat {
    Integer(IntegerField),
    Exponential(ExponentialField),
}

/// Number of decimal digits of `n` (1 for zero)
pub const fn decimal_digits(mut n: u64) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

const fn repeat_for(width: usize) -> usize {
    let repeat = LINE_WIDTH / width;
    if repeat == 0 {
        1
    } else {
        repeat
    }
}

impl IntegerField {
    /// Smallest field able to print every integer of absolute value up to
    /// `magnitude`, sign included
    pub const fn from_magnitude(magnitude: u64) -> Self {
        let width = decimal_digits(magnitude) + 1;
        Self {
            repeat: repeat_for(width),
            width,
            min_digits: None,
        }
    }

    /// Render `value` right-justified into exactly `width` characters
    pub fn render(&self, value: i64, out: &mut String) -> Result<()> {
        let digits = value.unsigned_abs();
        let min = self.min_digits.unwrap_or(0);
        let text = if value < 0 {
            format!("-{digits:0min$}")
        } else {
            format!("{digits:0min$}")
        };
        pad_into(&text, self.width, out)
    }
}

impl ExponentialField {
    /// Field with `digits` digits after the point and a fixed exponent width
    pub const fn with_precision(digits: usize, exponent_digits: usize) -> Self {
        // blank separator, sign, leading digit, point, mantissa, marker,
        // exponent sign, exponent digits
        let width = 1 + 1 + 1 + 1 + digits + 1 + 1 + exponent_digits;
        Self {
            repeat: repeat_for(width),
            width,
            digits,
            exponent_digits: Some(exponent_digits),
            marker: ExponentMarker::E,
        }
    }

    /// Field able to print any finite `f64`
    ///
    /// The width only depends on the precision: every finite double fits once
    /// the exponent has three digits.
    pub fn from_magnitude(_magnitude: f64) -> Self {
        Self::with_precision(DEFAULT_SIGNIFICAND_DIGITS, DEFAULT_EXPONENT_DIGITS)
    }

    /// Render `value` right-justified into exactly `width` characters
    pub fn render(&self, value: f64, out: &mut String) -> Result<()> {
        if !value.is_finite() {
            let text = if value.is_nan() {
                "NaN"
            } else if value > 0.0 {
                "Infinity"
            } else {
                "-Infinity"
            };
            return pad_into(text, self.width, out);
        }

        let magnitude = if value.is_sign_negative() { -value } else { value };
        let formatted = format!("{:.*E}", self.digits, magnitude);
        let (mantissa, exponent) = formatted
            .split_once('E')
            .ok_or_else(|| SparseError::InvalidNumber(formatted.clone()))?;
        let exponent: i32 = exponent
            .parse()
            .map_err(|_| SparseError::InvalidNumber(formatted.clone()))?;

        let exp_abs = exponent.unsigned_abs() as u64;
        let exp_width = match self.exponent_digits {
            Some(fixed) => fixed,
            None if exp_abs < 100 => 2,
            None => 3,
        };
        if decimal_digits(exp_abs) > exp_width {
            return Err(SparseError::FieldOverflow {
                text: formatted,
                width: self.width,
            });
        }

        let mut text = String::with_capacity(self.width);
        if value.is_sign_negative() {
            text.push('-');
        }
        text.push_str(mantissa);
        text.push(self.marker.as_char());
        text.push(if exponent < 0 { '-' } else { '+' });
        let _ = write!(text, "{exp_abs:0exp_width$}");
        pad_into(&text, self.width, out)
    }
}

fn pad_into(text: &str, width: usize, out: &mut String) -> Result<()> {
    if text.len() > width {
        return Err(SparseError::FieldOverflow {
            text: text.to_string(),
            width,
        });
    }
    for _ in text.len()..width {
        out.push(' ');
    }
    out.push_str(text);
    Ok(())
}

/// Byte cursor over a descriptor
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek().map(|b| b.to_ascii_uppercase()) == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        let mut value: usize = 0;
        for &b in &self.bytes[start..self.pos] {
            value = value.checked_mul(10)?.checked_add((b - b'0') as usize)?;
        }
        Some(value)
    }

    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

impl FieldFormat {
    /// Parse a descriptor such as `(10I8)`, `I8`, `4E20.12` or `(3D25.16)`
    pub fn parse(descriptor: &str) -> Result<Self> {
        let invalid = || SparseError::InvalidDescriptor(descriptor.to_string());

        let trimmed = descriptor.trim();
        let inner = match (trimmed.strip_prefix('('), trimmed.strip_suffix(')')) {
            (Some(_), Some(_)) if trimmed.len() >= 2 => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => return Err(invalid()),
        };

        let mut cursor = Cursor::new(inner.trim());
        let repeat = cursor.number().unwrap_or(1);
        if repeat == 0 {
            return Err(invalid());
        }

        let format = if cursor.eat(b'I') {
            let width = cursor.number().ok_or_else(invalid)?;
            let min_digits = if cursor.eat(b'.') {
                Some(cursor.number().ok_or_else(invalid)?)
            } else {
                None
            };
            FieldFormat::Integer(IntegerField {
                repeat,
                width,
                min_digits,
            })
        } else {
            let marker = if cursor.eat(b'E') {
                ExponentMarker::E
            } else if cursor.eat(b'D') {
                ExponentMarker::D
            } else {
                return Err(invalid());
            };
            let width = cursor.number().ok_or_else(invalid)?;
            if !cursor.eat(b'.') {
                return Err(invalid());
            }
            let digits = cursor.number().ok_or_else(invalid)?;
            let exponent_digits = if cursor.eat(b'E') {
                Some(cursor.number().ok_or_else(invalid)?)
            } else {
                None
            };
            FieldFormat::Exponential(ExponentialField {
                repeat,
                width,
                digits,
                exponent_digits,
                marker,
            })
        };

        if !cursor.at_end() || format.width() == 0 {
            return Err(invalid());
        }
        Ok(format)
    }

    /// Smallest safe format for values up to `magnitude` in absolute value
    pub fn from_magnitude(kind: FieldKind, magnitude: f64) -> Self {
        match kind {
            FieldKind::Integer => {
                let magnitude = if magnitude.is_finite() && magnitude > 0.0 {
                    magnitude as u64
                } else {
                    0
                };
                FieldFormat::Integer(IntegerField::from_magnitude(magnitude))
            }
            FieldKind::Exponential => {
                FieldFormat::Exponential(ExponentialField::from_magnitude(magnitude))
            }
        }
    }

    /// Descriptor kind
    pub const fn kind(&self) -> FieldKind {
        match self {
            FieldFormat::Integer(_) => FieldKind::Integer,
            FieldFormat::Exponential(_) => FieldKind::Exponential,
        }
    }

    /// Fields per line
    pub const fn repeat(&self) -> usize {
        match self {
            FieldFormat::Integer(f) => f.repeat,
            FieldFormat::Exponential(f) => f.repeat,
        }
    }

    /// Characters per field
    pub const fn width(&self) -> usize {
        match self {
            FieldFormat::Integer(f) => f.width,
            FieldFormat::Exponential(f) => f.width,
        }
    }

    /// Lines needed to hold `count` fields
    pub const fn lines_for(&self, count: usize) -> usize {
        record_count(count, self.repeat())
    }

    /// Characters of a full line, newline excluded
    pub const fn line_width(&self) -> usize {
        self.repeat() * self.width()
    }

    /// Render one value into exactly `width` characters
    pub fn render(&self, value: FieldValue, out: &mut String) -> Result<()> {
        match (self, value) {
            (FieldFormat::Integer(f), FieldValue::Integer(v)) => f.render(v, out),
            (FieldFormat::Exponential(f), FieldValue::Real(v)) => f.render(v, out),
            (FieldFormat::Exponential(f), FieldValue::Integer(v)) => f.render(v as f64, out),
            (FieldFormat::Integer(_), FieldValue::Real(v)) => Err(SparseError::InvalidHeader(
                format!("real value {v} cannot be written with an integer field format"),
            )),
        }
    }

    /// Decode one integer field
    pub fn decode_integer(field: &str) -> Result<i64> {
        let trimmed = field.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| SparseError::InvalidNumber(trimmed.to_string()))
    }

    /// Decode one exponential field
    ///
    /// Accepts `E`/`D` markers in either case and the marker-less Fortran
    /// form `1.5+003`.
    pub fn decode_real(field: &str) -> Result<f64> {
        let trimmed = field.trim();
        let invalid = || SparseError::InvalidNumber(trimmed.to_string());
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut text: String = trimmed
            .chars()
            .map(|c| if c == 'D' || c == 'd' { 'E' } else { c })
            .collect();
        if !text.contains(['E', 'e']) && !text.contains(['n', 'N', 'i', 'I']) {
            // Exponent sign right after a mantissa digit means a missing marker
            let split = text
                .char_indices()
                .skip(1)
                .find(|&(i, c)| {
                    (c == '+' || c == '-')
                        && text[..i]
                            .chars()
                            .last()
                            .is_some_and(|p| p.is_ascii_digit() || p == '.')
                })
                .map(|(i, _)| i);
            if let Some(i) = split {
                text.insert(i, 'E');
            }
        }
        text.parse::<f64>().map_err(|_| invalid())
    }

    /// Decode one field according to this format
    pub fn decode(&self, field: &str) -> Result<FieldValue> {
        match self {
            FieldFormat::Integer(_) => Self::decode_integer(field).map(FieldValue::Integer),
            FieldFormat::Exponential(_) => Self::decode_real(field).map(FieldValue::Real),
        }
    }
}

impl core::fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldFormat::Integer(field) => {
                write!(f, "({}I{}", field.repeat, field.width)?;
                if let Some(min) = field.min_digits {
                    write!(f, ".{min}")?;
                }
                write!(f, ")")
            }
            FieldFormat::Exponential(field) => {
                write!(
                    f,
                    "({}{}{}.{}",
                    field.repeat,
                    field.marker.as_char(),
                    field.width,
                    field.digits
                )?;
                if let Some(e) = field.exponent_digits {
                    write!(f, "E{e}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl core::str::FromStr for FieldFormat {
    type Err = SparseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: &FieldFormat, value: FieldValue) -> String {
        let mut out = String::new();
        format.render(value, &mut out).unwrap();
        out
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(
            FieldFormat::parse("(26I3)"),
            Ok(FieldFormat::Integer(IntegerField {
                repeat: 26,
                width: 3,
                min_digits: None
            }))
        );
        assert_eq!(
            FieldFormat::parse("I8"),
            Ok(FieldFormat::Integer(IntegerField {
                repeat: 1,
                width: 8,
                min_digits: None
            }))
        );
        assert_eq!(
            FieldFormat::parse("10i8.3"),
            Ok(FieldFormat::Integer(IntegerField {
                repeat: 10,
                width: 8,
                min_digits: Some(3)
            }))
        );
    }

    #[test]
    fn test_parse_exponential() {
        assert_eq!(
            FieldFormat::parse("(3E25.16E3)"),
            Ok(FieldFormat::Exponential(ExponentialField {
                repeat: 3,
                width: 25,
                digits: 16,
                exponent_digits: Some(3),
                marker: ExponentMarker::E,
            }))
        );
        assert_eq!(
            FieldFormat::parse("4D20.12"),
            Ok(FieldFormat::Exponential(ExponentialField {
                repeat: 4,
                width: 20,
                digits: 12,
                exponent_digits: None,
                marker: ExponentMarker::D,
            }))
        );
        assert_eq!(FieldFormat::parse("E20.12").unwrap().repeat(), 1);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in [
            "", "()", "(I)", "3X8", "(3I8", "3I8)", "0I8", "I0", "E20", "E20.", "3F10.4",
            "3I8x", "(3E25.16E)",
        ] {
            assert_eq!(
                FieldFormat::parse(bad),
                Err(SparseError::InvalidDescriptor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_from_magnitude() {
        let format = FieldFormat::from_magnitude(FieldKind::Integer, 9999.0);
        assert!(format.width() >= 5);
        assert_eq!(format.repeat(), 16);
        assert_eq!(format.to_string(), "(16I5)");

        let format = FieldFormat::from_magnitude(FieldKind::Exponential, 1.5);
        assert_eq!(format.width(), 25);
        assert_eq!(format.repeat(), 3);
        assert_eq!(format.to_string(), "(3E25.16E3)");

        assert_eq!(IntegerField::from_magnitude(0).width, 2);
    }

    #[test]
    fn test_descriptor_round_trip() {
        let formats = [
            FieldFormat::from_magnitude(FieldKind::Integer, 1.0),
            FieldFormat::from_magnitude(FieldKind::Integer, 123_456_789.0),
            FieldFormat::from_magnitude(FieldKind::Exponential, 0.0),
            FieldFormat::Exponential(ExponentialField::with_precision(8, 2)),
            FieldFormat::parse("(4D20.12)").unwrap(),
            FieldFormat::parse("(10I8.3)").unwrap(),
        ];
        for format in formats {
            assert_eq!(FieldFormat::parse(&format.to_string()), Ok(format));
        }
    }

    #[test]
    fn test_render_integer() {
        let format = FieldFormat::parse("(5I4)").unwrap();
        assert_eq!(render(&format, FieldValue::Integer(12)), "  12");
        assert_eq!(render(&format, FieldValue::Integer(-123)), "-123");

        let padded = FieldFormat::parse("(5I6.3)").unwrap();
        assert_eq!(render(&padded, FieldValue::Integer(7)), "   007");
        assert_eq!(render(&padded, FieldValue::Integer(-7)), "  -007");

        let mut out = String::new();
        assert_eq!(
            format.render(FieldValue::Integer(12345), &mut out),
            Err(SparseError::FieldOverflow {
                text: "12345".to_string(),
                width: 4
            })
        );
    }

    #[test]
    fn test_render_exponential() {
        let format = FieldFormat::parse("(3E16.6E3)").unwrap();
        assert_eq!(render(&format, FieldValue::Real(1234.5)), "   1.234500E+003");
        assert_eq!(render(&format, FieldValue::Real(-0.00125)), "  -1.250000E-003");
        assert_eq!(render(&format, FieldValue::Real(0.0)), "   0.000000E+000");
        assert_eq!(render(&format, FieldValue::Integer(3)), "   3.000000E+000");

        let fortran_default = FieldFormat::parse("(4D15.6)").unwrap();
        assert_eq!(
            render(&fortran_default, FieldValue::Real(2.5)),
            "   2.500000D+00"
        );
        assert_eq!(
            render(&fortran_default, FieldValue::Real(2.5e120)),
            "  2.500000D+120"
        );

        let two_digit = FieldFormat::parse("(4E15.6E2)").unwrap();
        let mut out = String::new();
        assert!(matches!(
            two_digit.render(FieldValue::Real(1.0e200), &mut out),
            Err(SparseError::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_render_width_is_exact() {
        let format = FieldFormat::from_magnitude(FieldKind::Exponential, 0.0);
        for value in [0.0, -1.0, f64::MAX, f64::MIN, f64::MIN_POSITIVE, -3.25e-300] {
            let text = render(&format, FieldValue::Real(value));
            assert_eq!(text.len(), format.width(), "{value}");
            assert_eq!(FieldFormat::decode_real(&text), Ok(value));
        }
    }

    #[test]
    fn test_decode() {
        assert_eq!(FieldFormat::decode_integer("  42"), Ok(42));
        assert_eq!(FieldFormat::decode_integer(" -7 "), Ok(-7));
        assert!(FieldFormat::decode_integer("   ").is_err());
        assert!(FieldFormat::decode_integer("4.2").is_err());

        assert_eq!(FieldFormat::decode_real(" 1.5E+003"), Ok(1500.0));
        assert_eq!(FieldFormat::decode_real(" 1.5d-2"), Ok(0.015));
        assert_eq!(FieldFormat::decode_real(" -2.5+003"), Ok(-2500.0));
        assert_eq!(FieldFormat::decode_real("1.5-1"), Ok(0.15));
        assert_eq!(FieldFormat::decode_real("  3.0"), Ok(3.0));
        assert!(FieldFormat::decode_real("NaN").unwrap().is_nan());
        assert_eq!(FieldFormat::decode_real("-Infinity"), Ok(f64::NEG_INFINITY));
        assert!(FieldFormat::decode_real("abc").is_err());
        assert!(FieldFormat::decode_real("").is_err());
    }

    #[test]
    fn test_geometry() {
        let format = FieldFormat::parse("(16I5)").unwrap();
        assert_eq!(format.line_width(), 80);
        assert_eq!(format.lines_for(0), 0);
        assert_eq!(format.lines_for(16), 1);
        assert_eq!(format.lines_for(17), 2);
    }
}
