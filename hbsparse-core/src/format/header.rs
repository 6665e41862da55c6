//! Harwell-Boeing header model
//!
//! The header is four fixed-column text lines:
//!
//! ```text
//! line 1: title (72 cols) | key (8 cols)
//! line 2: total lines | pointer lines | indices lines | values lines | [rhs lines]
//! line 3: type code (14 cols) | nrows | ncols | nnz | nelementals
//! line 4: pointer format | indices format | values format
//! ```
//!
//! Integer fields on lines 2 and 3 are 14 columns wide.

use super::constants::{
    descriptor, DEFAULT_EXPONENT_DIGITS, DEFAULT_SIGNIFICAND_DIGITS, HEADER_FIELD_WIDTH,
    HEADER_LINES, KEY_WIDTH, TITLE_WIDTH,
};
use super::fortran::{ExponentialField, FieldFormat, FieldKind, IntegerField};
use super::type_code::{MatrixTypeCode, Storage, Structure, ValueKind};
use crate::traits::{CompressedColumns, MatrixElement};
use crate::validation::parsing::{is_blank, parse_field};
use crate::{Result, SparseError};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;
use num_traits::ToPrimitive;

/// One of the three data sections following the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Section {
    Pointer,
    Indices,
    Values,
}

impl Section {
    /// Section name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Section::Pointer => "pointer",
            Section::Indices => "indices",
            Section::Values => "values",
        }
    }
}

/// Parsed or derived Harwell-Boeing header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HbHeader {
    title: String,
    key: String,
    total_nlines: usize,
    pointer_nlines: usize,
    indices_nlines: usize,
    values_nlines: usize,
    type_code: MatrixTypeCode,
    nrows: usize,
    ncols: usize,
    nnon_zeros: usize,
    nelementals: usize,
    pointer_format: FieldFormat,
    indices_format: FieldFormat,
    values_format: FieldFormat,
}

impl HbHeader {
    /// Build a header from its attributes, computing the line counts
    ///
    /// Fails if the title or key holds anything but printable ASCII, if the
    /// title is longer than 72 characters, if the pointer or indices format
    /// is not an integer field, or if the values format does not match the
    /// value kind of `type_code`. A key longer than 8 characters is kept and
    /// only logged. Trailing blanks of the title and key are dropped, as the
    /// fixed columns cannot tell them from padding.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        key: impl Into<String>,
        type_code: MatrixTypeCode,
        nrows: usize,
        ncols: usize,
        nnon_zeros: usize,
        pointer_format: FieldFormat,
        indices_format: FieldFormat,
        values_format: FieldFormat,
    ) -> Result<Self> {
        let title = title.into().trim_end().to_string();
        let key = key.into().trim_end().to_string();

        for (name, text) in [("title", &title), ("key", &key)] {
            if !is_printable_ascii(text) {
                return Err(SparseError::InvalidHeader(format!(
                    "{name} '{text}' must be printable ASCII"
                )));
            }
        }
        if title.len() > TITLE_WIDTH {
            return Err(SparseError::InvalidHeader(format!(
                "title is {} characters, at most {TITLE_WIDTH} allowed",
                title.len()
            )));
        }
        if key.len() > KEY_WIDTH {
            log::warn!("key '{key}' is longer than {KEY_WIDTH} characters and will overflow line 1");
        }

        for (section, format) in [
            (Section::Pointer, &pointer_format),
            (Section::Indices, &indices_format),
        ] {
            if format.kind() != FieldKind::Integer {
                return Err(SparseError::InvalidHeader(format!(
                    "{} format {format} is not an integer field",
                    section.name()
                )));
            }
        }

        let expected_values = match type_code.value_kind {
            ValueKind::Integer => Some(FieldKind::Integer),
            ValueKind::Real | ValueKind::Complex => Some(FieldKind::Exponential),
            ValueKind::Pattern => None,
        };
        if let Some(kind) = expected_values {
            if values_format.kind() != kind {
                return Err(SparseError::InvalidHeader(format!(
                    "values format {values_format} does not fit {} values",
                    type_code.value_kind.name()
                )));
            }
        }

        let pointer_nlines = pointer_format.lines_for(ncols + 1);
        let indices_nlines = indices_format.lines_for(nnon_zeros);
        let values_nlines = match type_code.value_kind {
            ValueKind::Pattern => 0,
            _ => values_format.lines_for(nnon_zeros),
        };

        Ok(Self {
            title,
            key,
            total_nlines: pointer_nlines + indices_nlines + values_nlines,
            pointer_nlines,
            indices_nlines,
            values_nlines,
            type_code,
            nrows,
            ncols,
            nnon_zeros,
            nelementals: 0,
            pointer_format,
            indices_format,
            values_format,
        })
    }

    /// Derive a header able to hold `matrix`, with 16 significand digits
    /// for real values
    pub fn derive<M: CompressedColumns>(matrix: &M, title: &str, key: &str) -> Result<Self> {
        Self::derive_with_precision(
            matrix,
            title,
            key,
            DEFAULT_SIGNIFICAND_DIGITS,
            DEFAULT_EXPONENT_DIGITS,
        )
    }

    /// Derive a header able to hold `matrix`
    ///
    /// Pointer and indices formats are sized for the largest one-based
    /// offset; the values format for the largest absolute integer value, or
    /// to the requested precision for real values.
    pub fn derive_with_precision<M: CompressedColumns>(
        matrix: &M,
        title: &str,
        key: &str,
        significand_digits: usize,
        exponent_digits: usize,
    ) -> Result<Self> {
        let (nrows, ncols) = matrix.shape();
        let indptr = matrix.indptr();
        let indices = matrix.indices();
        let values = matrix.values();

        if indptr.len() != ncols + 1 {
            return Err(SparseError::InvalidStructure(format!(
                "indptr has {} entries, expected {}",
                indptr.len(),
                ncols + 1
            )));
        }
        if indices.len() != values.len() {
            return Err(SparseError::InvalidStructure(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }

        let one_based_max = |arr: &[usize]| arr.iter().max().map_or(1, |&m| m as u64 + 1);
        let pointer_format =
            FieldFormat::Integer(IntegerField::from_magnitude(one_based_max(indptr)));
        let indices_format =
            FieldFormat::Integer(IntegerField::from_magnitude(one_based_max(indices)));

        let value_kind = M::Element::data_type().value_kind();
        let values_format = match value_kind {
            ValueKind::Integer => {
                let magnitude = values
                    .iter()
                    .filter_map(|v| v.to_i64())
                    .map(i64::unsigned_abs)
                    .max()
                    .unwrap_or(0);
                FieldFormat::Integer(IntegerField::from_magnitude(magnitude))
            }
            _ => FieldFormat::Exponential(ExponentialField::with_precision(
                significand_digits,
                exponent_digits,
            )),
        };

        let type_code =
            MatrixTypeCode::new(value_kind, Structure::Unsymmetric, Storage::Assembled);
        Self::new(
            title,
            key,
            type_code,
            nrows,
            ncols,
            values.len(),
            pointer_format,
            indices_format,
            values_format,
        )
    }

    /// Parse the four header lines
    ///
    /// Trailing newlines are ignored. Every length and numeric failure is a
    /// `MalformedHeader` naming the offending line.
    pub fn parse(lines: [&str; HEADER_LINES]) -> Result<Self> {
        let [line1, line2, line3, line4] =
            lines.map(|line| line.trim_end_matches(['\n', '\r']));
        let w = HEADER_FIELD_WIDTH;

        // Line 1: title and key
        if !is_printable_ascii(line1) {
            return Err(SparseError::malformed_header(1, "title and key must be printable ASCII"));
        }
        let title = line1
            .get(..TITLE_WIDTH)
            .ok_or_else(|| {
                SparseError::malformed_header(
                    1,
                    format!("expected at least {TITLE_WIDTH} characters, got {}", line1.len()),
                )
            })?
            .trim_end();
        let key = line1.get(TITLE_WIDTH..).unwrap_or("").trim_end();

        // Line 2: line counts
        if line2.len() < 4 * w {
            return Err(SparseError::malformed_header(
                2,
                format!("expected at least {} characters, got {}", 4 * w, line2.len()),
            ));
        }
        let mut counts = [0usize; 4];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = parse_field(line2, i * w..(i + 1) * w, 2)?;
        }
        let rhs = line2.get(4 * w..).unwrap_or("");
        let rhs = rhs.get(..w).unwrap_or(rhs);
        if !is_blank(rhs) && parse_field(rhs, 0..rhs.len(), 2)? != 0 {
            return Err(SparseError::Unsupported(
                "right-hand side sections are not supported".to_string(),
            ));
        }

        // Line 3: type code and shape
        if line3.len() < 5 * w {
            return Err(SparseError::malformed_header(
                3,
                format!("expected at least {} characters, got {}", 5 * w, line3.len()),
            ));
        }
        let code = line3
            .get(..3)
            .ok_or_else(|| SparseError::malformed_header(3, "type code is not ASCII"))?;
        if !line3.get(3..w).is_some_and(is_blank) {
            return Err(SparseError::malformed_header(
                3,
                format!(
                    "unexpected text after type code: '{}'",
                    line3.get(..w).unwrap_or(line3)
                ),
            ));
        }
        let type_code = MatrixTypeCode::from_code(code)?;
        let nrows = parse_field(line3, w..2 * w, 3)?;
        let ncols = parse_field(line3, 2 * w..3 * w, 3)?;
        let nnon_zeros = parse_field(line3, 3 * w..4 * w, 3)?;
        let nelementals = parse_field(line3, 4 * w..5 * w, 3)?;
        if nelementals != 0 {
            return Err(SparseError::malformed_header(
                3,
                format!("unexpected elemental count {nelementals}, only assembled matrices are handled"),
            ));
        }

        // Line 4: field formats
        let tokens: Vec<&str> = line4.split_whitespace().collect();
        let [pointer, indices, values] = tokens.as_slice() else {
            return Err(SparseError::malformed_header(
                4,
                format!("expected 3 field formats, got {}", tokens.len()),
            ));
        };

        let header = Self::new(
            title,
            key,
            type_code,
            nrows,
            ncols,
            nnon_zeros,
            FieldFormat::parse(pointer)?,
            FieldFormat::parse(indices)?,
            FieldFormat::parse(values)?,
        )?;

        if header.line_counts() != counts {
            return Err(SparseError::malformed_header(
                2,
                format!(
                    "line counts {counts:?} do not match the field formats, expected {:?}",
                    header.line_counts()
                ),
            ));
        }
        Ok(header)
    }

    /// Render the four header lines, each terminated by a newline
    ///
    /// Descriptors on line 4 are always followed by at least one blank, so
    /// overlong ones still split back apart.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(4 * 81);
        let w = HEADER_FIELD_WIDTH;
        // Writing into a String cannot fail
        let _ = writeln!(out, "{:<TITLE_WIDTH$}{:<KEY_WIDTH$}", self.title, self.key);
        let _ = writeln!(
            out,
            "{:>w$}{:>w$}{:>w$}{:>w$}",
            self.total_nlines, self.pointer_nlines, self.indices_nlines, self.values_nlines
        );
        let _ = writeln!(
            out,
            "{:<w$}{:>w$}{:>w$}{:>w$}{:>w$}",
            self.type_code.to_string(),
            self.nrows,
            self.ncols,
            self.nnon_zeros,
            self.nelementals
        );
        let _ = writeln!(
            out,
            "{:<pw$} {:<iw$} {:<vw$}",
            self.pointer_format.to_string(),
            self.indices_format.to_string(),
            self.values_format.to_string(),
            pw = descriptor::POINTER_WIDTH - 1,
            iw = descriptor::INDICES_WIDTH - 1,
            vw = descriptor::VALUES_WIDTH,
        );
        out
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_code(&self) -> MatrixTypeCode {
        self.type_code
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Matrix shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nnon_zeros(&self) -> usize {
        self.nnon_zeros
    }

    pub fn nelementals(&self) -> usize {
        self.nelementals
    }

    pub fn total_nlines(&self) -> usize {
        self.total_nlines
    }

    /// Total, pointer, indices and values line counts, as on line 2
    pub fn line_counts(&self) -> [usize; 4] {
        [
            self.total_nlines,
            self.pointer_nlines,
            self.indices_nlines,
            self.values_nlines,
        ]
    }

    /// Lines spanned by a data section
    pub fn nlines(&self, section: Section) -> usize {
        match section {
            Section::Pointer => self.pointer_nlines,
            Section::Indices => self.indices_nlines,
            Section::Values => self.values_nlines,
        }
    }

    /// Field format of a data section
    pub fn format(&self, section: Section) -> &FieldFormat {
        match section {
            Section::Pointer => &self.pointer_format,
            Section::Indices => &self.indices_format,
            Section::Values => &self.values_format,
        }
    }

    /// Number of fields stored in a data section
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Pointer => self.ncols + 1,
            Section::Indices => self.nnon_zeros,
            Section::Values if self.type_code.value_kind == ValueKind::Pattern => 0,
            Section::Values => self.nnon_zeros,
        }
    }

    pub fn pointer_len(&self) -> usize {
        self.section_len(Section::Pointer)
    }

    pub fn indices_len(&self) -> usize {
        self.section_len(Section::Indices)
    }

    pub fn values_len(&self) -> usize {
        self.section_len(Section::Values)
    }

    /// Bytes covered by the full lines of a section, newlines included
    pub fn full_record_bytes(&self, section: Section) -> usize {
        self.nlines(section).saturating_sub(1) * (self.format(section).line_width() + 1)
    }
}

fn is_printable_ascii(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}

impl core::fmt::Display for HbHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render())
    }
}
