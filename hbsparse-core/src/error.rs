//! Error types for hbsparse operations

use alloc::string::String;
use alloc::vec::Vec;

/// Broad class of an error, used by callers that only care about the kind
/// of failure and not its details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed field descriptor, header line or numeric field
    Format,
    /// Attribute outside its enumerated set or inconsistent header/matrix data
    Value,
    /// Vector, output or block shape mismatch
    Dimension,
    /// Format variant or operand kind this crate does not handle
    Unsupported,
    /// Output buffer of the wrong element kind or layout
    KindMismatch,
    /// Underlying reader or writer failed
    Io,
}

/// Errors that can occur during hbsparse operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// Fortran field descriptor does not match the integer or exponential grammar
    InvalidDescriptor(String),
    /// One of the four header lines is too short or carries bad data
    MalformedHeader {
        /// One-based header line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },
    /// A fixed-width field did not parse as the expected numeric kind
    InvalidNumber(String),
    /// Matrix type code is not three recognized letters
    InvalidTypeCode(String),
    /// A value does not fit into its field width
    FieldOverflow {
        /// Rendered text
        text: String,
        /// Available width
        width: usize,
    },
    /// A data section ended before all its fields were read
    TruncatedSection {
        /// Section name ("pointer", "indices" or "values")
        section: &'static str,
        /// Fields still expected
        missing: usize,
    },
    /// Named attribute outside its enumerated set
    InvalidAttribute {
        /// Attribute name ("value_kind", "structure", "storage")
        attribute: &'static str,
        /// Rejected value
        value: String,
    },
    /// Compressed or block structure arrays are inconsistent
    InvalidStructure(String),
    /// Header fields are inconsistent with each other or with the matrix
    InvalidHeader(String),
    /// Shape mismatch between operands
    DimensionMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },
    /// Matrix shape is not a multiple of the block shape
    ShapeNotDivisible {
        /// Matrix shape in elements
        shape: (usize, usize),
        /// Block shape
        blocksize: (usize, usize),
    },
    /// Variant or operand outside what this crate handles
    Unsupported(String),
    /// Output buffer element kind differs from the promoted kind
    KindMismatch {
        /// Required kind
        expected: crate::DataType,
        /// Kind of the supplied buffer
        got: crate::DataType,
    },
    /// Output buffer is strided
    NotContiguous,
}

impl SparseError {
    /// Create a malformed header error
    pub fn malformed_header(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn dimension_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Category of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            SparseError::InvalidDescriptor(_)
            | SparseError::MalformedHeader { .. }
            | SparseError::InvalidNumber(_)
            | SparseError::InvalidTypeCode(_)
            | SparseError::FieldOverflow { .. }
            | SparseError::TruncatedSection { .. } => ErrorCategory::Format,
            SparseError::InvalidAttribute { .. }
            | SparseError::InvalidStructure(_)
            | SparseError::InvalidHeader(_) => ErrorCategory::Value,
            SparseError::DimensionMismatch { .. } | SparseError::ShapeNotDivisible { .. } => {
                ErrorCategory::Dimension
            }
            SparseError::Unsupported(_) => ErrorCategory::Unsupported,
            SparseError::KindMismatch { .. } | SparseError::NotContiguous => {
                ErrorCategory::KindMismatch
            }
        }
    }
}

impl core::fmt::Display for SparseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SparseError::InvalidDescriptor(s) => write!(f, "Invalid field descriptor '{s}'"),
            SparseError::MalformedHeader { line, reason } => {
                write!(f, "Malformed header line {line}: {reason}")
            }
            SparseError::InvalidNumber(s) => write!(f, "Expected a number, got '{s}'"),
            SparseError::InvalidTypeCode(s) => write!(f, "Unrecognized matrix type code '{s}'"),
            SparseError::FieldOverflow { text, width } => {
                write!(f, "'{text}' does not fit in a field of width {width}")
            }
            SparseError::TruncatedSection { section, missing } => {
                write!(f, "Section '{section}' ended with {missing} fields missing")
            }
            SparseError::InvalidAttribute { attribute, value } => {
                write!(f, "Unrecognized {attribute} '{value}'")
            }
            SparseError::InvalidStructure(s) => write!(f, "Invalid sparse structure: {s}"),
            SparseError::InvalidHeader(s) => write!(f, "Invalid header: {s}"),
            SparseError::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected {expected:?}, got {got:?}")
            }
            SparseError::ShapeNotDivisible { shape, blocksize } => write!(
                f,
                "Matrix shape {shape:?} not divisible by block shape {blocksize:?}"
            ),
            SparseError::Unsupported(s) => write!(f, "Unsupported: {s}"),
            SparseError::KindMismatch { expected, got } => write!(
                f,
                "Output array has dtype={got}, dtype={expected} is required"
            ),
            SparseError::NotContiguous => write!(f, "Output array must be contiguous"),
        }
    }
}

impl core::error::Error for SparseError {}

/// Result type for hbsparse-core operations
pub type Result<T> = core::result::Result<T, SparseError>;
