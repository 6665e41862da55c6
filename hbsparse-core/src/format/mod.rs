//! Harwell-Boeing format definitions
//!
//! Pure data models for the text layout: field descriptors, type codes and
//! the four-line header. No I/O happens here.

pub mod constants;
pub mod data_type;
pub mod fortran;
pub mod header;
pub mod type_code;

pub use data_type::DataType;
pub use fortran::{
    ExponentMarker, ExponentialField, FieldFormat, FieldKind, FieldValue, IntegerField,
};
pub use header::{HbHeader, Section};
pub use type_code::{MatrixTypeCode, Storage, Structure, ValueKind};

/// Sparse storage layouts known to the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SparseFormat {
    /// Coordinate (COO) format - row, col, value triplets
    Coo = 0,
    /// Compressed Sparse Row (CSR) format
    Csr = 1,
    /// Compressed Sparse Column (CSC) format
    Csc = 2,
    /// Block Sparse Row (BSR) format
    Bsr = 3,
    /// Block Sparse Column (BSC) format
    Bsc = 4,
}

impl core::fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SparseFormat::Coo => write!(f, "COO"),
            SparseFormat::Csr => write!(f, "CSR"),
            SparseFormat::Csc => write!(f, "CSC"),
            SparseFormat::Bsr => write!(f, "BSR"),
            SparseFormat::Bsc => write!(f, "BSC"),
        }
    }
}
