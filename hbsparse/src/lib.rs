//! hbsparse - Block sparse matrices and Harwell-Boeing file I/O
//!
//! This library provides block sparse row/column matrices with conversions
//! between the common sparse layouts, plus a reader and writer for the
//! fixed-column Harwell-Boeing exchange format.
//!
//! ## Architecture
//!
//! hbsparse separates format definitions from their implementation:
//!
//! - **hbsparse-core**: Pure format definitions, traits, and validation (no I/O)
//! - **hbsparse**: Concrete containers, the dense vector collaborator, and file I/O
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hbsparse::{read_hb, write_hb, BsrMatrix, DenseArray, HbWriteOptions, SparseConvert};
//!
//! fn example() -> hbsparse::Result<()> {
//!     let bsr = BsrMatrix::new((2, 2), (2, 2), vec![0, 1], vec![0], vec![1.0, 2.0, 3.0, 4.0])?;
//!     let y = bsr.matvec(&DenseArray::from_vec(vec![1.0f64, 1.0]))?;
//!     assert_eq!(y.as_slice::<f64>(), Some(&[3.0, 7.0][..]));
//!
//!     // Harwell-Boeing files store compressed columns
//!     write_hb("matrix.rua", &bsr.to_csc(), &HbWriteOptions::with_title("example"))?;
//!     let matrix = read_hb("matrix.rua")?;
//!     println!("{:?} matrix with {} entries", matrix.shape(), matrix.nnz());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Block sparse storage**: BSR/BSC with block transposes and re-blocking
//! - **Layout conversions**: COO, CSR, CSC, BSR, BSC behind one contract
//! - **Harwell-Boeing I/O**: real and integer unsymmetric assembled matrices
//! - **Copy-on-write buffers**: coordinate views can alias block data

// Re-export core abstractions and format definitions
pub use hbsparse_core::{
    // Core traits
    CompressedColumns, MatrixElement, SparseMatrix,
    // Format definitions
    DataType, FieldFormat, FieldKind, FieldValue, HbHeader, MatrixTypeCode, Section,
    SparseFormat, Storage, Structure, ValueKind,
    // Error handling
    ErrorCategory, SparseError,
};

// Implementation modules
pub mod config;
pub mod dense;
pub mod error;
pub mod hb;
pub mod sparse;

// Public exports
pub use config::HbWriteOptions;
pub use dense::{ArrayData, DenseArray, DenseElement};
pub use error::{Error, Result};
pub use hb::{
    read_hb, read_hb_from, write_hb, write_hb_to, write_hb_with_header, HbFile, HbMatrix,
};
pub use sparse::{
    BscMatrix, BsrMatrix, CooMatrix, CscMatrix, CsrMatrix, Operand, Product, SparseArray,
    SparseConvert,
};
