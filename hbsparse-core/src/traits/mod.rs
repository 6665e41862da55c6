//! Abstract interfaces shared by the concrete sparse containers
//!
//! Traits are pure interfaces - no concrete implementations.

pub mod element;
pub mod matrix;

pub use element::MatrixElement;
pub use matrix::{CompressedColumns, SparseMatrix};
