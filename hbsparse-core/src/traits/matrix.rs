//! Core matrix abstraction traits
//!
//! These are pure interfaces with no concrete implementations.

use super::element::MatrixElement;

/// Core sparse matrix trait for format-agnostic access
///
/// This trait provides the minimal interface that all sparse matrix
/// implementations must provide, regardless of storage layout.
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get an element at the specified position
    ///
    /// Returns `None` if the element is not stored or if the position is
    /// out of bounds. Duplicate entries are summed.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of stored elements, explicit zeros included
    fn nnz(&self) -> usize;
}

/// Borrowed compressed-column arrays, the layout Harwell-Boeing files store
pub trait CompressedColumns {
    type Element: MatrixElement;

    /// (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Column offsets, `cols + 1` entries
    fn indptr(&self) -> &[usize];

    /// Row index of each stored value
    fn indices(&self) -> &[usize];

    fn values(&self) -> &[Self::Element];
}
