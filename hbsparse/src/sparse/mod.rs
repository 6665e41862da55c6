//! Concrete sparse containers
//!
//! Five layouts share one conversion contract, [`SparseConvert`]. The closed
//! [`SparseArray`] variant dispatches over them with exhaustive matches.
//!
//! Every conversion returns an independent container except
//! `to_coo(false)` on block formats, whose result aliases the source's
//! value buffer. Aliased buffers are copy-on-write: mutating either side
//! detaches it first.

pub mod bsc;
pub mod bsr;
pub mod coo;
pub mod csc;
pub mod csr;

pub use bsc::BscMatrix;
pub use bsr::{BsrMatrix, Operand, Product};
pub use coo::CooMatrix;
pub use csc::CscMatrix;
pub use csr::CsrMatrix;

use hbsparse_core::{MatrixElement, SparseFormat, SparseMatrix, SparseError};

/// Conversion contract shared by every sparse layout
pub trait SparseConvert<T: MatrixElement> {
    /// Storage layout of `self`
    fn format(&self) -> SparseFormat;

    /// Coordinate form; `copy` controls whether value buffers may be shared
    fn to_coo(&self, copy: bool) -> CooMatrix<T>;

    fn to_csr(&self) -> CsrMatrix<T> {
        self.to_coo(false).to_csr()
    }

    fn to_csc(&self) -> CscMatrix<T> {
        self.to_coo(false).to_csc()
    }

    /// Block sparse row form with the given block shape
    fn to_bsr(&self, blocksize: (usize, usize)) -> Result<BsrMatrix<T>, SparseError> {
        self.to_coo(false).to_bsr(blocksize)
    }

    /// Block sparse column form with the given block shape
    fn to_bsc(&self, blocksize: (usize, usize)) -> Result<BscMatrix<T>, SparseError> {
        self.to_bsr(blocksize)?.to_bsc(blocksize)
    }
}

/// Counting-sort transpose of compressed structure arrays
///
/// Returns the transposed pointer and index arrays plus the permutation
/// mapping each transposed slot to its source slot. Indices come out sorted
/// within each transposed major.
pub(crate) fn transpose_structure(
    indptr: &[usize],
    indices: &[usize],
    n_minor: usize,
) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let nnz = indices.len();
    let mut t_indptr = vec![0usize; n_minor + 1];
    for &j in indices {
        t_indptr[j + 1] += 1;
    }
    for j in 0..n_minor {
        t_indptr[j + 1] += t_indptr[j];
    }

    let mut t_indices = vec![0usize; nnz];
    let mut perm = vec![0usize; nnz];
    let mut next = t_indptr[..n_minor].to_vec();
    for (major, window) in indptr.windows(2).enumerate() {
        for k in window[0]..window[1] {
            let j = indices[k];
            let pos = next[j];
            t_indices[pos] = major;
            perm[pos] = k;
            next[j] += 1;
        }
    }
    (t_indptr, t_indices, perm)
}

/// Gather fixed-size blocks of `data` in `perm` order
pub(crate) fn permute_blocks<T: Copy>(data: &[T], perm: &[usize], block_len: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(perm.len() * block_len);
    for &k in perm {
        out.extend_from_slice(&data[k * block_len..(k + 1) * block_len]);
    }
    out
}

/// Transpose every row-major `rows x cols` block of `data`
pub(crate) fn transpose_blocks<T: Copy>(data: &[T], rows: usize, cols: usize) -> Vec<T> {
    let block_len = rows * cols;
    let mut out = Vec::with_capacity(data.len());
    if block_len == 0 {
        return out;
    }
    for block in data.chunks_exact(block_len) {
        for c in 0..cols {
            for r in 0..rows {
                out.push(block[r * cols + c]);
            }
        }
    }
    out
}

/// Any sparse layout
#[derive(Debug, Clone, PartialEq)]
pub enum SparseArray<T> {
    Coo(CooMatrix<T>),
    Csr(CsrMatrix<T>),
    Csc(CscMatrix<T>),
    Bsr(BsrMatrix<T>),
    Bsc(BscMatrix<T>),
}

impl<T: MatrixElement> SparseArray<T> {
    /// Shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.dimensions()
    }

    /// Block shape for block layouts, `(1, 1)` otherwise
    pub fn blocksize(&self) -> (usize, usize) {
        match self {
            SparseArray::Bsr(m) => m.blocksize(),
            SparseArray::Bsc(m) => m.blocksize(),
            _ => (1, 1),
        }
    }
}

impl<T: MatrixElement> SparseConvert<T> for SparseArray<T> {
    fn format(&self) -> SparseFormat {
        match self {
            SparseArray::Coo(m) => m.format(),
            SparseArray::Csr(m) => m.format(),
            SparseArray::Csc(m) => m.format(),
            SparseArray::Bsr(m) => m.format(),
            SparseArray::Bsc(m) => m.format(),
        }
    }

    fn to_coo(&self, copy: bool) -> CooMatrix<T> {
        match self {
            SparseArray::Coo(m) => m.to_coo(copy),
            SparseArray::Csr(m) => m.to_coo(copy),
            SparseArray::Csc(m) => m.to_coo(copy),
            SparseArray::Bsr(m) => m.to_coo(copy),
            SparseArray::Bsc(m) => m.to_coo(copy),
        }
    }

    fn to_csr(&self) -> CsrMatrix<T> {
        match self {
            SparseArray::Coo(m) => m.to_csr(),
            SparseArray::Csr(m) => m.to_csr(),
            SparseArray::Csc(m) => m.to_csr(),
            SparseArray::Bsr(m) => m.to_csr(),
            SparseArray::Bsc(m) => m.to_csr(),
        }
    }

    fn to_csc(&self) -> CscMatrix<T> {
        match self {
            SparseArray::Coo(m) => m.to_csc(),
            SparseArray::Csr(m) => m.to_csc(),
            SparseArray::Csc(m) => m.to_csc(),
            SparseArray::Bsr(m) => m.to_csc(),
            SparseArray::Bsc(m) => m.to_csc(),
        }
    }

    fn to_bsr(&self, blocksize: (usize, usize)) -> Result<BsrMatrix<T>, SparseError> {
        match self {
            SparseArray::Coo(m) => m.to_bsr(blocksize),
            SparseArray::Csr(m) => m.to_bsr(blocksize),
            SparseArray::Csc(m) => m.to_bsr(blocksize),
            SparseArray::Bsr(m) => m.to_bsr(blocksize),
            SparseArray::Bsc(m) => m.to_bsr(blocksize),
        }
    }

    fn to_bsc(&self, blocksize: (usize, usize)) -> Result<BscMatrix<T>, SparseError> {
        match self {
            SparseArray::Coo(m) => m.to_bsc(blocksize),
            SparseArray::Csr(m) => m.to_bsc(blocksize),
            SparseArray::Csc(m) => m.to_bsc(blocksize),
            SparseArray::Bsr(m) => m.to_bsc(blocksize),
            SparseArray::Bsc(m) => m.to_bsc(blocksize),
        }
    }
}

impl<T: MatrixElement> SparseMatrix for SparseArray<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        match self {
            SparseArray::Coo(m) => m.get_element(row, col),
            SparseArray::Csr(m) => m.get_element(row, col),
            SparseArray::Csc(m) => m.get_element(row, col),
            SparseArray::Bsr(m) => m.get_element(row, col),
            SparseArray::Bsc(m) => m.get_element(row, col),
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        match self {
            SparseArray::Coo(m) => m.dimensions(),
            SparseArray::Csr(m) => m.dimensions(),
            SparseArray::Csc(m) => m.dimensions(),
            SparseArray::Bsr(m) => m.dimensions(),
            SparseArray::Bsc(m) => m.dimensions(),
        }
    }

    fn nnz(&self) -> usize {
        match self {
            SparseArray::Coo(m) => m.nnz(),
            SparseArray::Csr(m) => m.nnz(),
            SparseArray::Csc(m) => m.nnz(),
            SparseArray::Bsr(m) => m.nnz(),
            SparseArray::Bsc(m) => m.nnz(),
        }
    }
}

macro_rules! impl_from_layout {
    ($ty:ident, $variant:ident) => {
        impl<T> From<$ty<T>> for SparseArray<T> {
            fn from(m: $ty<T>) -> Self {
                SparseArray::$variant(m)
            }
        }
    };
}

impl_from_layout!(CooMatrix, Coo);
impl_from_layout!(CsrMatrix, Csr);
impl_from_layout!(CscMatrix, Csc);
impl_from_layout!(BsrMatrix, Bsr);
impl_from_layout!(BscMatrix, Bsc);

/// Logical (row, col, value) entries with duplicates summed and explicit
/// zeros dropped, sorted row-major
#[cfg(test)]
pub(crate) fn entries<T: MatrixElement>(m: &impl SparseConvert<T>) -> Vec<(usize, usize, T)> {
    let mut coo = m.to_coo(true);
    coo.sum_duplicates();
    coo.eliminate_zeros();
    coo.triplets().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BsrMatrix<f64> {
        BsrMatrix::from_dense(
            &[
                1.0, 2.0, 0.0, 0.0, 0.0, 0.0, //
                3.0, 4.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 5.0, 6.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, 7.0,
            ],
            (4, 6),
            (2, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_transpose_structure() {
        // [[a, 0, b], [0, c, d]]
        let (indptr, indices, perm) = transpose_structure(&[0, 2, 4], &[0, 2, 1, 2], 3);
        assert_eq!(indptr, vec![0, 1, 2, 4]);
        assert_eq!(indices, vec![0, 1, 0, 1]);
        assert_eq!(perm, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_transpose_blocks() {
        assert_eq!(
            transpose_blocks(&[1, 2, 3, 4, 5, 6], 2, 3),
            vec![1, 4, 2, 5, 3, 6]
        );
        assert_eq!(permute_blocks(&[1, 2, 3, 4], &[1, 0], 2), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_every_layout_agrees() {
        let bsr = sample();
        let expected = entries(&bsr);
        assert_eq!(expected.len(), 7);

        let layouts: Vec<SparseArray<f64>> = vec![
            bsr.clone().into(),
            bsr.to_coo(true).into(),
            bsr.to_csr().into(),
            bsr.to_csc().into(),
            bsr.to_bsc((2, 2)).unwrap().into(),
            bsr.to_bsr((1, 3)).unwrap().into(),
            bsr.to_bsc((4, 3)).unwrap().into(),
        ];
        for layout in &layouts {
            assert_eq!(entries(layout), expected, "{}", layout.format());
            assert_eq!(layout.shape(), (4, 6));
            assert_eq!(layout.get_element(3, 5), Some(7.0));
            assert_eq!(layout.to_csr().to_dense(), bsr.to_dense());
        }
        assert_eq!(layouts[4].format(), SparseFormat::Bsc);
        assert_eq!(layouts[5].blocksize(), (1, 3));
    }

    #[test]
    fn test_reblock_rejects_bad_blocksize() {
        let bsr = sample();
        let err = bsr.to_bsr((3, 2)).unwrap_err();
        assert_eq!(
            err,
            SparseError::ShapeNotDivisible {
                shape: (4, 6),
                blocksize: (3, 2)
            }
        );
        let as_enum: SparseArray<f64> = bsr.into();
        assert!(as_enum.to_bsc((4, 4)).is_err());
    }
}
