//! Block sparse column (BSC) matrices

use super::{permute_blocks, transpose_blocks, BsrMatrix, CooMatrix, CscMatrix, SparseConvert};
use hbsparse_core::validation::{validate_blocksize, validate_compressed};
use hbsparse_core::{MatrixElement, SparseError, SparseFormat, SparseMatrix};
use std::sync::Arc;

/// Block sparse column matrix
///
/// `indptr` runs over the `N/Y` block columns and `indices` holds block
/// rows. Blocks are `X x Y` and stored row-major, like [`BsrMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct BscMatrix<T> {
    shape: (usize, usize),
    blocksize: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Arc<Vec<T>>,
}

impl<T: MatrixElement> BscMatrix<T> {
    /// Create a BSC matrix with validation
    pub fn new(
        shape: (usize, usize),
        blocksize: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, SparseError> {
        let (mb, nb) = validate_blocksize(shape, blocksize)?;
        validate_compressed(&indptr, &indices, nb, mb)?;
        if data.len() != indices.len() * blocksize.0 * blocksize.1 {
            return Err(SparseError::InvalidStructure(format!(
                "{} blocks of {}x{} cannot hold {} values",
                indices.len(),
                blocksize.0,
                blocksize.1,
                data.len()
            )));
        }
        Ok(Self::from_parts(shape, blocksize, indptr, indices, Arc::new(data)))
    }

    pub(crate) fn from_parts(
        shape: (usize, usize),
        blocksize: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Arc<Vec<T>>,
    ) -> Self {
        Self {
            shape,
            blocksize,
            indptr,
            indices,
            data,
        }
    }

    /// Block a row-major dense buffer, keeping every block with a nonzero
    pub fn from_dense(
        dense: &[T],
        shape: (usize, usize),
        blocksize: (usize, usize),
    ) -> Result<Self, SparseError> {
        BsrMatrix::from_dense(dense, shape, blocksize)?.to_bsc(blocksize)
    }

    /// Row-major dense copy
    pub fn to_dense(&self) -> Vec<T> {
        let (_, n) = self.shape;
        let (x, y) = self.blocksize;
        let mut dense = vec![T::zero(); self.shape.0 * n];
        for (j, window) in self.indptr.windows(2).enumerate() {
            for k in window[0]..window[1] {
                let i = self.indices[k];
                let block = self.block_slice(k);
                for r in 0..x {
                    for c in 0..y {
                        let at = (x * i + r) * n + y * j + c;
                        dense[at] = dense[at].add_wrapping(block[r * y + c]);
                    }
                }
            }
        }
        dense
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn blocksize(&self) -> (usize, usize) {
        self.blocksize
    }

    /// Block grid dimensions `(M/X, N/Y)`
    pub fn block_grid(&self) -> (usize, usize) {
        (
            self.shape.0 / self.blocksize.0,
            self.shape.1 / self.blocksize.1,
        )
    }

    pub fn num_blocks(&self) -> usize {
        self.indices.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn shared_data(&self) -> &Arc<Vec<T>> {
        &self.data
    }

    fn block_len(&self) -> usize {
        self.blocksize.0 * self.blocksize.1
    }

    fn block_slice(&self, k: usize) -> &[T] {
        let len = self.block_len();
        &self.data[k * len..(k + 1) * len]
    }

    /// Transpose into a BSR matrix of shape `(N, M)` and block shape `(Y, X)`
    pub fn transpose(&self) -> BsrMatrix<T> {
        let (x, y) = self.blocksize;
        BsrMatrix::from_parts(
            (self.shape.1, self.shape.0),
            (y, x),
            self.indptr.clone(),
            self.indices.clone(),
            Arc::new(transpose_blocks(&self.data, x, y)),
        )
    }

    /// Transpose without copying the structure arrays
    pub fn into_transpose(self) -> BsrMatrix<T> {
        let (x, y) = self.blocksize;
        let data = if x == 1 || y == 1 {
            self.data
        } else {
            Arc::new(transpose_blocks(&self.data, x, y))
        };
        BsrMatrix::from_parts(
            (self.shape.1, self.shape.0),
            (y, x),
            self.indptr,
            self.indices,
            data,
        )
    }
}

impl<T: MatrixElement> SparseMatrix for BscMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        let (x, y) = self.blocksize;
        let (i, j) = (row / x, col / y);
        let offset = (row % x) * y + col % y;
        (self.indptr[j]..self.indptr[j + 1])
            .filter(|&k| self.indices[k] == i)
            .map(|k| self.block_slice(k)[offset])
            .reduce(T::add_wrapping)
    }

    fn dimensions(&self) -> (usize, usize) {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl<T: MatrixElement> SparseConvert<T> for BscMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Bsc
    }

    fn to_coo(&self, copy: bool) -> CooMatrix<T> {
        let (x, y) = self.blocksize;
        let len = self.data.len();
        let mut row = Vec::with_capacity(len);
        let mut col = Vec::with_capacity(len);
        for (j, window) in self.indptr.windows(2).enumerate() {
            for &i in &self.indices[window[0]..window[1]] {
                for r in 0..x {
                    for c in 0..y {
                        row.push(x * i + r);
                        col.push(y * j + c);
                    }
                }
            }
        }
        let data = if copy {
            Arc::new(self.data.to_vec())
        } else {
            Arc::clone(&self.data)
        };
        CooMatrix::from_shared(self.shape, row, col, data)
    }

    /// Block sparse row form, permuting blocks when the block shape is kept
    fn to_bsr(&self, blocksize: (usize, usize)) -> Result<BsrMatrix<T>, SparseError> {
        if blocksize != self.blocksize {
            log::debug!(
                "re-blocking BSC matrix from {:?} to {blocksize:?} BSR",
                self.blocksize
            );
            return self.to_coo(false).to_bsr(blocksize);
        }
        let proxy = CscMatrix::from_parts(
            self.block_grid(),
            self.indptr.clone(),
            self.indices.clone(),
            (0..self.num_blocks()).collect::<Vec<usize>>(),
        );
        let (_, indptr, indices, perm) = proxy.to_csr().into_parts();
        let data = permute_blocks(&self.data, &perm, self.block_len());
        Ok(BsrMatrix::from_parts(
            self.shape,
            self.blocksize,
            indptr,
            indices,
            Arc::new(data),
        ))
    }

    fn to_bsc(&self, blocksize: (usize, usize)) -> Result<BscMatrix<T>, SparseError> {
        if blocksize == self.blocksize {
            return Ok(Self::from_parts(
                self.shape,
                self.blocksize,
                self.indptr.clone(),
                self.indices.clone(),
                Arc::new(self.data.to_vec()),
            ));
        }
        self.to_bsr(blocksize)?.to_bsc(blocksize)
    }
}
