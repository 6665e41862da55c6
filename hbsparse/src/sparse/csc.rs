//! Compressed sparse column (CSC) matrices
//!
//! This is the layout Harwell-Boeing files store.

use super::{transpose_structure, CooMatrix, CsrMatrix, SparseConvert};
use hbsparse_core::validation::validate_compressed;
use hbsparse_core::{CompressedColumns, MatrixElement, SparseError, SparseFormat, SparseMatrix};
use std::sync::Arc;

/// Column-compressed sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T> {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: Copy> CscMatrix<T> {
    /// Create a CSC matrix with validation
    pub fn new(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, SparseError> {
        validate_compressed(&indptr, &indices, shape.1, shape.0)?;
        if data.len() != indices.len() {
            return Err(SparseError::InvalidStructure(format!(
                "{} indices but {} values",
                indices.len(),
                data.len()
            )));
        }
        Ok(Self::from_parts(shape, indptr, indices, data))
    }

    pub(crate) fn from_parts(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Self {
        Self {
            shape,
            indptr,
            indices,
            data,
        }
    }

    /// Split into (shape, indptr, indices, data)
    pub fn into_parts(self) -> ((usize, usize), Vec<usize>, Vec<usize>, Vec<T>) {
        (self.shape, self.indptr, self.indices, self.data)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
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

    /// Same matrix in row-compressed form
    pub fn to_csr(&self) -> CsrMatrix<T> {
        self.row_compressed()
    }

    /// Transpose, reusing the arrays as a row-compressed matrix
    pub fn transpose(&self) -> CsrMatrix<T> {
        let (m, n) = self.shape;
        CsrMatrix::from_parts(
            (n, m),
            self.indptr.clone(),
            self.indices.clone(),
            self.data.clone(),
        )
    }

    fn row_compressed(&self) -> CsrMatrix<T> {
        let (indptr, indices, perm) = transpose_structure(&self.indptr, &self.indices, self.shape.0);
        let data = perm.iter().map(|&k| self.data[k]).collect();
        CsrMatrix::from_parts(self.shape, indptr, indices, data)
    }
}

impl<T: MatrixElement> CscMatrix<T> {
    /// Compress a row-major dense buffer, keeping nonzero entries
    pub fn from_dense(dense: &[T], shape: (usize, usize)) -> Result<Self, SparseError> {
        Ok(CsrMatrix::from_dense(dense, shape)?.to_csc())
    }

    /// Row-major dense copy, duplicates summed
    pub fn to_dense(&self) -> Vec<T> {
        let (m, n) = self.shape;
        let mut dense = vec![T::zero(); m * n];
        for j in 0..n {
            for k in self.indptr[j]..self.indptr[j + 1] {
                let i = self.indices[k];
                dense[i * n + j] = dense[i * n + j].add_wrapping(self.data[k]);
            }
        }
        dense
    }

    /// Matrix-vector product over plain slices
    pub fn matvec(&self, x: &[T]) -> Result<Vec<T>, SparseError> {
        let (m, n) = self.shape;
        if x.len() != n {
            return Err(SparseError::dimension_mismatch(&[n], &[x.len()]));
        }
        let mut y = vec![T::zero(); m];
        for (j, &xj) in x.iter().enumerate() {
            for k in self.indptr[j]..self.indptr[j + 1] {
                let i = self.indices[k];
                y[i] = y[i].add_wrapping(self.data[k].mul_wrapping(xj));
            }
        }
        Ok(y)
    }
}

impl<T: MatrixElement> SparseMatrix for CscMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        if col >= self.shape.1 {
            return None;
        }
        (self.indptr[col]..self.indptr[col + 1])
            .filter(|&k| self.indices[k] == row)
            .map(|k| self.data[k])
            .reduce(T::add_wrapping)
    }

    fn dimensions(&self) -> (usize, usize) {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl<T: MatrixElement> CompressedColumns for CscMatrix<T> {
    type Element = T;

    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn values(&self) -> &[T] {
        &self.data
    }
}

impl<T: MatrixElement> SparseConvert<T> for CscMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csc
    }

    fn to_coo(&self, _copy: bool) -> CooMatrix<T> {
        let mut col = Vec::with_capacity(self.data.len());
        for j in 0..self.shape.1 {
            col.extend(std::iter::repeat(j).take(self.indptr[j + 1] - self.indptr[j]));
        }
        CooMatrix::from_shared(
            self.shape,
            self.indices.clone(),
            col,
            Arc::new(self.data.clone()),
        )
    }

    fn to_csr(&self) -> CsrMatrix<T> {
        self.row_compressed()
    }

    fn to_csc(&self) -> CscMatrix<T> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [[1, 0, 2],
    //  [0, 0, 3],
    //  [4, 5, 0]]
    fn sample() -> CscMatrix<f64> {
        CscMatrix::new(
            (3, 3),
            vec![0, 2, 3, 5],
            vec![0, 2, 2, 0, 1],
            vec![1.0, 4.0, 5.0, 2.0, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_new_validation() {
        let err = CscMatrix::new((2, 3), vec![0, 1, 1], vec![0], vec![1.0f64]).unwrap_err();
        assert!(matches!(err, SparseError::InvalidStructure(_)));
        assert!(CscMatrix::new((2, 3), vec![0, 1, 1, 1], vec![2], vec![1.0f64]).is_err());
    }

    #[test]
    fn test_to_csr() {
        let csr = sample().to_csr();
        assert_eq!(csr.indptr(), &[0, 2, 3, 5]);
        assert_eq!(csr.indices(), &[0, 2, 2, 0, 1]);
        assert_eq!(csr.data(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(CscMatrix::from_dense(&csr.to_dense(), (3, 3)).unwrap(), sample());
    }

    #[test]
    fn test_compressed_columns() {
        let csc = sample();
        assert_eq!(CompressedColumns::shape(&csc), (3, 3));
        assert_eq!(csc.values(), &[1.0, 4.0, 5.0, 2.0, 3.0]);
    }

    #[test]
    fn test_matvec() {
        assert_eq!(sample().matvec(&[1.0, 2.0, 3.0]).unwrap(), vec![7.0, 9.0, 14.0]);
        assert!(sample().matvec(&[1.0]).is_err());
    }

    #[test]
    fn test_get_element() {
        assert_eq!(sample().get_element(2, 1), Some(5.0));
        assert_eq!(sample().get_element(1, 1), None);
        assert_eq!(sample().get_element(0, 9), None);
    }
}
