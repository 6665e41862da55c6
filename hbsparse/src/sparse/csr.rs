//! Compressed sparse row (CSR) matrices

use super::{transpose_structure, CooMatrix, CscMatrix, SparseConvert};
use hbsparse_core::validation::validate_compressed;
use hbsparse_core::{MatrixElement, SparseError, SparseFormat, SparseMatrix};
use std::sync::Arc;

/// Row-compressed sparse matrix
///
/// Structural operations only need `T: Copy`, so index matrices over
/// `usize` payloads can reuse the same permutation logic.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: Copy> CsrMatrix<T> {
    /// Create a CSR matrix with validation
    pub fn new(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, SparseError> {
        validate_compressed(&indptr, &indices, shape.0, shape.1)?;
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

    /// Same matrix in column-compressed form
    ///
    /// Row indices come out sorted within each column.
    pub fn to_csc(&self) -> CscMatrix<T> {
        self.column_compressed()
    }

    /// Transpose, reusing the arrays as a column-compressed matrix
    pub fn transpose(&self) -> CscMatrix<T> {
        let (m, n) = self.shape;
        CscMatrix::from_parts(
            (n, m),
            self.indptr.clone(),
            self.indices.clone(),
            self.data.clone(),
        )
    }

    fn column_compressed(&self) -> CscMatrix<T> {
        let (indptr, indices, perm) = transpose_structure(&self.indptr, &self.indices, self.shape.1);
        let data = perm.iter().map(|&k| self.data[k]).collect();
        CscMatrix::from_parts(self.shape, indptr, indices, data)
    }
}

impl<T: MatrixElement> CsrMatrix<T> {
    /// Compress a row-major dense buffer, keeping nonzero entries
    pub fn from_dense(dense: &[T], shape: (usize, usize)) -> Result<Self, SparseError> {
        let (m, n) = shape;
        if dense.len() != m * n {
            return Err(SparseError::dimension_mismatch(&[m * n], &[dense.len()]));
        }
        let mut indptr = Vec::with_capacity(m + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for (i, row) in dense.chunks(n.max(1)).take(m).enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if v != T::zero() {
                    indices.push(j);
                    data.push(v);
                }
            }
            debug_assert_eq!(indptr.len(), i + 1);
            indptr.push(indices.len());
        }
        indptr.resize(m + 1, indices.len());
        Ok(Self::from_parts(shape, indptr, indices, data))
    }

    /// Row-major dense copy, duplicates summed
    pub fn to_dense(&self) -> Vec<T> {
        let (m, n) = self.shape;
        let mut dense = vec![T::zero(); m * n];
        for i in 0..m {
            for k in self.indptr[i]..self.indptr[i + 1] {
                let j = self.indices[k];
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
        for (i, yi) in y.iter_mut().enumerate() {
            for k in self.indptr[i]..self.indptr[i + 1] {
                *yi = yi.add_wrapping(self.data[k].mul_wrapping(x[self.indices[k]]));
            }
        }
        Ok(y)
    }
}

impl<T: MatrixElement> SparseMatrix for CsrMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.shape.0 {
            return None;
        }
        (self.indptr[row]..self.indptr[row + 1])
            .filter(|&k| self.indices[k] == col)
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

impl<T: MatrixElement> SparseConvert<T> for CsrMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csr
    }

    fn to_coo(&self, _copy: bool) -> CooMatrix<T> {
        let mut row = Vec::with_capacity(self.data.len());
        for i in 0..self.shape.0 {
            row.extend(std::iter::repeat(i).take(self.indptr[i + 1] - self.indptr[i]));
        }
        CooMatrix::from_shared(
            self.shape,
            row,
            self.indices.clone(),
            Arc::new(self.data.clone()),
        )
    }

    fn to_csr(&self) -> CsrMatrix<T> {
        self.clone()
    }

    fn to_csc(&self) -> CscMatrix<T> {
        self.column_compressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [[1, 0, 2],
    //  [0, 0, 3],
    //  [4, 5, 0]]
    fn sample() -> CsrMatrix<i32> {
        CsrMatrix::new((3, 3), vec![0, 2, 3, 5], vec![0, 2, 2, 0, 1], vec![1, 2, 3, 4, 5]).unwrap()
    }

    #[test]
    fn test_new_validation() {
        assert!(CsrMatrix::new((2, 2), vec![0, 1], vec![0], vec![1.0f32]).is_err());
        assert!(CsrMatrix::new((2, 2), vec![0, 1, 1], vec![0], vec![1.0f32, 2.0]).is_err());
        assert!(CsrMatrix::new((2, 2), vec![0, 1, 1], vec![5], vec![1.0f32]).is_err());
    }

    #[test]
    fn test_to_csc() {
        let csc = sample().to_csc();
        assert_eq!(csc.indptr(), &[0, 2, 3, 5]);
        assert_eq!(csc.indices(), &[0, 2, 2, 0, 1]);
        assert_eq!(csc.data(), &[1, 4, 5, 2, 3]);
        assert_eq!(csc.to_dense(), sample().to_dense());
    }

    #[test]
    fn test_index_payload() {
        let proxy = CsrMatrix::new((2, 3), vec![0, 2, 3], vec![2, 0, 1], vec![0usize, 1, 2]).unwrap();
        let (_, indptr, indices, perm) = proxy.to_csc().into_parts();
        assert_eq!(indptr, vec![0, 1, 2, 3]);
        assert_eq!(indices, vec![0, 1, 0]);
        assert_eq!(perm, vec![1, 2, 0]);
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = sample().to_dense();
        assert_eq!(dense, vec![1, 0, 2, 0, 0, 3, 4, 5, 0]);
        assert_eq!(CsrMatrix::from_dense(&dense, (3, 3)).unwrap(), sample());
        assert!(CsrMatrix::from_dense(&dense, (2, 3)).is_err());
    }

    #[test]
    fn test_matvec() {
        assert_eq!(sample().matvec(&[1, 1, 1]).unwrap(), vec![3, 3, 9]);
        assert_eq!(
            sample().matvec(&[1, 1]),
            Err(SparseError::dimension_mismatch(&[3], &[2]))
        );
    }

    #[test]
    fn test_matvec_wraps_integers() {
        let csr = CsrMatrix::new((1, 2), vec![0, 2], vec![0, 1], vec![i64::MAX, 1]).unwrap();
        assert_eq!(csr.matvec(&[1, 1]).unwrap(), vec![i64::MIN]);
        assert_eq!(csr.to_csc().matvec(&[2, 0]).unwrap(), vec![-2]);
    }

    #[test]
    fn test_transpose_and_coo() {
        let t = sample().transpose();
        assert_eq!(t.shape(), (3, 3));
        assert_eq!(t.get_element(2, 0), Some(2));
        let coo = sample().to_coo(false);
        assert_eq!(coo.row(), &[0, 0, 1, 2, 2]);
        assert_eq!(sample().get_element(1, 1), None);
    }
}
