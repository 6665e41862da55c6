//! Block sparse row (BSR) matrices
//!
//! A BSR matrix of shape `(M, N)` with block shape `(X, Y)` stores dense
//! `X x Y` blocks indexed like a CSR matrix over the `(M/X, N/Y)` block
//! grid. Block values are kept row-major, one block after another, in a
//! single buffer behind an `Arc` so coordinate views can alias it.

use super::{
    permute_blocks, transpose_blocks, BscMatrix, CooMatrix, CsrMatrix, SparseArray,
    SparseConvert,
};
use crate::dense::{ArrayData, DenseArray, DenseElement};
use hbsparse_core::validation::{validate_blocksize, validate_compressed};
use hbsparse_core::{DataType, MatrixElement, SparseError, SparseFormat, SparseMatrix};
use num_traits::NumCast;
use std::ops::Mul;
use std::sync::Arc;

/// Block sparse row matrix
#[derive(Debug, Clone, PartialEq)]
pub struct BsrMatrix<T> {
    shape: (usize, usize),
    blocksize: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Arc<Vec<T>>,
}

/// Right-hand side accepted by [`BsrMatrix::multiply`]
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, T> {
    Scalar(T),
    Dense(&'a DenseArray),
    Sparse(&'a SparseArray<T>),
}

/// Result of [`BsrMatrix::multiply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Product<T> {
    Sparse(BsrMatrix<T>),
    Dense(DenseArray),
}

impl<T: MatrixElement> BsrMatrix<T> {
    /// Create a BSR matrix with validation
    ///
    /// `data` holds `indices.len()` row-major blocks of `blocksize`.
    pub fn new(
        shape: (usize, usize),
        blocksize: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, SparseError> {
        let (mb, nb) = validate_blocksize(shape, blocksize)?;
        validate_compressed(&indptr, &indices, mb, nb)?;
        let expected = indices.len() * blocksize.0 * blocksize.1;
        if data.len() != expected {
            return Err(SparseError::InvalidStructure(format!(
                "{} blocks of {}x{} need {expected} values, got {}",
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

    /// Matrix with no stored blocks
    pub fn zeros(shape: (usize, usize), blocksize: (usize, usize)) -> Result<Self, SparseError> {
        let (mb, _) = validate_blocksize(shape, blocksize)?;
        Ok(Self::from_parts(
            shape,
            blocksize,
            vec![0; mb + 1],
            Vec::new(),
            Arc::new(Vec::new()),
        ))
    }

    /// Block a row-major dense buffer, keeping every block with a nonzero
    pub fn from_dense(
        dense: &[T],
        shape: (usize, usize),
        blocksize: (usize, usize),
    ) -> Result<Self, SparseError> {
        let (m, n) = shape;
        if dense.len() != m * n {
            return Err(SparseError::dimension_mismatch(&[m * n], &[dense.len()]));
        }
        let (mb, nb) = validate_blocksize(shape, blocksize)?;
        let (x, y) = blocksize;

        let mut indptr = Vec::with_capacity(mb + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        let mut block = Vec::with_capacity(x * y);
        indptr.push(0);
        for i in 0..mb {
            for j in 0..nb {
                block.clear();
                for r in 0..x {
                    let start = (x * i + r) * n + y * j;
                    block.extend_from_slice(&dense[start..start + y]);
                }
                if block.iter().any(|&v| v != T::zero()) {
                    indices.push(j);
                    data.extend_from_slice(&block);
                }
            }
            indptr.push(indices.len());
        }
        Ok(Self::from_parts(shape, blocksize, indptr, indices, Arc::new(data)))
    }

    /// Row-major dense copy
    pub fn to_dense(&self) -> Vec<T> {
        let (_, n) = self.shape;
        let (x, y) = self.blocksize;
        let mut dense = vec![T::zero(); self.shape.0 * n];
        for (i, window) in self.indptr.windows(2).enumerate() {
            for k in window[0]..window[1] {
                let j = self.indices[k];
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

    /// Number of stored blocks
    pub fn num_blocks(&self) -> usize {
        self.indices.len()
    }

    /// Values of the `k`-th stored block, row-major
    pub fn block(&self, k: usize) -> Option<&[T]> {
        (k < self.num_blocks()).then(|| self.block_slice(k))
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

    /// Shared handle to the block buffer
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

    /// Transpose into a BSC matrix of shape `(N, M)` and block shape `(Y, X)`
    ///
    /// The result owns fresh copies of every array.
    pub fn transpose(&self) -> BscMatrix<T> {
        let (x, y) = self.blocksize;
        BscMatrix::from_parts(
            (self.shape.1, self.shape.0),
            (y, x),
            self.indptr.clone(),
            self.indices.clone(),
            Arc::new(transpose_blocks(&self.data, x, y)),
        )
    }

    /// Transpose without copying the structure arrays
    ///
    /// With a single-row or single-column block shape the block buffer is
    /// reused as well.
    pub fn into_transpose(self) -> BscMatrix<T> {
        let (x, y) = self.blocksize;
        let data = if x == 1 || y == 1 {
            self.data
        } else {
            Arc::new(transpose_blocks(&self.data, x, y))
        };
        BscMatrix::from_parts(
            (self.shape.1, self.shape.0),
            (y, x),
            self.indptr,
            self.indices,
            data,
        )
    }

    /// Multiply every stored value by `factor`
    pub fn scale(&self, factor: T) -> Self {
        let data = self.data.iter().map(|&v| v.mul_wrapping(factor)).collect();
        Self::from_parts(
            self.shape,
            self.blocksize,
            self.indptr.clone(),
            self.indices.clone(),
            Arc::new(data),
        )
    }

    /// Multiply by a scalar or a dense vector
    ///
    /// Sparse operands are rejected; sparse-sparse products go through a
    /// dedicated matrix-matrix path instead.
    pub fn multiply(&self, other: Operand<'_, T>) -> Result<Product<T>, SparseError> {
        match other {
            Operand::Scalar(factor) => Ok(Product::Sparse(self.scale(factor))),
            Operand::Dense(x) => self.matvec(x).map(Product::Dense),
            Operand::Sparse(rhs) => Err(SparseError::Unsupported(format!(
                "cannot multiply a BSR matrix by a {} operand as a dense vector; \
                 use a sparse-sparse matrix product (matmat) instead",
                rhs.format()
            ))),
        }
    }

    /// Matrix-vector product into a new array
    ///
    /// `x` must have shape `(N,)` or `(N, 1)`; the result has the matching
    /// shape `(M,)` or `(M, 1)` and the promoted kind of the two operands.
    pub fn matvec(&self, x: &DenseArray) -> Result<DenseArray, SparseError> {
        self.check_operand(x)?;
        let kind = self.result_type(x);
        let mut out = if x.is_column() {
            DenseArray::zeros_column(kind, self.shape.0)
        } else {
            DenseArray::zeros(kind, self.shape.0)
        };
        self.accumulate(x, &mut out);
        Ok(out)
    }

    /// Matrix-vector product into a caller-supplied output
    ///
    /// Every check runs before `out` is touched: on error its contents are
    /// unchanged. On success `out` is overwritten with the product.
    pub fn matvec_into(&self, x: &DenseArray, out: &mut DenseArray) -> Result<(), SparseError> {
        self.check_operand(x)?;
        let m = self.shape.0;
        if out.len() != m {
            let expected = if out.is_column() { vec![m, 1] } else { vec![m] };
            return Err(SparseError::DimensionMismatch {
                expected,
                got: out.shape(),
            });
        }
        if !out.is_contiguous() {
            return Err(SparseError::NotContiguous);
        }
        let kind = self.result_type(x);
        if out.data_type() != kind {
            return Err(SparseError::KindMismatch {
                expected: kind,
                got: out.data_type(),
            });
        }
        self.accumulate(x, out);
        Ok(())
    }

    fn result_type(&self, x: &DenseArray) -> DataType {
        T::data_type().promote(x.data_type())
    }

    fn check_operand(&self, x: &DenseArray) -> Result<(), SparseError> {
        let n = self.shape.1;
        if x.len() != n {
            let expected = if x.is_column() { vec![n, 1] } else { vec![n] };
            return Err(SparseError::DimensionMismatch {
                expected,
                got: x.shape(),
            });
        }
        Ok(())
    }

    fn accumulate(&self, x: &DenseArray, out: &mut DenseArray) {
        let len = out.len();
        match out.data_mut() {
            ArrayData::F32(y) => self.accumulate_into(x, &mut y[..len]),
            ArrayData::F64(y) => self.accumulate_into(x, &mut y[..len]),
            ArrayData::I32(y) => self.accumulate_into(x, &mut y[..len]),
            ArrayData::I64(y) => self.accumulate_into(x, &mut y[..len]),
        }
    }

    fn accumulate_into<U: DenseElement>(&self, x: &DenseArray, y: &mut [U]) {
        bytemuck::fill_zeroes(y);
        let xs = x.gather::<U>();
        let (bx, by) = self.blocksize;
        for (i, window) in self.indptr.windows(2).enumerate() {
            let rows = &mut y[bx * i..bx * (i + 1)];
            for k in window[0]..window[1] {
                let cols = &xs[by * self.indices[k]..by * (self.indices[k] + 1)];
                for (r, block_row) in self.block_slice(k).chunks_exact(by).enumerate() {
                    let sum = block_row
                        .iter()
                        .zip(cols)
                        .fold(U::zero(), |acc, (&a, &b)| {
                            let a = <U as NumCast>::from(a).unwrap_or_else(U::zero);
                            acc.add_wrapping(a.mul_wrapping(b))
                        });
                    rows[r] = rows[r].add_wrapping(sum);
                }
            }
        }
    }
}

impl<T: MatrixElement> Mul<T> for &BsrMatrix<T> {
    type Output = BsrMatrix<T>;

    fn mul(self, rhs: T) -> BsrMatrix<T> {
        self.scale(rhs)
    }
}

impl<T: MatrixElement> Mul<T> for BsrMatrix<T> {
    type Output = BsrMatrix<T>;

    fn mul(mut self, rhs: T) -> BsrMatrix<T> {
        for v in Arc::make_mut(&mut self.data).iter_mut() {
            *v = v.mul_wrapping(rhs);
        }
        self
    }
}

impl<T: MatrixElement> SparseMatrix for BsrMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        let (x, y) = self.blocksize;
        let (i, j) = (row / x, col / y);
        let offset = (row % x) * y + col % y;
        (self.indptr[i]..self.indptr[i + 1])
            .filter(|&k| self.indices[k] == j)
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

impl<T: MatrixElement> SparseConvert<T> for BsrMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Bsr
    }

    /// Expand every block into coordinate entries
    ///
    /// Entries come out in block storage order, so with `copy == false`
    /// the result shares this matrix's value buffer.
    fn to_coo(&self, copy: bool) -> CooMatrix<T> {
        let (x, y) = self.blocksize;
        let len = self.data.len();
        let mut row = Vec::with_capacity(len);
        let mut col = Vec::with_capacity(len);
        for (i, window) in self.indptr.windows(2).enumerate() {
            for &j in &self.indices[window[0]..window[1]] {
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

    fn to_bsr(&self, blocksize: (usize, usize)) -> Result<BsrMatrix<T>, SparseError> {
        if blocksize == self.blocksize {
            return Ok(Self::from_parts(
                self.shape,
                self.blocksize,
                self.indptr.clone(),
                self.indices.clone(),
                Arc::new(self.data.to_vec()),
            ));
        }
        log::debug!(
            "re-blocking BSR matrix from {:?} to {blocksize:?}",
            self.blocksize
        );
        self.to_coo(false).to_bsr(blocksize)
    }

    /// Block sparse column form
    ///
    /// At the current block shape the blocks are permuted in place of a
    /// re-blocking: a CSR matrix over block coordinates whose values are
    /// block numbers is converted to CSC, and its values give the order in
    /// which to gather the blocks.
    fn to_bsc(&self, blocksize: (usize, usize)) -> Result<BscMatrix<T>, SparseError> {
        if blocksize != self.blocksize {
            log::debug!(
                "re-blocking BSR matrix from {:?} to {blocksize:?} BSC",
                self.blocksize
            );
            return self.to_coo(false).to_bsr(blocksize)?.to_bsc(blocksize);
        }
        let proxy = CsrMatrix::from_parts(
            self.block_grid(),
            self.indptr.clone(),
            self.indices.clone(),
            (0..self.num_blocks()).collect::<Vec<usize>>(),
        );
        let (_, indptr, indices, perm) = proxy.to_csc().into_parts();
        let data = permute_blocks(&self.data, &perm, self.block_len());
        Ok(BscMatrix::from_parts(
            self.shape,
            self.blocksize,
            indptr,
            indices,
            Arc::new(data),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::entries;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_by_two() -> BsrMatrix<f64> {
        BsrMatrix::new((2, 2), (2, 2), vec![0, 1], vec![0], vec![1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    // [[1, 2, 0, 0],
    //  [0, 3, 0, 0],
    //  [0, 0, 4, 0],
    //  [0, 0, 5, 6]] stored as 2x2 blocks
    fn four_by_four() -> BsrMatrix<i32> {
        BsrMatrix::new(
            (4, 4),
            (2, 2),
            vec![0, 1, 2],
            vec![0, 1],
            vec![1, 2, 0, 3, 4, 0, 5, 6],
        )
        .unwrap()
    }

    fn random_dense(rng: &mut StdRng, shape: (usize, usize), density: f64) -> Vec<i64> {
        (0..shape.0 * shape.1)
            .map(|_| {
                if rng.gen_bool(density) {
                    rng.gen_range(-9..=9)
                } else {
                    0
                }
            })
            .collect()
    }

    fn dense_matvec(dense: &[i64], shape: (usize, usize), x: &[i64]) -> Vec<i64> {
        (0..shape.0)
            .map(|i| (0..shape.1).map(|j| dense[i * shape.1 + j] * x[j]).sum())
            .collect()
    }

    #[test]
    fn test_new_validation() {
        assert!(matches!(
            BsrMatrix::new((4, 4), (3, 2), vec![0], vec![], Vec::<f64>::new()),
            Err(SparseError::ShapeNotDivisible { .. })
        ));
        assert!(BsrMatrix::new((2, 2), (2, 2), vec![0, 1], vec![0], vec![1.0f64]).is_err());
        assert!(BsrMatrix::new((2, 2), (2, 2), vec![0, 1], vec![1], vec![0.0f64; 4]).is_err());
        assert_eq!(BsrMatrix::<f32>::zeros((4, 6), (2, 3)).unwrap().indptr(), &[0, 0, 0]);
    }

    #[test]
    fn test_matvec_two_by_two() {
        let y = two_by_two()
            .matvec(&DenseArray::from_vec(vec![1.0f64, 1.0]))
            .unwrap();
        assert_eq!(y.as_slice::<f64>(), Some(&[3.0, 7.0][..]));
        assert_eq!(y.shape(), vec![2]);

        let col = two_by_two()
            .matvec(&DenseArray::column(vec![1.0f64, 1.0]))
            .unwrap();
        assert_eq!(col.shape(), vec![2, 1]);
    }

    #[test]
    fn test_matvec_promotes() {
        let y = four_by_four()
            .matvec(&DenseArray::from_vec(vec![1.0f32, 0.5, 1.0, 2.0]))
            .unwrap();
        assert_eq!(y.data_type(), DataType::F64);
        assert_eq!(y.as_slice::<f64>(), Some(&[2.0, 1.5, 4.0, 17.0][..]));

        let y = four_by_four()
            .matvec(&DenseArray::from_vec(vec![1i64, 1, 1, 1]))
            .unwrap();
        assert_eq!(y.as_slice::<i64>(), Some(&[3i64, 3, 4, 11][..]));
    }

    #[test]
    fn test_matvec_wrong_length_leaves_output() {
        let bsr = four_by_four();
        let x = DenseArray::from_vec(vec![1i32, 2, 3]);
        let mut out = DenseArray::from_vec(vec![9i32; 4]);
        let err = bsr.matvec_into(&x, &mut out).unwrap_err();
        assert_eq!(err, SparseError::dimension_mismatch(&[4], &[3]));
        assert_eq!(out.as_slice::<i32>(), Some(&[9, 9, 9, 9][..]));
        assert!(bsr.matvec(&x).is_err());
    }

    #[test]
    fn test_matvec_into_checks_output() {
        let bsr = four_by_four();
        let x = DenseArray::from_vec(vec![1i32, 1, 1, 1]);

        let mut short = DenseArray::zeros(DataType::I32, 3);
        assert!(matches!(
            bsr.matvec_into(&x, &mut short),
            Err(SparseError::DimensionMismatch { .. })
        ));

        let mut strided = DenseArray::strided(vec![0i32; 8], 2).unwrap();
        assert_eq!(
            bsr.matvec_into(&x, &mut strided),
            Err(SparseError::NotContiguous)
        );

        let mut wrong_kind = DenseArray::zeros(DataType::F64, 4);
        assert_eq!(
            bsr.matvec_into(&x, &mut wrong_kind),
            Err(SparseError::KindMismatch {
                expected: DataType::I32,
                got: DataType::F64
            })
        );

        let mut out = DenseArray::from_vec(vec![7i32; 4]);
        bsr.matvec_into(&x, &mut out).unwrap();
        assert_eq!(out.as_slice::<i32>(), Some(&[3, 3, 4, 11][..]));
    }

    #[test]
    fn test_matvec_strided_operand() {
        let x = DenseArray::strided(vec![1.0f64, 0.0, 2.0], 2).unwrap();
        let y = two_by_two().matvec(&x).unwrap();
        assert_eq!(y.to_f64_vec(), vec![5.0, 11.0]);
    }

    #[test]
    fn test_multiply_dispatch() {
        let bsr = two_by_two();
        match bsr.multiply(Operand::Scalar(2.0)).unwrap() {
            Product::Sparse(m) => assert_eq!(m.data(), &[2.0, 4.0, 6.0, 8.0]),
            Product::Dense(_) => panic!("scalar product should stay sparse"),
        }

        let x = DenseArray::from_vec(vec![1.0f64, 0.0]);
        assert_eq!(
            bsr.multiply(Operand::Dense(&x)).unwrap(),
            Product::Dense(DenseArray::from_vec(vec![1.0f64, 3.0]))
        );

        let other: SparseArray<f64> = bsr.clone().into();
        let err = bsr.multiply(Operand::Sparse(&other)).unwrap_err();
        assert!(matches!(err, SparseError::Unsupported(ref msg) if msg.contains("matmat")));
    }

    #[test]
    fn test_scalar_mul_detaches_shared_buffer() {
        let bsr = two_by_two();
        let view = bsr.to_coo(false);
        assert!(Arc::ptr_eq(view.shared_data(), bsr.shared_data()));

        let scaled = bsr.clone() * 10.0;
        assert_eq!(scaled.data(), &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(view.data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!((&bsr * 0.5).data(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let bsr = BsrMatrix::new((1, 2), (1, 1), vec![0, 2], vec![0, 1], vec![i32::MAX, 1]).unwrap();

        let y = bsr.matvec(&DenseArray::from_vec(vec![2i32, 0])).unwrap();
        assert_eq!(y.as_slice::<i32>(), Some(&[-2][..]));
        let y = bsr.matvec(&DenseArray::from_vec(vec![1i32, 1])).unwrap();
        assert_eq!(y.as_slice::<i32>(), Some(&[i32::MIN][..]));
        // i64 operands promote, so nothing wraps
        let y = bsr.matvec(&DenseArray::from_vec(vec![2i64, 0])).unwrap();
        assert_eq!(y.as_slice::<i64>(), Some(&[2 * i32::MAX as i64][..]));

        assert_eq!((&bsr * 2).data(), &[-2, 2]);
        assert_eq!((bsr * 2).data(), &[-2, 2]);
    }

    #[test]
    fn test_to_coo_layout() {
        let coo = four_by_four().to_coo(true);
        assert_eq!(coo.row(), &[0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(coo.col(), &[0, 1, 0, 1, 2, 3, 2, 3]);
        assert_eq!(coo.data(), four_by_four().data());
        assert!(!Arc::ptr_eq(coo.shared_data(), four_by_four().shared_data()));
    }

    #[test]
    fn test_transpose() {
        let bsr = BsrMatrix::new((2, 4), (2, 2), vec![0, 1], vec![1], vec![1, 2, 3, 4]).unwrap();
        let bsc = bsr.transpose();
        assert_eq!(bsc.shape(), (4, 2));
        assert_eq!(bsc.blocksize(), (2, 2));
        assert_eq!(bsc.data(), &[1, 3, 2, 4]);
        assert_eq!(bsc.to_dense(), vec![0, 0, 0, 0, 1, 3, 2, 4]);
        assert!(!Arc::ptr_eq(bsc.shared_data(), bsr.shared_data()));
        assert_eq!(bsc.transpose(), bsr);
    }

    #[test]
    fn test_into_transpose_reuses_thin_blocks() {
        let bsr = BsrMatrix::new((2, 3), (1, 3), vec![0, 1, 1], vec![0], vec![1.0f32, 2.0, 3.0]).unwrap();
        let shared = Arc::clone(bsr.shared_data());
        let bsc = bsr.into_transpose();
        assert!(Arc::ptr_eq(bsc.shared_data(), &shared));
        assert_eq!(bsc.blocksize(), (3, 1));
        assert_eq!(bsc.get_element(2, 0), Some(3.0));
    }

    #[test]
    fn test_to_bsc_permutes_blocks() {
        let bsr = BsrMatrix::new(
            (4, 4),
            (2, 2),
            vec![0, 2, 3],
            vec![1, 0, 0],
            (1..=12).collect::<Vec<i64>>(),
        )
        .unwrap();
        let bsc = bsr.to_bsc((2, 2)).unwrap();
        assert_eq!(bsc.indptr(), &[0, 2, 3]);
        assert_eq!(bsc.indices(), &[0, 1, 0]);
        assert_eq!(bsc.data(), &[5, 6, 7, 8, 9, 10, 11, 12, 1, 2, 3, 4]);
        assert_eq!(bsc.to_dense(), bsr.to_dense());
        assert_eq!(bsc.to_bsr((2, 2)).unwrap(), bsr.to_coo(true).to_bsr((2, 2)).unwrap());
    }

    #[test]
    fn test_random_matvec_matches_dense() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let blocksize = (rng.gen_range(1..=3), rng.gen_range(1..=3));
            let shape = (
                blocksize.0 * rng.gen_range(1..=4),
                blocksize.1 * rng.gen_range(1..=4),
            );
            let dense = random_dense(&mut rng, shape, 0.3);
            let bsr = BsrMatrix::from_dense(&dense, shape, blocksize).unwrap();
            assert_eq!(bsr.to_dense(), dense);

            let x: Vec<i64> = (0..shape.1).map(|_| rng.gen_range(-5..=5)).collect();
            let y = bsr.matvec(&DenseArray::from_vec(x.clone())).unwrap();
            assert_eq!(y.as_slice::<i64>(), Some(&dense_matvec(&dense, shape, &x)[..]));
        }
    }

    #[test]
    fn test_random_transpose_involution() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let blocksize = (rng.gen_range(1..=3), rng.gen_range(1..=3));
            let shape = (
                blocksize.0 * rng.gen_range(1..=4),
                blocksize.1 * rng.gen_range(1..=4),
            );
            let dense = random_dense(&mut rng, shape, 0.4);
            let bsr = BsrMatrix::from_dense(&dense, shape, blocksize).unwrap();

            let twice = bsr.transpose().transpose();
            assert_eq!(entries(&twice), entries(&bsr));
            assert_eq!(twice, bsr.clone().into_transpose().into_transpose());

            let transposed: Vec<(usize, usize, i64)> = {
                let mut t: Vec<_> = entries(&bsr).into_iter().map(|(r, c, v)| (c, r, v)).collect();
                t.sort_unstable();
                t
            };
            assert_eq!(entries(&bsr.transpose()), transposed);
            assert_eq!(entries(&bsr.to_bsc(blocksize).unwrap()), entries(&bsr));
        }
    }
}
