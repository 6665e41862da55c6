//! Coordinate (COO) sparse matrices

use super::{permute_blocks, BsrMatrix, CscMatrix, CsrMatrix, SparseConvert};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use hbsparse_core::validation::validate_blocksize;
use hbsparse_core::{MatrixElement, SparseError, SparseFormat, SparseMatrix};
use std::sync::Arc;

/// Unordered (row, col, value) triplets
///
/// The value buffer sits behind an `Arc` so block formats can hand out a
/// coordinate view without copying. Mutating methods detach a shared
/// buffer before writing.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T> {
    shape: (usize, usize),
    row: Vec<usize>,
    col: Vec<usize>,
    data: Arc<Vec<T>>,
}

impl<T: MatrixElement> CooMatrix<T> {
    /// Create a COO matrix, checking lengths and bounds
    pub fn new(
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, SparseError> {
        if row.len() != data.len() || col.len() != data.len() {
            return Err(SparseError::InvalidStructure(format!(
                "{} rows, {} cols and {} values",
                row.len(),
                col.len(),
                data.len()
            )));
        }
        if let Some((&r, &c)) = row
            .iter()
            .zip(&col)
            .find(|&(&r, &c)| r >= shape.0 || c >= shape.1)
        {
            return Err(SparseError::InvalidStructure(format!(
                "entry ({r}, {c}) out of bounds for shape {shape:?}"
            )));
        }
        Ok(Self::from_shared(shape, row, col, Arc::new(data)))
    }

    pub(crate) fn from_shared(
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Arc<Vec<T>>,
    ) -> Self {
        Self {
            shape,
            row,
            col,
            data,
        }
    }

    /// Empty matrix of the given shape
    pub fn empty(shape: (usize, usize)) -> Self {
        Self::from_shared(shape, Vec::new(), Vec::new(), Arc::new(Vec::new()))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub fn col(&self) -> &[usize] {
        &self.col
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Shared handle to the value buffer
    pub fn shared_data(&self) -> &Arc<Vec<T>> {
        &self.data
    }

    /// Iterate over stored (row, col, value) entries in storage order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.row
            .iter()
            .zip(&self.col)
            .zip(self.data.iter())
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Merge entries with equal coordinates by summing them
    ///
    /// Entries come out sorted row-major.
    pub fn sum_duplicates(&mut self) {
        let mut slots: HashMap<(usize, usize), usize> = HashMap::with_capacity(self.data.len());
        let mut keys = Vec::with_capacity(self.data.len());
        let mut sums: Vec<T> = Vec::with_capacity(self.data.len());

        for (r, c, v) in self.triplets() {
            match slots.entry((r, c)) {
                Entry::Occupied(slot) => {
                    let k = *slot.get();
                    sums[k] = sums[k].add_wrapping(v);
                }
                Entry::Vacant(slot) => {
                    slot.insert(keys.len());
                    keys.push((r, c));
                    sums.push(v);
                }
            }
        }

        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_unstable_by_key(|&k| keys[k]);

        self.row = order.iter().map(|&k| keys[k].0).collect();
        self.col = order.iter().map(|&k| keys[k].1).collect();
        self.data = Arc::new(order.iter().map(|&k| sums[k]).collect());
    }

    /// Drop explicitly stored zeros
    pub fn eliminate_zeros(&mut self) {
        let keep: Vec<usize> = (0..self.data.len())
            .filter(|&k| self.data[k] != T::zero())
            .collect();
        if keep.len() == self.data.len() {
            return;
        }
        self.row = keep.iter().map(|&k| self.row[k]).collect();
        self.col = keep.iter().map(|&k| self.col[k]).collect();
        self.data = Arc::new(keep.iter().map(|&k| self.data[k]).collect());
    }

    /// Row-major dense copy, duplicates summed
    pub fn to_dense(&self) -> Vec<T> {
        let (m, n) = self.shape;
        let mut dense = vec![T::zero(); m * n];
        for (r, c, v) in self.triplets() {
            dense[r * n + c] = dense[r * n + c].add_wrapping(v);
        }
        dense
    }
}

impl<T: MatrixElement> SparseMatrix for CooMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        self.triplets()
            .filter(|&(r, c, _)| r == row && c == col)
            .map(|(_, _, v)| v)
            .reduce(T::add_wrapping)
    }

    fn dimensions(&self) -> (usize, usize) {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl<T: MatrixElement> SparseConvert<T> for CooMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Coo
    }

    fn to_coo(&self, copy: bool) -> CooMatrix<T> {
        if copy {
            Self::from_shared(
                self.shape,
                self.row.clone(),
                self.col.clone(),
                Arc::new(self.data.to_vec()),
            )
        } else {
            self.clone()
        }
    }

    fn to_csr(&self) -> CsrMatrix<T> {
        let mut merged = self.clone();
        merged.sum_duplicates();

        let mut indptr = vec![0usize; self.shape.0 + 1];
        for &r in &merged.row {
            indptr[r + 1] += 1;
        }
        for i in 0..self.shape.0 {
            indptr[i + 1] += indptr[i];
        }
        let data = Arc::unwrap_or_clone(merged.data);
        CsrMatrix::from_parts(self.shape, indptr, merged.col, data)
    }

    fn to_csc(&self) -> CscMatrix<T> {
        SparseConvert::to_csr(self).to_csc()
    }

    fn to_bsr(&self, blocksize: (usize, usize)) -> Result<BsrMatrix<T>, SparseError> {
        let (mb, _) = validate_blocksize(self.shape, blocksize)?;
        let (x, y) = blocksize;
        let block_len = x * y;
        log::debug!(
            "blocking {}x{} coordinate matrix with {} entries into {x}x{y} blocks",
            self.shape.0,
            self.shape.1,
            self.data.len()
        );

        let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
        let mut keys: Vec<(usize, usize)> = Vec::new();
        let mut blocks: Vec<T> = Vec::new();
        for (r, c, v) in self.triplets() {
            let key = (r / x, c / y);
            let slot = *slots.entry(key).or_insert_with(|| {
                keys.push(key);
                blocks.resize(blocks.len() + block_len, T::zero());
                keys.len() - 1
            });
            let offset = slot * block_len + (r % x) * y + (c % y);
            blocks[offset] = blocks[offset].add_wrapping(v);
        }

        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_unstable_by_key(|&k| keys[k]);

        let mut indptr = vec![0usize; mb + 1];
        for &(i, _) in &keys {
            indptr[i + 1] += 1;
        }
        for i in 0..mb {
            indptr[i + 1] += indptr[i];
        }
        let indices = order.iter().map(|&k| keys[k].1).collect();
        let data = permute_blocks(&blocks, &order, block_len);
        Ok(BsrMatrix::from_parts(
            self.shape,
            blocksize,
            indptr,
            indices,
            Arc::new(data),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CooMatrix<f64> {
        CooMatrix::new(
            (3, 4),
            vec![2, 0, 1, 0, 2],
            vec![3, 1, 0, 1, 0],
            vec![5.0, 1.0, 2.0, 3.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_new_validation() {
        assert!(CooMatrix::new((2, 2), vec![0], vec![0, 1], vec![1.0f64]).is_err());
        let err = CooMatrix::new((2, 2), vec![2], vec![0], vec![1.0f64]).unwrap_err();
        assert!(matches!(err, SparseError::InvalidStructure(_)));
        assert_eq!(CooMatrix::<i32>::empty((3, 3)).nnz(), 0);
    }

    #[test]
    fn test_sum_duplicates() {
        let mut coo = sample();
        coo.sum_duplicates();
        assert_eq!(coo.row(), &[0, 1, 2, 2]);
        assert_eq!(coo.col(), &[1, 0, 0, 3]);
        assert_eq!(coo.data(), &[4.0, 2.0, 0.0, 5.0]);

        coo.eliminate_zeros();
        assert_eq!(coo.nnz(), 3);
        assert_eq!(coo.get_element(2, 0), None);
    }

    #[test]
    fn test_sum_duplicates_wraps_integers() {
        let mut coo = CooMatrix::new((1, 1), vec![0, 0], vec![0, 0], vec![i32::MAX, 2]).unwrap();
        assert_eq!(coo.get_element(0, 0), Some(i32::MIN + 1));
        coo.sum_duplicates();
        assert_eq!(coo.data(), &[i32::MIN + 1]);
    }

    #[test]
    fn test_get_element_sums_duplicates() {
        let coo = sample();
        assert_eq!(coo.get_element(0, 1), Some(4.0));
        assert_eq!(coo.get_element(1, 1), None);
        assert_eq!(coo.dimensions(), (3, 4));
    }

    #[test]
    fn test_to_csr() {
        let csr = sample().to_csr();
        assert_eq!(csr.indptr(), &[0, 1, 2, 4]);
        assert_eq!(csr.indices(), &[1, 0, 0, 3]);
        assert_eq!(csr.data(), &[4.0, 2.0, 0.0, 5.0]);
    }

    #[test]
    fn test_to_bsr() {
        let bsr = sample().to_bsr((1, 2)).unwrap();
        assert_eq!(bsr.indptr(), &[0, 1, 2, 4]);
        assert_eq!(bsr.indices(), &[0, 0, 0, 1]);
        assert_eq!(bsr.data(), &[0.0, 4.0, 2.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        assert_eq!(bsr.to_dense(), sample().to_dense());
    }

    #[test]
    fn test_copy_flag() {
        let coo = sample();
        let view = coo.to_coo(false);
        assert!(Arc::ptr_eq(view.shared_data(), coo.shared_data()));
        let copy = coo.to_coo(true);
        assert!(!Arc::ptr_eq(copy.shared_data(), coo.shared_data()));
        assert_eq!(copy, coo);
    }
}
