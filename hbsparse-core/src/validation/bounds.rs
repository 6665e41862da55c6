//! Structural checks for compressed and block layouts

use crate::SparseError;
use alloc::format;

/// Validate compressed (CSR/CSC style) structure arrays
///
/// `indptr` must hold `n_major + 1` non-decreasing offsets starting at 0
/// and ending at `indices.len()`; every index must be below `n_minor`.
pub fn validate_compressed(
    indptr: &[usize],
    indices: &[usize],
    n_major: usize,
    n_minor: usize,
) -> Result<(), SparseError> {
    if indptr.len() != n_major + 1 {
        return Err(SparseError::InvalidStructure(format!(
            "indptr has {} entries, expected {}",
            indptr.len(),
            n_major + 1
        )));
    }
    if indptr[0] != 0 {
        return Err(SparseError::InvalidStructure(format!(
            "indptr must start at 0, starts at {}",
            indptr[0]
        )));
    }
    if let Some(i) = indptr.windows(2).position(|w| w[0] > w[1]) {
        return Err(SparseError::InvalidStructure(format!(
            "indptr decreases at position {}",
            i + 1
        )));
    }
    if indptr[n_major] != indices.len() {
        return Err(SparseError::InvalidStructure(format!(
            "indptr ends at {} but there are {} indices",
            indptr[n_major],
            indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&j| j >= n_minor) {
        return Err(SparseError::InvalidStructure(format!(
            "index {bad} out of bounds for dimension {n_minor}"
        )));
    }
    Ok(())
}

/// Validate a block shape against a matrix shape, returning the block grid
/// dimensions
pub fn validate_blocksize(
    shape: (usize, usize),
    blocksize: (usize, usize),
) -> Result<(usize, usize), SparseError> {
    let (m, n) = shape;
    let (x, y) = blocksize;
    if x == 0 || y == 0 {
        return Err(SparseError::InvalidStructure(format!(
            "block shape {blocksize:?} must be positive"
        )));
    }
    if m % x != 0 || n % y != 0 {
        return Err(SparseError::ShapeNotDivisible { shape, blocksize });
    }
    Ok((m / x, n / y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn test_validate_compressed() {
        assert_eq!(validate_compressed(&[0, 2, 3], &[0, 1, 1], 2, 2), Ok(()));
        assert_eq!(validate_compressed(&[0], &[], 0, 5), Ok(()));

        let cases: [(&[usize], &[usize]); 5] = [
            (&[0, 2], &[0, 1]),
            (&[1, 2, 3], &[0, 1, 1]),
            (&[0, 2, 1], &[0, 1]),
            (&[0, 1, 2], &[0, 1, 1]),
            (&[0, 1, 2], &[0, 2]),
        ];
        for (indptr, indices) in cases {
            let err = validate_compressed(indptr, indices, 2, 2).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Value);
        }
    }

    #[test]
    fn test_validate_blocksize() {
        assert_eq!(validate_blocksize((4, 6), (2, 3)), Ok((2, 2)));
        assert_eq!(validate_blocksize((0, 0), (2, 2)), Ok((0, 0)));
        assert_eq!(
            validate_blocksize((4, 5), (2, 2)),
            Err(SparseError::ShapeNotDivisible {
                shape: (4, 5),
                blocksize: (2, 2)
            })
        );
        assert!(matches!(
            validate_blocksize((4, 4), (0, 2)),
            Err(SparseError::InvalidStructure(_))
        ));
    }
}
