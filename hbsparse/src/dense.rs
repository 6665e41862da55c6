//! Runtime-kinded dense vectors
//!
//! `DenseArray` is the small dense collaborator the sparse containers need:
//! a one-dimensional `(n,)` or column `(n, 1)` array whose element kind is
//! only known at runtime, with an element stride so strided views can be
//! rejected where a contiguous buffer is required.

use hbsparse_core::{DataType, MatrixElement, SparseError};
use num_traits::NumCast;

/// Typed storage behind a [`DenseArray`]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

impl ArrayData {
    /// Element kind
    pub fn data_type(&self) -> DataType {
        match self {
            ArrayData::F32(_) => DataType::F32,
            ArrayData::F64(_) => DataType::F64,
            ArrayData::I32(_) => DataType::I32,
            ArrayData::I64(_) => DataType::I64,
        }
    }

    /// Length of the underlying buffer
    pub fn buffer_len(&self) -> usize {
        match self {
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::I64(v) => v.len(),
        }
    }

    fn zeros(kind: DataType, len: usize) -> Self {
        match kind {
            DataType::F32 => ArrayData::F32(vec![0.0; len]),
            DataType::F64 => ArrayData::F64(vec![0.0; len]),
            DataType::I32 => ArrayData::I32(vec![0; len]),
            DataType::I64 => ArrayData::I64(vec![0; len]),
        }
    }
}

/// Element types that can back a [`DenseArray`]
pub trait DenseElement: MatrixElement {
    /// Wrap a typed buffer
    fn wrap(data: Vec<Self>) -> ArrayData;

    /// Borrow the buffer if it holds this type
    fn view(data: &ArrayData) -> Option<&[Self]>;

    /// Mutably borrow the buffer if it holds this type
    fn view_mut(data: &mut ArrayData) -> Option<&mut [Self]>;
}

macro_rules! impl_dense_element {
    ($ty:ty, $variant:ident) => {
        impl DenseElement for $ty {
            fn wrap(data: Vec<Self>) -> ArrayData {
                ArrayData::$variant(data)
            }

            fn view(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn view_mut(data: &mut ArrayData) -> Option<&mut [Self]> {
                match data {
                    ArrayData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_dense_element!(f32, F32);
impl_dense_element!(f64, F64);
impl_dense_element!(i32, I32);
impl_dense_element!(i64, I64);

/// Dense vector of shape `(n,)` or `(n, 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray {
    data: ArrayData,
    len: usize,
    column: bool,
    stride: usize,
}

impl DenseArray {
    /// One-dimensional array over `data`
    pub fn from_vec<T: DenseElement>(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            data: T::wrap(data),
            len,
            column: false,
            stride: 1,
        }
    }

    /// Column array of shape `(n, 1)` over `data`
    pub fn column<T: DenseElement>(data: Vec<T>) -> Self {
        Self {
            column: true,
            ..Self::from_vec(data)
        }
    }

    /// One-dimensional view of every `stride`-th element of `data`
    pub fn strided<T: DenseElement>(data: Vec<T>, stride: usize) -> Result<Self, SparseError> {
        if stride == 0 {
            return Err(SparseError::InvalidStructure(
                "array stride must be positive".to_string(),
            ));
        }
        let len = data.len().div_ceil(stride);
        Ok(Self {
            data: T::wrap(data),
            len,
            column: false,
            stride,
        })
    }

    /// Zero-filled contiguous array of shape `(len,)`
    pub fn zeros(kind: DataType, len: usize) -> Self {
        Self {
            data: ArrayData::zeros(kind, len),
            len,
            column: false,
            stride: 1,
        }
    }

    /// Zero-filled contiguous array of shape `(len, 1)`
    pub fn zeros_column(kind: DataType, len: usize) -> Self {
        Self {
            column: true,
            ..Self::zeros(kind, len)
        }
    }

    /// Element kind
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Number of logical elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `[n]` or `[n, 1]`
    pub fn shape(&self) -> Vec<usize> {
        if self.column {
            vec![self.len, 1]
        } else {
            vec![self.len]
        }
    }

    /// Whether this is a `(n, 1)` column
    pub fn is_column(&self) -> bool {
        self.column
    }

    /// Whether logical elements are adjacent in the buffer
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1 || self.len <= 1
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Underlying typed buffer
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ArrayData {
        &mut self.data
    }

    /// Contiguous typed slice, if this array is contiguous and holds `T`
    pub fn as_slice<T: DenseElement>(&self) -> Option<&[T]> {
        if !self.is_contiguous() {
            return None;
        }
        T::view(&self.data).map(|v| &v[..self.len])
    }

    /// Logical elements cast to `U`
    ///
    /// Values that `U` cannot represent become zero; widening casts along
    /// the promotion order are always exact for integers.
    pub fn gather<U: DenseElement>(&self) -> Vec<U> {
        fn collect<T: MatrixElement, U: MatrixElement>(v: &[T], len: usize, stride: usize) -> Vec<U> {
            v.iter()
                .step_by(stride)
                .take(len)
                .map(|&x| <U as NumCast>::from(x).unwrap_or_else(U::zero))
                .collect()
        }
        match &self.data {
            ArrayData::F32(v) => collect(v, self.len, self.stride),
            ArrayData::F64(v) => collect(v, self.len, self.stride),
            ArrayData::I32(v) => collect(v, self.len, self.stride),
            ArrayData::I64(v) => collect(v, self.len, self.stride),
        }
    }

    /// Logical elements as `f64`
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.gather::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        let a = DenseArray::from_vec(vec![1.0f64, 2.0, 3.0]);
        assert_eq!(a.shape(), vec![3]);
        assert_eq!(a.data_type(), DataType::F64);
        assert!(a.is_contiguous());

        let c = DenseArray::column(vec![1i32, 2]);
        assert_eq!(c.shape(), vec![2, 1]);
        assert!(c.is_column());

        let z = DenseArray::zeros_column(DataType::I64, 4);
        assert_eq!(z.shape(), vec![4, 1]);
        assert_eq!(z.as_slice::<i64>(), Some(&[0i64, 0, 0, 0][..]));
    }

    #[test]
    fn test_strided() {
        let s = DenseArray::strided(vec![1.0f32, 9.0, 2.0, 9.0, 3.0], 2).unwrap();
        assert_eq!(s.len(), 3);
        assert!(!s.is_contiguous());
        assert_eq!(s.as_slice::<f32>(), None);
        assert_eq!(s.gather::<f64>(), vec![1.0, 2.0, 3.0]);
        assert!(DenseArray::strided(vec![1i64], 0).is_err());
    }

    #[test]
    fn test_gather_casts() {
        let a = DenseArray::from_vec(vec![1i32, -2, 3]);
        assert_eq!(a.gather::<i64>(), vec![1, -2, 3]);
        assert_eq!(a.to_f64_vec(), vec![1.0, -2.0, 3.0]);
        assert_eq!(a.as_slice::<f64>(), None);
    }
}
