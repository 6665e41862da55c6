//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as matrix elements.

use crate::format::{DataType, FieldValue};
use core::fmt::Debug;
use num_traits::{Num, NumCast, WrappingAdd, WrappingMul};

/// Trait for types that can be stored as matrix elements
///
/// All matrix element types must be:
/// - Plain old data, so zeroed buffers can be produced without a loop
/// - Numeric, with arithmetic and lossy casts to the other element kinds
///
/// Sums and products inside matrix operations go through `add_wrapping`
/// and `mul_wrapping`: integer kinds wrap on overflow, floats use plain
/// IEEE arithmetic.
pub trait MatrixElement:
    Copy + PartialEq + PartialOrd + Debug + Default + Num + NumCast + bytemuck::Pod + 'static
{
    /// Get the DataType representation for this element type
    fn data_type() -> DataType;

    /// Convert from f64 for generic construction
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for generic operations
    fn to_f64(self) -> f64;

    /// Value as it is written into a Harwell-Boeing field
    fn to_field_value(self) -> FieldValue;

    /// `self + rhs`, wrapping around for integer kinds
    fn add_wrapping(self, rhs: Self) -> Self;

    /// `self * rhs`, wrapping around for integer kinds
    fn mul_wrapping(self, rhs: Self) -> Self;
}

impl MatrixElement for f32 {
    fn data_type() -> DataType {
        DataType::F32
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_field_value(self) -> FieldValue {
        FieldValue::Real(self as f64)
    }

    fn add_wrapping(self, rhs: Self) -> Self {
        self + rhs
    }

    fn mul_wrapping(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl MatrixElement for f64 {
    fn data_type() -> DataType {
        DataType::F64
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn to_field_value(self) -> FieldValue {
        FieldValue::Real(self)
    }

    fn add_wrapping(self, rhs: Self) -> Self {
        self + rhs
    }

    fn mul_wrapping(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl MatrixElement for i32 {
    fn data_type() -> DataType {
        DataType::I32
    }

    fn from_f64(value: f64) -> Self {
        value as i32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_field_value(self) -> FieldValue {
        FieldValue::Integer(self as i64)
    }

    fn add_wrapping(self, rhs: Self) -> Self {
        WrappingAdd::wrapping_add(&self, &rhs)
    }

    fn mul_wrapping(self, rhs: Self) -> Self {
        WrappingMul::wrapping_mul(&self, &rhs)
    }
}

impl MatrixElement for i64 {
    fn data_type() -> DataType {
        DataType::I64
    }

    fn from_f64(value: f64) -> Self {
        value as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_field_value(self) -> FieldValue {
        FieldValue::Integer(self)
    }

    fn add_wrapping(self, rhs: Self) -> Self {
        WrappingAdd::wrapping_add(&self, &rhs)
    }

    fn mul_wrapping(self, rhs: Self) -> Self {
        WrappingMul::wrapping_mul(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_types() {
        assert_eq!(f32::data_type(), DataType::F32);
        assert_eq!(i64::data_type(), DataType::I64);
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.mul_wrapping(2), -2);
        assert_eq!(i32::MAX.add_wrapping(1), i32::MIN);
        assert_eq!(i64::MIN.add_wrapping(-1), i64::MAX);
        assert_eq!(1.5f64.mul_wrapping(2.0), 3.0);
        assert_eq!(f32::MAX.add_wrapping(f32::MAX), f32::INFINITY);
    }

    #[test]
    fn test_field_values() {
        assert_eq!(2.5f32.to_field_value(), FieldValue::Real(2.5));
        assert_eq!((-3i32).to_field_value(), FieldValue::Integer(-3));
        assert_eq!(<i64 as MatrixElement>::from_f64(7.9), 7);
    }
}
