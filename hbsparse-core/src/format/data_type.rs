//! Numeric element kinds and their promotion rules

use super::type_code::ValueKind;

/// Element kinds stored in sparse and dense buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DataType {
    /// 32-bit floating point
    F32 = 0,
    /// 64-bit floating point
    F64 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 64-bit signed integer
    I64 = 3,
}

impl DataType {
    /// Whether this is a floating point kind
    pub const fn is_float(self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Smallest kind that can hold values of both `self` and `other`
    ///
    /// Integer/float mixes always land on `F64`, the only float kind that
    /// holds every `i32` exactly.
    pub const fn promote(self, other: DataType) -> DataType {
        match (self, other) {
            (DataType::F32, DataType::F32) => DataType::F32,
            (DataType::I32, DataType::I32) => DataType::I32,
            (DataType::I32, DataType::I64)
            | (DataType::I64, DataType::I32)
            | (DataType::I64, DataType::I64) => DataType::I64,
            _ => DataType::F64,
        }
    }

    /// Harwell-Boeing value kind used to store this data type
    pub const fn value_kind(self) -> ValueKind {
        if self.is_float() {
            ValueKind::Real
        } else {
            ValueKind::Integer
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
        }
    }
}
