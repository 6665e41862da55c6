//! Harwell-Boeing matrix type codes
//!
//! A type code is three letters: value kind, structure and storage. The
//! letter tables below are the only source of truth for both directions.

use crate::{Result, SparseError};
use alloc::string::ToString;

/// Kind of the stored values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Real,
    Complex,
    Pattern,
    Integer,
}

/// Symmetry structure of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Structure {
    Symmetric,
    Unsymmetric,
    Hermitian,
    SkewSymmetric,
    Rectangular,
}

/// Assembled or elemental storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Storage {
    Assembled,
    Elemental,
}

static VALUE_KINDS: [(ValueKind, u8, &str); 4] = [
    (ValueKind::Real, b'R', "real"),
    (ValueKind::Complex, b'C', "complex"),
    (ValueKind::Pattern, b'P', "pattern"),
    (ValueKind::Integer, b'I', "integer"),
];

static STRUCTURES: [(Structure, u8, &str); 5] = [
    (Structure::Symmetric, b'S', "symmetric"),
    (Structure::Unsymmetric, b'U', "unsymmetric"),
    (Structure::Hermitian, b'H', "hermitian"),
    (Structure::SkewSymmetric, b'Z', "skewsymmetric"),
    (Structure::Rectangular, b'R', "rectangular"),
];

static STORAGES: [(Storage, u8, &str); 2] = [
    (Storage::Assembled, b'A', "assembled"),
    (Storage::Elemental, b'E', "elemental"),
];

fn by_letter<K: Copy>(table: &[(K, u8, &str)], letter: u8) -> Option<K> {
    table.iter().find(|(_, l, _)| *l == letter).map(|(k, _, _)| *k)
}

fn by_name<K: Copy>(table: &[(K, u8, &str)], name: &str) -> Option<K> {
    table.iter().find(|(_, _, n)| *n == name).map(|(k, _, _)| *k)
}

fn entry<K: Copy + PartialEq>(table: &'static [(K, u8, &'static str)], key: K) -> (u8, &'static str) {
    table
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, l, n)| (*l, *n))
        // Every enum variant has a row in its table.
        .unwrap_or((b'?', "?"))
}

impl ValueKind {
    /// Single-letter code
    pub fn letter(self) -> char {
        entry(&VALUE_KINDS, self).0 as char
    }

    /// Qualified name ("real", "integer", ...)
    pub fn name(self) -> &'static str {
        entry(&VALUE_KINDS, self).1
    }
}

impl Structure {
    /// Single-letter code
    pub fn letter(self) -> char {
        entry(&STRUCTURES, self).0 as char
    }

    /// Qualified name ("unsymmetric", ...)
    pub fn name(self) -> &'static str {
        entry(&STRUCTURES, self).1
    }
}

impl Storage {
    /// Single-letter code
    pub fn letter(self) -> char {
        entry(&STORAGES, self).0 as char
    }

    /// Qualified name ("assembled" or "elemental")
    pub fn name(self) -> &'static str {
        entry(&STORAGES, self).1
    }
}

/// Three-letter matrix type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixTypeCode {
    pub value_kind: ValueKind,
    pub structure: Structure,
    pub storage: Storage,
}

impl MatrixTypeCode {
    /// Build a type code from its attributes
    pub const fn new(value_kind: ValueKind, structure: Structure, storage: Storage) -> Self {
        Self {
            value_kind,
            structure,
            storage,
        }
    }

    /// Build a type code from qualified attribute names
    pub fn from_names(value_kind: &str, structure: &str, storage: &str) -> Result<Self> {
        let value_kind =
            by_name(&VALUE_KINDS, value_kind).ok_or_else(|| SparseError::InvalidAttribute {
                attribute: "value_kind",
                value: value_kind.to_string(),
            })?;
        let structure =
            by_name(&STRUCTURES, structure).ok_or_else(|| SparseError::InvalidAttribute {
                attribute: "structure",
                value: structure.to_string(),
            })?;
        let storage = by_name(&STORAGES, storage).ok_or_else(|| SparseError::InvalidAttribute {
            attribute: "storage",
            value: storage.to_string(),
        })?;
        Ok(Self::new(value_kind, structure, storage))
    }

    /// Parse a three-letter code such as `RUA`
    pub fn from_code(code: &str) -> Result<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 {
            return Err(SparseError::InvalidTypeCode(code.to_string()));
        }
        let upper = [
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ];
        match (
            by_letter(&VALUE_KINDS, upper[0]),
            by_letter(&STRUCTURES, upper[1]),
            by_letter(&STORAGES, upper[2]),
        ) {
            (Some(value_kind), Some(structure), Some(storage)) => {
                Ok(Self::new(value_kind, structure, storage))
            }
            _ => Err(SparseError::InvalidTypeCode(code.to_string())),
        }
    }

    /// The three-letter code
    pub fn code(&self) -> [char; 3] {
        [
            self.value_kind.letter(),
            self.structure.letter(),
            self.storage.letter(),
        ]
    }

    /// Whether the data codec can read and write matrices of this type
    pub fn is_supported_by_codec(&self) -> bool {
        matches!(self.value_kind, ValueKind::Real | ValueKind::Integer)
            && self.structure == Structure::Unsymmetric
            && self.storage == Storage::Assembled
    }
}

impl core::fmt::Display for MatrixTypeCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c] = self.code();
        write!(f, "{a}{b}{c}")
    }
}
