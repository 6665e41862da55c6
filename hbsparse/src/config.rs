//! Write configuration for Harwell-Boeing output

use hbsparse_core::format::constants::{DEFAULT_EXPONENT_DIGITS, DEFAULT_SIGNIFICAND_DIGITS};

/// Options used to derive the header of a written file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HbWriteOptions {
    /// Title on header line 1, at most 72 characters
    pub title: String,
    /// Key on header line 1, 8 characters fit
    pub key: String,
    /// Digits after the decimal point of real values
    pub significand_digits: usize,
    /// Exponent digits of real values
    pub exponent_digits: usize,
}

impl HbWriteOptions {
    /// Options with the given title and defaults elsewhere
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the number of digits after the decimal point for real values
    pub fn with_significand_digits(mut self, digits: usize) -> Self {
        self.significand_digits = digits;
        self
    }

    /// Set the number of exponent digits for real values
    pub fn with_exponent_digits(mut self, digits: usize) -> Self {
        self.exponent_digits = digits;
        self
    }
}

impl Default for HbWriteOptions {
    fn default() -> Self {
        Self {
            title: "Default title".to_string(),
            key: "0".to_string(),
            significand_digits: DEFAULT_SIGNIFICAND_DIGITS,
            exponent_digits: DEFAULT_EXPONENT_DIGITS,
        }
    }
}
