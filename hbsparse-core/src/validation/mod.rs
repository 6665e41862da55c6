//! Structural validation utilities
//!
//! This module contains pure validation functions with no I/O dependencies.
//! All functions are arithmetic on array layouts and fixed-column text.

pub mod bounds;
pub mod format;
pub mod parsing;

pub use bounds::{validate_blocksize, validate_compressed};
pub use format::{record_count, RecordLayout};
pub use parsing::{is_blank, parse_field, parse_usize};
