#![no_std]

//! hbsparse-core - Harwell-Boeing and block sparse format definitions
//!
//! This crate provides the pure, allocation-only half of the workspace:
//! the error taxonomy, Fortran field formats, matrix type codes, the
//! Harwell-Boeing header model and the element traits shared by the
//! concrete containers. Nothing here performs I/O.

extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
