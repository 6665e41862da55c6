//! Error type for operations that touch readers, writers or files

use hbsparse_core::{ErrorCategory, SparseError};

/// Errors returned by the hbsparse crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Format, value, dimension or kind error from the pure layer
    #[error(transparent)]
    Sparse(#[from] SparseError),

    /// Reading or writing the underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Sparse(e) => e.category(),
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// The underlying structural error, if any
    pub fn as_sparse(&self) -> Option<&SparseError> {
        match self {
            Error::Sparse(e) => Some(e),
            Error::Io(_) => None,
        }
    }
}

/// Result type for hbsparse operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category() {
        let err: Error = SparseError::NotContiguous.into();
        assert_eq!(err.category(), ErrorCategory::KindMismatch);
        assert_eq!(err.to_string(), "Output array must be contiguous");

        let err: Error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.as_sparse().is_none());
    }
}
