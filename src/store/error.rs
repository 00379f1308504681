//! Entries store error types

use thiserror::Error;

/// Errors that can occur in the entries store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O failure creating the database directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied fields failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// No entry with this id exists for the requesting user
    #[error("Entry {0} not found")]
    NotFound(i64),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound(42);
        assert_eq!(err.to_string(), "Entry 42 not found");

        let err = StoreError::Validation("Title cannot be empty".to_string());
        assert_eq!(err.to_string(), "Validation error: Title cannot be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }
}
