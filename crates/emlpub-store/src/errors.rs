//! Error handling for emlpub-store
//!
//! Wraps emlpub-core ExError with store-specific helpers

use emlpub_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// A blob that was expected to exist does not
pub fn blob_missing(container: &str, blob: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("download_blob")
        .with_package_id(container)
        .with_blob(blob)
        .with_message("blob not found")
}

/// Upload without overwrite onto an existing blob
pub fn blob_exists(container: &str, blob: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("upload_blob")
        .with_package_id(container)
        .with_blob(blob)
        .with_message("blob already exists and overwrite was not requested")
}

/// Container creation when it is already present
pub fn container_exists(container: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("create_container")
        .with_package_id(container)
        .with_message("container already exists")
}

/// Blob or container names that would escape the storage root
pub fn invalid_name(what: &str, name: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("validate_name")
        .with_message(format!("invalid {} name '{}': {}", what, name, reason))
}

/// A SQL file that holds no statement
pub fn empty_query(source: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("read_sql")
        .with_message(format!("no SQL statement in {}", source))
}
