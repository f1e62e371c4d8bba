//! Result type aliases for the directory client.

use crate::DirectoryError;

/// A specialized `Result` type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
