//! File system abstraction port.

use std::future::Future;
use std::path::{Path, PathBuf};

/// Error type for file system operations.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// File not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over the file operations the fixture store needs.
///
/// This trait allows substituting an in-memory file system in tests.
pub trait FileSystem: Send + Sync {
    /// Reads a file's contents as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_file(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Vec<u8>, FileSystemError>> + Send;

    /// Writes bytes to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_file(
        &self,
        path: &Path,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), FileSystemError>> + Send;

    /// Returns true if the path exists.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;
}
