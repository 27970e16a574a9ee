//! Disk manager errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for disk manager operations.
pub type DiskResult<T> = Result<T, DiskError>;

/// Errors that can occur during disk manager operations.
#[derive(Debug, Error)]
pub enum DiskError {
    /// I/O error without file context.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying error.
        #[from]
        source: io::Error,
    },

    /// I/O error on a specific file.
    #[error("I/O error on {path}: {source}")]
    IoPath {
        /// The file the operation touched.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A page buffer whose length does not match the page size.
    #[error("buffer length {len} does not match page size {page_size}")]
    BadBufferLength {
        /// Length of the buffer the caller supplied.
        len: usize,
        /// The manager's page size.
        page_size: usize,
    },
}

impl DiskError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io_path(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
