//! Buffer pool errors.

use basalt_common::types::PageId;
use thiserror::Error;

use crate::disk::DiskError;

/// Result type for buffer pool operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer pool operations.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Every frame is pinned; no victim can be chosen.
    #[error("no free frames available, all pages are pinned")]
    NoFreeFrames,

    /// The page is not resident in the buffer pool.
    #[error("page {page_id} not found in buffer pool")]
    PageNotFound {
        /// The page that was looked up.
        page_id: PageId,
    },

    /// The invalid sentinel was passed where a real page id is required.
    #[error("invalid page ID")]
    InvalidPageId,

    /// Unpin of a page whose pin count is already zero.
    #[error("page {page_id} is not pinned")]
    NotPinned {
        /// The page the caller tried to unpin.
        page_id: PageId,
    },

    /// Delete of a page that still has outstanding pins.
    #[error("page {page_id} is pinned ({pin_count} outstanding references)")]
    PagePinned {
        /// The page the caller tried to delete.
        page_id: PageId,
        /// Number of outstanding pins.
        pin_count: u32,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// Disk manager failure. Fatal at this tier; passed through as-is.
    #[error(transparent)]
    Disk(#[from] DiskError),
}

impl BufferError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a page not found error.
    pub fn page_not_found(page_id: PageId) -> Self {
        Self::PageNotFound { page_id }
    }

    /// Returns true if this is a transient error that can be retried
    /// once pages are unpinned.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoFreeFrames)
    }
}
