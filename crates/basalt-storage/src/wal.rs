//! Write-ahead-log hook for the buffer pool.
//!
//! The buffer pool does not know how the log is structured; it only needs
//! the write-ahead rule: before a dirty page is written back, every log
//! record describing its changes must already be on stable storage. The
//! pool therefore holds an optional [`LogManager`] handle and calls
//! [`LogManager::flush`] before each dirty write-back. Pools built
//! without a log manager (the default in tests) skip the call.

use crate::disk::DiskResult;

/// Log flushing as seen from the buffer pool.
pub trait LogManager: Send + Sync {
    /// Forces all buffered log records to stable storage.
    fn flush(&self) -> DiskResult<()>;
}
