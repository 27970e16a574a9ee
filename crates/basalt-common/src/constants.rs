//! System-wide constants for Basalt.

// =============================================================================
// Page Constants
// =============================================================================

/// Default page size in bytes (4 KB).
///
/// Matches the typical OS page size, so one buffer frame maps cleanly
/// onto one unit of physical I/O.
pub const DEFAULT_PAGE_SIZE: usize = 4 * 1024;

/// Minimum page size in bytes.
pub const MIN_PAGE_SIZE: usize = 512;

// =============================================================================
// Buffer Pool Constants
// =============================================================================

/// Default number of frames in the buffer pool.
pub const DEFAULT_POOL_FRAMES: usize = 1024;
