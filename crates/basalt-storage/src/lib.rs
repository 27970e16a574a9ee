//! # basalt-storage
//!
//! Disk manager and buffer pool for the Basalt storage engine.
//!
//! The buffer pool mediates between a page-addressable data file and the
//! access methods above it: callers fetch pages by id and receive pinned
//! in-memory frames, while the pool tracks dirty frames, writes them back
//! before reuse, and picks eviction victims with an LRU replacer.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use basalt_storage::buffer::{BufferPoolConfig, BufferPoolManager};
//! use basalt_storage::disk::MemoryDiskManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let disk = Arc::new(MemoryDiskManager::new(4096));
//! let pool = BufferPoolManager::new(BufferPoolConfig::new(16), disk)?;
//!
//! let frame = pool.new_page()?;
//! let page_id = frame.page_id();
//! frame.write_data()[0..4].copy_from_slice(b"data");
//! pool.unpin_page(page_id, true)?;
//!
//! let frame = pool.fetch_page(page_id)?;
//! assert_eq!(&frame.read_data()[0..4], b"data");
//! pool.unpin_page(page_id, false)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod disk;
pub mod wal;
