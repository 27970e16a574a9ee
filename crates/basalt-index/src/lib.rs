//! In-memory associative indexes for Basalt.
//!
//! This crate provides the extendible hash table used across the storage
//! engine, both as the buffer pool's page table and as a standalone
//! associative index:
//!
//! - **Extendible Hash Table**: directory-based addressing with localized
//!   bucket splits, so growth never rehashes the whole table
//! - **Statistics**: lock-free operation counters for monitoring
//!
//! # Example
//!
//! ```rust
//! use basalt_index::ExtendibleHashTable;
//!
//! let table = ExtendibleHashTable::new(4);
//! table.insert("key1", "value1");
//! assert_eq!(table.find(&"key1"), Some("value1"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extendible;
pub mod stats;

pub use extendible::ExtendibleHashTable;
pub use stats::TableStats;

/// Default number of entries a bucket holds before it splits.
pub const DEFAULT_BUCKET_CAPACITY: usize = 64;
