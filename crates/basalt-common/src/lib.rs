//! # basalt-common
//!
//! Common types and constants for the Basalt storage engine.
//!
//! This crate provides the foundational pieces shared by every Basalt
//! component:
//!
//! - **Types**: core identifiers (`PageId`)
//! - **Constants**: page and pool sizing defaults
//!
//! ## Example
//!
//! ```rust
//! use basalt_common::types::PageId;
//!
//! let page_id = PageId::new(42);
//! assert!(page_id.is_valid());
//! assert!(!PageId::INVALID.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use types::PageId;
