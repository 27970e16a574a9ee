//! Type definitions for Basalt.

mod ids;

pub use ids::PageId;
