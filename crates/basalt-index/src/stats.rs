//! Hash table statistics for monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for extendible hash table operations.
#[derive(Debug, Default)]
pub struct TableStats {
    /// Total number of lookups.
    accesses: AtomicU64,
    /// Number of lookups that found the key.
    hits: AtomicU64,
    /// Number of lookups that missed.
    misses: AtomicU64,
    /// Number of insertions.
    inserts: AtomicU64,
    /// Number of removals.
    removals: AtomicU64,
    /// Number of bucket splits.
    splits: AtomicU64,
    /// Number of directory doublings.
    doublings: AtomicU64,
}

impl TableStats {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup.
    #[inline]
    pub fn record_access(&self) {
        self.accesses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that found the key.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that missed.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an insertion.
    #[inline]
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a removal.
    #[inline]
    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a bucket split.
    #[inline]
    pub fn record_split(&self) {
        self.splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a directory doubling.
    #[inline]
    pub fn record_doubling(&self) {
        self.doublings.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns total lookups.
    pub fn accesses(&self) -> u64 {
        self.accesses.load(Ordering::Relaxed)
    }

    /// Returns lookup hits.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns lookup misses.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns insertions.
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Returns removals.
    pub fn removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    /// Returns bucket splits.
    pub fn splits(&self) -> u64 {
        self.splits.load(Ordering::Relaxed)
    }

    /// Returns directory doublings.
    pub fn doublings(&self) -> u64 {
        self.doublings.load(Ordering::Relaxed)
    }

    /// Returns the hit ratio (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.hits() as f64 / accesses as f64
        }
    }
}

impl Clone for TableStats {
    fn clone(&self) -> Self {
        Self {
            accesses: AtomicU64::new(self.accesses()),
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            inserts: AtomicU64::new(self.inserts()),
            removals: AtomicU64::new(self.removals()),
            splits: AtomicU64::new(self.splits()),
            doublings: AtomicU64::new(self.doublings()),
        }
    }
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TableStats {{ accesses: {}, hits: {}, misses: {}, hit_ratio: {:.2}%, inserts: {}, splits: {}, doublings: {} }}",
            self.accesses(),
            self.hits(),
            self.misses(),
            self.hit_ratio() * 100.0,
            self.inserts(),
            self.splits(),
            self.doublings()
        )
    }
}
