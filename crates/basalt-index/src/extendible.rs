//! Extendible hash table implementation.
//!
//! An extendible hash table addresses buckets through a directory indexed
//! by the low `global_depth` bits of a key's hash. When a bucket
//! overflows it is split in two and only the directory slots that
//! referenced it are rewritten; when the overflowing bucket is already at
//! the directory's depth, the directory doubles first. Growth is
//! therefore localized: no insert ever rehashes the whole table.
//!
//! The directory is realized as a vector of integer bucket ids into a
//! bucket arena, so the aliasing between slots that directory doubling
//! creates is an exact id comparison.
//!
//! All public operations serialize on an internal latch and run in O(1)
//! expected time, except inserts that trigger a split.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use parking_lot::Mutex;

use crate::stats::TableStats;
use crate::DEFAULT_BUCKET_CAPACITY;

/// Identifier of a bucket in the table's arena.
type BucketId = u64;

/// A bucket holds up to `bucket_capacity` entries at a given local depth.
struct Bucket<K, V> {
    /// Number of low hash bits that distinguish this bucket from its
    /// siblings. Always `<=` the directory's global depth.
    local_depth: u32,
    entries: HashMap<K, V>,
}

impl<K, V> Bucket<K, V> {
    fn new(local_depth: u32) -> Self {
        Self {
            local_depth,
            entries: HashMap::new(),
        }
    }
}

/// Directory plus bucket arena, guarded by the table latch as one unit.
struct Directory<K, V> {
    /// Number of low hash bits used to index `slots`.
    global_depth: u32,
    /// Bucket id per directory slot; length is always `2^global_depth`.
    slots: Vec<BucketId>,
    /// Live buckets by id.
    buckets: HashMap<BucketId, Bucket<K, V>>,
    next_bucket_id: BucketId,
    /// Total number of entries across all buckets.
    len: usize,
}

impl<K: Hash + Eq, V> Directory<K, V> {
    fn new() -> Self {
        let mut buckets = HashMap::new();
        buckets.insert(0, Bucket::new(0));
        Self {
            global_depth: 0,
            slots: vec![0],
            buckets,
            next_bucket_id: 1,
            len: 0,
        }
    }

    #[inline]
    fn slot_of(&self, hash: u64) -> usize {
        (hash & ((1u64 << self.global_depth) - 1)) as usize
    }

    #[inline]
    fn bucket_id_for(&self, hash: u64) -> BucketId {
        self.slots[self.slot_of(hash)]
    }

    fn bucket(&self, id: BucketId) -> &Bucket<K, V> {
        self.buckets
            .get(&id)
            .expect("directory references a missing bucket")
    }

    fn bucket_mut(&mut self, id: BucketId) -> &mut Bucket<K, V> {
        self.buckets
            .get_mut(&id)
            .expect("directory references a missing bucket")
    }

    fn fresh_bucket(&mut self, local_depth: u32) -> BucketId {
        let id = self.next_bucket_id;
        self.next_bucket_id += 1;
        self.buckets.insert(id, Bucket::new(local_depth));
        id
    }

    /// Splits `bucket_id`, doubling the directory first when the bucket
    /// is already at global depth. Returns true if the directory doubled.
    ///
    /// Entries move to the high child iff bit `local_depth` of their hash
    /// is set; directory slots referencing the old bucket are rewritten
    /// by the same bit of the slot index.
    fn split<S: BuildHasher>(&mut self, bucket_id: BucketId, hash_builder: &S) -> bool {
        let local_depth = self.bucket(bucket_id).local_depth;
        let doubled = local_depth == self.global_depth;
        if doubled {
            // Append a copy of the directory to itself: slots i and
            // i + 2^old_global_depth keep referencing the same buckets.
            self.slots.extend_from_within(..);
            self.global_depth += 1;
        }

        let old = self
            .buckets
            .remove(&bucket_id)
            .expect("directory references a missing bucket");
        let low = self.fresh_bucket(local_depth + 1);
        let high = self.fresh_bucket(local_depth + 1);

        let mask = 1u64 << local_depth;
        for (key, value) in old.entries {
            let target = if hash_builder.hash_one(&key) & mask != 0 {
                high
            } else {
                low
            };
            self.bucket_mut(target).entries.insert(key, value);
        }

        for (slot, id) in self.slots.iter_mut().enumerate() {
            if *id == bucket_id {
                *id = if slot as u64 & mask != 0 { high } else { low };
            }
        }

        doubled
    }
}

/// A thread-safe extendible hash table.
///
/// The table serializes its public operations on an internal latch; no
/// operation is ever observable half-applied. Hashing uses a fixed-key
/// hasher by default, so bucket addressing is deterministic within a
/// process; [`ExtendibleHashTable::with_hasher`] swaps in a different
/// [`BuildHasher`].
///
/// # Example
///
/// ```
/// use basalt_index::ExtendibleHashTable;
///
/// let table = ExtendibleHashTable::new(2);
/// table.insert(1, "one");
/// table.insert(1, "uno");
/// assert_eq!(table.find(&1), Some("uno"));
/// assert_eq!(table.len(), 1);
/// ```
pub struct ExtendibleHashTable<K, V, S = BuildHasherDefault<DefaultHasher>> {
    bucket_capacity: usize,
    hash_builder: S,
    directory: Mutex<Directory<K, V>>,
    stats: TableStats,
}

impl<K, V> ExtendibleHashTable<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Creates a table whose buckets hold up to `bucket_capacity`
    /// entries, with the default deterministic hasher.
    pub fn new(bucket_capacity: usize) -> Self {
        Self::with_hasher(bucket_capacity, BuildHasherDefault::default())
    }
}

impl<K, V, S> ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a table that addresses buckets with `hash_builder`.
    pub fn with_hasher(bucket_capacity: usize, hash_builder: S) -> Self {
        Self {
            bucket_capacity: bucket_capacity.max(1),
            hash_builder,
            directory: Mutex::new(Directory::new()),
            stats: TableStats::new(),
        }
    }

    /// Looks up the value for `key`.
    pub fn find(&self, key: &K) -> Option<V> {
        self.stats.record_access();
        let hash = self.hash_builder.hash_one(key);
        let dir = self.directory.lock();
        let bucket_id = dir.bucket_id_for(hash);
        match dir.bucket(bucket_id).entries.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Checks whether `key` is present without recording a lookup.
    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.hash_builder.hash_one(key);
        let dir = self.directory.lock();
        let bucket_id = dir.bucket_id_for(hash);
        dir.bucket(bucket_id).entries.contains_key(key)
    }

    /// Inserts a key-value pair.
    ///
    /// If the key already exists, overwrites the value in place and
    /// returns the old one. Otherwise the target bucket is split (and the
    /// directory doubled when needed) until it has room, then the entry
    /// is inserted.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.stats.record_insert();
        let hash = self.hash_builder.hash_one(&key);
        let mut dir = self.directory.lock();

        let mut bucket_id = dir.bucket_id_for(hash);
        if let Some(existing) = dir.bucket_mut(bucket_id).entries.get_mut(&key) {
            return Some(std::mem::replace(existing, value));
        }

        // A split can leave the key's bucket full again when every entry
        // lands on one side, so re-resolve and keep going.
        while dir.bucket(bucket_id).entries.len() >= self.bucket_capacity {
            let doubled = dir.split(bucket_id, &self.hash_builder);
            self.stats.record_split();
            if doubled {
                self.stats.record_doubling();
            }
            bucket_id = dir.bucket_id_for(hash);
        }

        dir.bucket_mut(bucket_id).entries.insert(key, value);
        dir.len += 1;
        None
    }

    /// Removes the entry for `key`, returning its value if present.
    ///
    /// Buckets are never combined and the directory never shrinks.
    pub fn remove(&self, key: &K) -> Option<V> {
        let hash = self.hash_builder.hash_one(key);
        let mut dir = self.directory.lock();
        let bucket_id = dir.bucket_id_for(hash);
        let removed = dir.bucket_mut(bucket_id).entries.remove(key);
        if removed.is_some() {
            dir.len -= 1;
            self.stats.record_removal();
        }
        removed
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.directory.lock().len
    }

    /// Returns true if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the per-bucket entry limit.
    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Returns the current global depth.
    pub fn global_depth(&self) -> u32 {
        self.directory.lock().global_depth
    }

    /// Returns the local depth of the bucket referenced by directory
    /// slot `slot`, or `None` if the slot is out of range.
    pub fn local_depth(&self, slot: usize) -> Option<u32> {
        let dir = self.directory.lock();
        let id = *dir.slots.get(slot)?;
        Some(dir.bucket(id).local_depth)
    }

    /// Returns the number of distinct live buckets.
    pub fn num_buckets(&self) -> usize {
        self.directory.lock().buckets.len()
    }

    /// Returns the directory length, always `2^global_depth`.
    pub fn directory_size(&self) -> usize {
        self.directory.lock().slots.len()
    }

    /// Returns the table's operation statistics.
    pub fn stats(&self) -> &TableStats {
        &self.stats
    }
}

impl<K, V> Default for ExtendibleHashTable<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_CAPACITY)
    }
}

impl<K, V, S> std::fmt::Debug for ExtendibleHashTable<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dir = self.directory.lock();
        f.debug_struct("ExtendibleHashTable")
            .field("bucket_capacity", &self.bucket_capacity)
            .field("global_depth", &dir.global_depth)
            .field("directory_size", &dir.slots.len())
            .field("num_buckets", &dir.buckets.len())
            .field("len", &dir.len)
            .finish()
    }
}
