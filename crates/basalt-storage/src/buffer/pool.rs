//! Buffer pool manager.
//!
//! The pool owns a fixed array of page frames and serves higher layers a
//! pinned frame for any disk page. It guarantees that a page resides in
//! at most one frame and that dirty frames are written back before their
//! frame holds another page.
//!
//! One pool-wide latch serializes every public operation, covering the
//! page table, the free list, the replacer, frame metadata, and the disk
//! I/O performed while the state is mid-transition. The latch is
//! deliberately coarse; none of the public methods call each other, so
//! it is never re-entered.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use basalt_common::types::PageId;
use basalt_index::{ExtendibleHashTable, DEFAULT_BUCKET_CAPACITY};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::disk::DiskManager;
use crate::wal::LogManager;

use super::config::BufferPoolConfig;
use super::error::{BufferError, BufferResult};
use super::eviction::LruReplacer;
use super::frame::{Frame, FrameId};
use super::PoolStats;

/// Bookkeeping guarded by the pool latch.
struct PoolInner {
    /// Resident pages: page id to frame.
    page_table: ExtendibleHashTable<PageId, FrameId>,
    /// Frames that have never held a page, or were released by a delete.
    /// Preferred over the replacer when a frame is needed.
    free_list: VecDeque<FrameId>,
    /// Unpinned resident frames in eviction order.
    replacer: LruReplacer<FrameId>,
}

/// The buffer pool manager.
///
/// Frames are created once at construction and owned by the pool for its
/// whole lifetime; callers receive `Arc<Frame>` handles whose pins they
/// release through [`BufferPoolManager::unpin_page`].
pub struct BufferPoolManager {
    config: BufferPoolConfig,
    frames: Vec<Arc<Frame>>,
    inner: Mutex<PoolInner>,
    disk: Arc<dyn DiskManager>,
    log: Option<Arc<dyn LogManager>>,
    fetch_count: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    eviction_count: AtomicU64,
    flush_count: AtomicU64,
}

impl BufferPoolManager {
    /// Creates a buffer pool without a log manager (logging disabled, as
    /// in tests).
    pub fn new(config: BufferPoolConfig, disk: Arc<dyn DiskManager>) -> BufferResult<Self> {
        Self::with_log_manager(config, disk, None)
    }

    /// Creates a buffer pool that flushes `log` before every dirty
    /// write-back.
    pub fn with_log_manager(
        config: BufferPoolConfig,
        disk: Arc<dyn DiskManager>,
        log: Option<Arc<dyn LogManager>>,
    ) -> BufferResult<Self> {
        config.validate().map_err(BufferError::config)?;
        if disk.page_size() != config.page_size {
            return Err(BufferError::config(format!(
                "disk manager page size {} does not match pool page size {}",
                disk.page_size(),
                config.page_size
            )));
        }

        let frames: Vec<Arc<Frame>> = (0..config.pool_size)
            .map(|i| Arc::new(Frame::new(FrameId::new(i), config.page_size)))
            .collect();
        let free_list = (0..config.pool_size).map(FrameId::new).collect();

        Ok(Self {
            config,
            frames,
            inner: Mutex::new(PoolInner {
                page_table: ExtendibleHashTable::new(DEFAULT_BUCKET_CAPACITY),
                free_list,
                replacer: LruReplacer::new(),
            }),
            disk,
            log,
            fetch_count: AtomicU64::new(0),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            eviction_count: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
        })
    }

    /// Fetches the frame holding `page_id`, reading it from disk if it is
    /// not resident. The returned frame is pinned; the caller must
    /// eventually [`BufferPoolManager::unpin_page`] it.
    ///
    /// Fails with [`BufferError::NoFreeFrames`] when the page is not
    /// resident and every frame is pinned.
    pub fn fetch_page(&self, page_id: PageId) -> BufferResult<Arc<Frame>> {
        if !page_id.is_valid() {
            return Err(BufferError::InvalidPageId);
        }
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.lock();

        if let Some(frame_id) = inner.page_table.find(&page_id) {
            let frame = &self.frames[frame_id.index()];
            if frame.pin() == 1 {
                // No longer evictable.
                inner.replacer.erase(&frame_id);
            }
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(frame));
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        let frame_id = self.take_victim(&mut inner)?;
        let frame = &self.frames[frame_id.index()];

        inner.page_table.insert(page_id, frame_id);
        {
            let mut data = frame.write_data();
            data.fill(0);
            self.disk.read_page(page_id, &mut data)?;
        }
        frame.set_dirty(false);
        frame.set_page_id(page_id);
        trace!(page_id = %page_id, frame = frame_id.index(), "fetched page from disk");

        Ok(Arc::clone(frame))
    }

    /// Allocates a fresh page and pins it into a frame.
    ///
    /// The frame's buffer is zeroed; layout and initialization of the new
    /// page belong to the caller. Fails with
    /// [`BufferError::NoFreeFrames`] when every frame is pinned.
    pub fn new_page(&self) -> BufferResult<Arc<Frame>> {
        let mut inner = self.inner.lock();
        let frame_id = self.take_victim(&mut inner)?;
        let frame = &self.frames[frame_id.index()];

        let page_id = self.disk.allocate_page();
        frame.write_data().fill(0);
        frame.set_dirty(false);
        frame.set_page_id(page_id);
        inner.page_table.insert(page_id, frame_id);
        trace!(page_id = %page_id, frame = frame_id.index(), "allocated new page");

        Ok(Arc::clone(frame))
    }

    /// Releases one pin on `page_id`, OR-ing `is_dirty` into the frame's
    /// dirty flag. When the pin count reaches zero the frame becomes
    /// evictable.
    ///
    /// Fails if the page is not resident, or if its pin count is already
    /// zero (in which case nothing changes).
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> BufferResult<()> {
        let mut inner = self.inner.lock();
        let frame_id = inner
            .page_table
            .find(&page_id)
            .ok_or(BufferError::PageNotFound { page_id })?;
        let frame = &self.frames[frame_id.index()];

        if frame.pin_count() == 0 {
            return Err(BufferError::NotPinned { page_id });
        }
        if frame.unpin() == 0 {
            inner.replacer.insert(frame_id);
        }
        if is_dirty {
            frame.set_dirty(true);
        }
        Ok(())
    }

    /// Writes the current image of `page_id` to disk.
    ///
    /// The dirty flag is left untouched: the flag tracks "must be written
    /// back before the frame is reused", and eviction remains the point
    /// where it is cleared.
    pub fn flush_page(&self, page_id: PageId) -> BufferResult<()> {
        if !page_id.is_valid() {
            return Err(BufferError::InvalidPageId);
        }
        let inner = self.inner.lock();
        let frame_id = inner
            .page_table
            .find(&page_id)
            .ok_or(BufferError::PageNotFound { page_id })?;
        let frame = &self.frames[frame_id.index()];

        let data = frame.read_data();
        self.disk.write_page(page_id, &data)?;
        self.flush_count.fetch_add(1, Ordering::Relaxed);
        debug!(page_id = %page_id, "flushed page");
        Ok(())
    }

    /// Writes every dirty resident page to disk and returns how many
    /// pages were written. Like [`BufferPoolManager::flush_page`], dirty
    /// flags are left untouched.
    pub fn flush_all_pages(&self) -> BufferResult<usize> {
        let _inner = self.inner.lock();
        let mut flushed = 0;
        for frame in &self.frames {
            let page_id = frame.page_id();
            if page_id.is_valid() && frame.is_dirty() {
                let data = frame.read_data();
                self.disk.write_page(page_id, &data)?;
                self.flush_count.fetch_add(1, Ordering::Relaxed);
                flushed += 1;
            }
        }
        debug!(flushed, "flushed all dirty pages");
        Ok(flushed)
    }

    /// Removes `page_id` from the pool and deallocates it on disk.
    ///
    /// Fails if the page is not resident or still pinned. On success the
    /// frame returns to the free list with its metadata reset; nothing is
    /// written back.
    pub fn delete_page(&self, page_id: PageId) -> BufferResult<()> {
        let mut inner = self.inner.lock();
        let frame_id = inner
            .page_table
            .find(&page_id)
            .ok_or(BufferError::PageNotFound { page_id })?;
        let frame = &self.frames[frame_id.index()];

        let pin_count = frame.pin_count();
        if pin_count != 0 {
            return Err(BufferError::PagePinned { page_id, pin_count });
        }

        inner.page_table.remove(&page_id);
        inner.replacer.erase(&frame_id);
        frame.reset();
        inner.free_list.push_back(frame_id);
        self.disk.deallocate_page(page_id);
        debug!(page_id = %page_id, "deleted page");
        Ok(())
    }

    /// Returns true if `page_id` is resident.
    pub fn contains(&self, page_id: PageId) -> bool {
        self.inner.lock().page_table.contains_key(&page_id)
    }

    /// Returns the number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    /// Returns the page size in bytes.
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Returns the number of frames currently on the free list.
    pub fn free_frames(&self) -> usize {
        self.inner.lock().free_list.len()
    }

    /// Returns a statistics snapshot.
    pub fn stats(&self) -> PoolStats {
        let mut pinned = 0;
        let mut dirty = 0;
        for frame in &self.frames {
            if frame.is_pinned() {
                pinned += 1;
            }
            if frame.is_dirty() {
                dirty += 1;
            }
        }

        PoolStats {
            fetches: self.fetch_count.load(Ordering::Relaxed),
            hits: self.hit_count.load(Ordering::Relaxed),
            misses: self.miss_count.load(Ordering::Relaxed),
            evictions: self.eviction_count.load(Ordering::Relaxed),
            flushes: self.flush_count.load(Ordering::Relaxed),
            pinned_frames: pinned,
            dirty_frames: dirty,
        }
    }

    /// Claims a frame for a new resident page: free list first, then the
    /// replacer. The claimed frame comes back pinned (count 1), written
    /// back if it was dirty, and with its old page unmapped.
    fn take_victim(&self, inner: &mut PoolInner) -> BufferResult<FrameId> {
        let frame_id = match inner.free_list.pop_front() {
            Some(frame_id) => frame_id,
            None => inner.replacer.victim().ok_or(BufferError::NoFreeFrames)?,
        };
        let frame = &self.frames[frame_id.index()];
        frame.pin();

        let old_page_id = frame.page_id();
        if frame.is_dirty() {
            // Write-ahead rule: the log reaches stable storage before the
            // page image does.
            if let Some(log) = &self.log {
                log.flush()?;
            }
            debug!(page_id = %old_page_id, frame = frame_id.index(), "writing back dirty victim");
            let data = frame.read_data();
            self.disk.write_page(old_page_id, &data)?;
            drop(data);
            frame.set_dirty(false);
            self.flush_count.fetch_add(1, Ordering::Relaxed);
        }

        if old_page_id.is_valid() {
            inner.page_table.remove(&old_page_id);
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
            trace!(page_id = %old_page_id, frame = frame_id.index(), "evicted page");
        }

        Ok(frame_id)
    }
}

impl std::fmt::Debug for BufferPoolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BufferPoolManager")
            .field("pool_size", &self.config.pool_size)
            .field("page_size", &self.config.page_size)
            .field("resident_pages", &inner.page_table.len())
            .field("free_frames", &inner.free_list.len())
            .field("evictable_frames", &inner.replacer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{DiskResult, FileDiskManager, MemoryDiskManager};
    use parking_lot::Mutex;
    use tempfile::tempdir;

    const PAGE_SIZE: usize = 512;

    fn create_pool(pool_size: usize) -> (BufferPoolManager, Arc<MemoryDiskManager>) {
        let disk = Arc::new(MemoryDiskManager::new(PAGE_SIZE));
        let config = BufferPoolConfig::new(pool_size).with_page_size(PAGE_SIZE);
        let pool = BufferPoolManager::new(config, disk.clone()).unwrap();
        (pool, disk)
    }

    #[test]
    fn test_page_size_mismatch_rejected() {
        let disk = Arc::new(MemoryDiskManager::new(1024));
        let config = BufferPoolConfig::new(4).with_page_size(PAGE_SIZE);
        assert!(matches!(
            BufferPoolManager::new(config, disk),
            Err(BufferError::Config { .. })
        ));
    }

    #[test]
    fn test_new_page_pins_frame() {
        let (pool, _disk) = create_pool(4);

        let frame = pool.new_page().unwrap();
        assert!(frame.page_id().is_valid());
        assert_eq!(frame.pin_count(), 1);
        assert!(!frame.is_dirty());
        assert!(pool.contains(frame.page_id()));
        assert_eq!(pool.free_frames(), 3);
    }

    #[test]
    fn test_clean_eviction_skips_write() {
        // Pool of one frame: the second new_page must reuse it.
        let (pool, disk) = create_pool(1);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();
        let first_frame_id = frame.frame_id();
        pool.unpin_page(p1, false).unwrap();

        let frame = pool.new_page().unwrap();
        let p2 = frame.page_id();
        assert_ne!(p1, p2);
        assert_eq!(frame.frame_id(), first_frame_id);
        assert_eq!(frame.pin_count(), 1);
        assert!(!pool.contains(p1));

        // p1 was never dirtied, so eviction wrote nothing.
        assert_eq!(disk.write_count(), 0);
    }

    #[test]
    fn test_dirty_eviction_writes_back() {
        let (pool, disk) = create_pool(1);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();
        frame.write_data()[0..5].copy_from_slice(b"hello");
        pool.unpin_page(p1, true).unwrap();

        let frame = pool.new_page().unwrap();
        let p2 = frame.page_id();
        assert_ne!(p1, p2);

        assert_eq!(disk.write_log(), vec![p1]);
        assert_eq!(&disk.page(p1).unwrap()[0..5], b"hello");
    }

    #[test]
    fn test_all_pinned_exhausts_pool() {
        let (pool, _disk) = create_pool(2);

        let f1 = pool.new_page().unwrap();
        let f2 = pool.new_page().unwrap();

        assert!(matches!(
            pool.fetch_page(PageId::new(99)),
            Err(BufferError::NoFreeFrames)
        ));
        assert!(matches!(pool.new_page(), Err(BufferError::NoFreeFrames)));

        // Unpinning one page makes room again.
        pool.unpin_page(f1.page_id(), false).unwrap();
        assert!(pool.new_page().is_ok());
        drop(f2);
    }

    #[test]
    fn test_lru_victim_order() {
        let (pool, _disk) = create_pool(3);

        let p1 = pool.new_page().unwrap().page_id();
        let p2 = pool.new_page().unwrap().page_id();
        let p3 = pool.new_page().unwrap().page_id();
        pool.unpin_page(p1, false).unwrap();
        pool.unpin_page(p2, false).unwrap();
        pool.unpin_page(p3, false).unwrap();

        // Free list is exhausted, so the least recently unpinned page
        // goes first.
        pool.new_page().unwrap();
        assert!(!pool.contains(p1));
        assert!(pool.contains(p2));
        assert!(pool.contains(p3));
    }

    #[test]
    fn test_refetch_removes_from_replacer() {
        let (pool, _disk) = create_pool(2);

        let p1 = pool.new_page().unwrap().page_id();
        let p2 = pool.new_page().unwrap().page_id();
        pool.unpin_page(p1, false).unwrap();
        pool.unpin_page(p2, false).unwrap();

        // Re-pinning p1 must protect it even though p2 was unpinned
        // later.
        let _f1 = pool.fetch_page(p1).unwrap();
        pool.new_page().unwrap();

        assert!(pool.contains(p1));
        assert!(!pool.contains(p2));
    }

    #[test]
    fn test_fetch_hit_shares_frame() {
        let (pool, disk) = create_pool(4);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();

        let again = pool.fetch_page(p1).unwrap();
        assert_eq!(again.frame_id(), frame.frame_id());
        assert_eq!(again.pin_count(), 2);
        // The hit never touched the disk.
        assert!(disk.read_log().is_empty());

        pool.unpin_page(p1, false).unwrap();
        pool.unpin_page(p1, false).unwrap();
        assert_eq!(frame.pin_count(), 0);
    }

    #[test]
    fn test_fetch_reads_from_disk() {
        let (pool, disk) = create_pool(2);

        let mut data = vec![0u8; PAGE_SIZE];
        data[0..4].copy_from_slice(b"disk");
        let page_id = disk.allocate_page();
        disk.write_page(page_id, &data).unwrap();

        let frame = pool.fetch_page(page_id).unwrap();
        assert_eq!(&frame.read_data()[0..4], b"disk");
        assert_eq!(frame.page_id(), page_id);
        assert!(!frame.is_dirty());
    }

    #[test]
    fn test_unpin_errors() {
        let (pool, _disk) = create_pool(2);

        assert!(matches!(
            pool.unpin_page(PageId::new(7), false),
            Err(BufferError::PageNotFound { .. })
        ));

        let p1 = pool.new_page().unwrap().page_id();
        pool.unpin_page(p1, false).unwrap();
        assert!(matches!(
            pool.unpin_page(p1, false),
            Err(BufferError::NotPinned { .. })
        ));
    }

    #[test]
    fn test_dirty_flag_is_sticky() {
        let (pool, disk) = create_pool(1);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();
        frame.write_data()[0] = 1;
        pool.unpin_page(p1, true).unwrap();

        // A later clean unpin must not clear the dirty flag.
        let frame = pool.fetch_page(p1).unwrap();
        pool.unpin_page(p1, false).unwrap();
        assert!(frame.is_dirty());

        pool.new_page().unwrap();
        assert_eq!(disk.write_log(), vec![p1]);
    }

    #[test]
    fn test_flush_page_leaves_dirty_set() {
        let (pool, disk) = create_pool(1);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();
        frame.write_data()[0] = 1;
        pool.unpin_page(p1, true).unwrap();

        pool.flush_page(p1).unwrap();
        assert_eq!(disk.write_count(), 1);
        assert!(frame.is_dirty());

        // Eviction still writes the page back a second time.
        pool.new_page().unwrap();
        assert_eq!(disk.write_log(), vec![p1, p1]);
    }

    #[test]
    fn test_flush_page_errors() {
        let (pool, _disk) = create_pool(2);

        assert!(matches!(
            pool.flush_page(PageId::INVALID),
            Err(BufferError::InvalidPageId)
        ));
        assert!(matches!(
            pool.flush_page(PageId::new(3)),
            Err(BufferError::PageNotFound { .. })
        ));
    }

    #[test]
    fn test_flush_all_pages() {
        let (pool, disk) = create_pool(4);

        for _ in 0..3 {
            let frame = pool.new_page().unwrap();
            frame.write_data()[0] = 9;
            pool.unpin_page(frame.page_id(), true).unwrap();
        }
        let clean = pool.new_page().unwrap();
        pool.unpin_page(clean.page_id(), false).unwrap();

        assert_eq!(pool.flush_all_pages().unwrap(), 3);
        assert_eq!(disk.write_count(), 3);
    }

    #[test]
    fn test_delete_page() {
        let (pool, disk) = create_pool(2);

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();

        // Still pinned: delete must refuse.
        assert!(matches!(
            pool.delete_page(p1),
            Err(BufferError::PagePinned { pin_count: 1, .. })
        ));

        pool.unpin_page(p1, false).unwrap();
        pool.delete_page(p1).unwrap();
        assert!(!pool.contains(p1));
        assert_eq!(pool.free_frames(), 2);

        // The identifier went back to the disk manager for reuse.
        assert_eq!(disk.allocate_page(), p1);

        assert!(matches!(
            pool.delete_page(p1),
            Err(BufferError::PageNotFound { .. })
        ));
    }

    #[test]
    fn test_unique_residency() {
        let (pool, _disk) = create_pool(4);

        let p1 = pool.new_page().unwrap().page_id();
        let f1 = pool.fetch_page(p1).unwrap();
        let f2 = pool.fetch_page(p1).unwrap();
        assert_eq!(f1.frame_id(), f2.frame_id());

        // Every other frame is still free.
        assert_eq!(pool.free_frames(), 3);
    }

    #[test]
    fn test_stats() {
        let (pool, _disk) = create_pool(2);

        let p1 = pool.new_page().unwrap().page_id();
        pool.fetch_page(p1).unwrap(); // hit
        pool.unpin_page(p1, true).unwrap();
        pool.unpin_page(p1, false).unwrap();
        pool.fetch_page(PageId::new(50)).unwrap(); // miss

        let stats = pool.stats();
        assert_eq!(stats.fetches, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.pinned_frames, 1);
        assert_eq!(stats.dirty_frames, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    /// Log manager that records how many disk writes had happened at
    /// each flush, so write-ahead ordering is checkable.
    struct RecordingLog {
        disk: Arc<MemoryDiskManager>,
        writes_at_flush: Mutex<Vec<usize>>,
    }

    impl LogManager for RecordingLog {
        fn flush(&self) -> DiskResult<()> {
            self.writes_at_flush.lock().push(self.disk.write_count());
            Ok(())
        }
    }

    #[test]
    fn test_log_flushed_before_dirty_write_back() {
        let disk = Arc::new(MemoryDiskManager::new(PAGE_SIZE));
        let log = Arc::new(RecordingLog {
            disk: disk.clone(),
            writes_at_flush: Mutex::new(Vec::new()),
        });
        let config = BufferPoolConfig::new(1).with_page_size(PAGE_SIZE);
        let pool = BufferPoolManager::with_log_manager(
            config,
            disk.clone(),
            Some(log.clone() as Arc<dyn LogManager>),
        )
        .unwrap();

        let frame = pool.new_page().unwrap();
        let p1 = frame.page_id();
        frame.write_data()[0] = 1;
        pool.unpin_page(p1, true).unwrap();

        pool.new_page().unwrap();

        // Exactly one log flush, and it happened before the page write.
        assert_eq!(*log.writes_at_flush.lock(), vec![0]);
        assert_eq!(disk.write_count(), 1);
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.db");

        let page_id = {
            let disk = Arc::new(FileDiskManager::open(&path, PAGE_SIZE).unwrap());
            let config = BufferPoolConfig::new(2).with_page_size(PAGE_SIZE);
            let pool = BufferPoolManager::new(config, disk).unwrap();

            let frame = pool.new_page().unwrap();
            let page_id = frame.page_id();
            frame.write_data()[0..7].copy_from_slice(b"basalt!");
            pool.unpin_page(page_id, true).unwrap();
            pool.flush_page(page_id).unwrap();
            page_id
        };

        let disk = Arc::new(FileDiskManager::open(&path, PAGE_SIZE).unwrap());
        let config = BufferPoolConfig::new(2).with_page_size(PAGE_SIZE);
        let pool = BufferPoolManager::new(config, disk).unwrap();

        let frame = pool.fetch_page(page_id).unwrap();
        assert_eq!(&frame.read_data()[0..7], b"basalt!");
    }

    #[test]
    fn test_concurrent_fetch_and_unpin() {
        let (pool, _disk) = create_pool(8);
        let pool = Arc::new(pool);

        let mut page_ids = Vec::new();
        for _ in 0..4 {
            let frame = pool.new_page().unwrap();
            page_ids.push(frame.page_id());
            pool.unpin_page(frame.page_id(), false).unwrap();
        }

        let mut handles = Vec::new();
        for &page_id in &page_ids {
            for _ in 0..2 {
                let pool = Arc::clone(&pool);
                handles.push(std::thread::spawn(move || {
                    for _ in 0..50 {
                        let frame = pool.fetch_page(page_id).unwrap();
                        assert_eq!(frame.page_id(), page_id);
                        pool.unpin_page(page_id, false).unwrap();
                    }
                }));
            }
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // All pins released: every page is resident and evictable again.
        for &page_id in &page_ids {
            assert!(pool.contains(page_id));
        }
        assert_eq!(pool.stats().pinned_frames, 0);
    }
}
