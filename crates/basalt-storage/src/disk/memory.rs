//! In-memory disk manager.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use basalt_common::types::PageId;
use parking_lot::Mutex;

use super::error::{DiskError, DiskResult};
use super::DiskManager;

/// Disk manager that keeps every page in memory.
///
/// Besides serving as a drop-in [`DiskManager`], it journals the order of
/// reads and writes so tests can assert on write-back behavior.
pub struct MemoryDiskManager {
    page_size: usize,
    pages: Mutex<HashMap<PageId, Vec<u8>>>,
    next_page_id: AtomicU64,
    free_ids: Mutex<Vec<PageId>>,
    write_log: Mutex<Vec<PageId>>,
    read_log: Mutex<Vec<PageId>>,
}

impl MemoryDiskManager {
    /// Creates an empty in-memory disk with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages: Mutex::new(HashMap::new()),
            next_page_id: AtomicU64::new(PageId::FIRST.as_u64()),
            free_ids: Mutex::new(Vec::new()),
            write_log: Mutex::new(Vec::new()),
            read_log: Mutex::new(Vec::new()),
        }
    }

    /// Returns the sequence of pages written so far.
    pub fn write_log(&self) -> Vec<PageId> {
        self.write_log.lock().clone()
    }

    /// Returns the sequence of pages read so far.
    pub fn read_log(&self) -> Vec<PageId> {
        self.read_log.lock().clone()
    }

    /// Returns how many page writes have happened.
    pub fn write_count(&self) -> usize {
        self.write_log.lock().len()
    }

    /// Returns a copy of a page's current contents, if it was ever
    /// written.
    pub fn page(&self, page_id: PageId) -> Option<Vec<u8>> {
        self.pages.lock().get(&page_id).cloned()
    }

    fn check_len(&self, len: usize) -> DiskResult<()> {
        if len != self.page_size {
            return Err(DiskError::BadBufferLength {
                len,
                page_size: self.page_size,
            });
        }
        Ok(())
    }
}

impl DiskManager for MemoryDiskManager {
    fn allocate_page(&self) -> PageId {
        if let Some(id) = self.free_ids.lock().pop() {
            return id;
        }
        PageId::new(self.next_page_id.fetch_add(1, Ordering::Relaxed))
    }

    fn deallocate_page(&self, page_id: PageId) {
        self.pages.lock().remove(&page_id);
        self.free_ids.lock().push(page_id);
    }

    fn read_page(&self, page_id: PageId, buf: &mut [u8]) -> DiskResult<()> {
        self.check_len(buf.len())?;
        self.read_log.lock().push(page_id);
        match self.pages.lock().get(&page_id) {
            Some(data) => buf.copy_from_slice(data),
            None => buf.fill(0),
        }
        Ok(())
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> DiskResult<()> {
        self.check_len(data.len())?;
        self.write_log.lock().push(page_id);
        self.pages.lock().insert(page_id, data.to_vec());
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

impl std::fmt::Debug for MemoryDiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDiskManager")
            .field("page_size", &self.page_size)
            .field("pages", &self.pages.lock().len())
            .field("writes", &self.write_log.lock().len())
            .finish()
    }
}
