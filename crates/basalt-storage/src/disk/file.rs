//! File-backed disk manager.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use basalt_common::types::PageId;
use parking_lot::Mutex;

use super::error::{DiskError, DiskResult};
use super::DiskManager;

/// Disk manager over a single data file.
///
/// Page `n` lives at byte offset `n * page_size`. The file handle is
/// shared behind a mutex; reads past the current end of file zero-fill,
/// so freshly allocated pages read as empty until first written.
pub struct FileDiskManager {
    file: Mutex<File>,
    path: PathBuf,
    page_size: usize,
    /// Next identifier handed out when the reuse list is empty.
    next_page_id: AtomicU64,
    /// Identifiers returned by `deallocate_page`, reused first.
    free_ids: Mutex<Vec<PageId>>,
}

impl FileDiskManager {
    /// Opens (creating if needed) the data file at `path`.
    ///
    /// Allocation resumes after the highest page the file already
    /// contains.
    pub fn open(path: impl AsRef<Path>, page_size: usize) -> DiskResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| DiskError::io_path(e, &path))?;

        let file_len = file
            .metadata()
            .map_err(|e| DiskError::io_path(e, &path))?
            .len();
        let existing_pages = file_len.div_ceil(page_size as u64);

        Ok(Self {
            file: Mutex::new(file),
            path,
            page_size,
            next_page_id: AtomicU64::new(existing_pages),
            free_ids: Mutex::new(Vec::new()),
        })
    }

    /// Returns the path of the underlying data file.
    pub fn path(&self) -> &Path {
        &self.path
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

    #[inline]
    fn offset_of(&self, page_id: PageId) -> u64 {
        page_id.as_u64() * self.page_size as u64
    }
}

impl DiskManager for FileDiskManager {
    fn allocate_page(&self) -> PageId {
        if let Some(id) = self.free_ids.lock().pop() {
            return id;
        }
        PageId::new(self.next_page_id.fetch_add(1, Ordering::Relaxed))
    }

    fn deallocate_page(&self, page_id: PageId) {
        self.free_ids.lock().push(page_id);
    }

    fn read_page(&self, page_id: PageId, buf: &mut [u8]) -> DiskResult<()> {
        self.check_len(buf.len())?;
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(self.offset_of(page_id)))
            .map_err(|e| DiskError::io_path(e, &self.path))?;

        // The page may extend past the end of the file; whatever the file
        // does not cover reads as zeroes.
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(DiskError::io_path(e, &self.path)),
            }
        }
        buf[filled..].fill(0);
        Ok(())
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> DiskResult<()> {
        self.check_len(data.len())?;
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(self.offset_of(page_id)))
            .map_err(|e| DiskError::io_path(e, &self.path))?;
        file.write_all(data)
            .map_err(|e| DiskError::io_path(e, &self.path))?;
        file.flush().map_err(|e| DiskError::io_path(e, &self.path))?;
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

impl std::fmt::Debug for FileDiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDiskManager")
            .field("path", &self.path)
            .field("page_size", &self.page_size)
            .field("next_page_id", &self.next_page_id.load(Ordering::Relaxed))
            .finish()
    }
}
