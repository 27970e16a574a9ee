//! LRU replacement policy for the buffer pool.
//!
//! The replacer tracks the set of evictable items in recency order:
//! inserts land at the most-recent end (re-inserting promotes), victims
//! come off the least-recent end. A doubly-linked list paired with a
//! position map keeps insert, victim, and erase O(1).
//!
//! The buffer pool keeps the replacer's contents equal to the set of
//! unpinned resident frames: a frame is inserted when its pin count
//! drops to zero and erased the moment it is re-pinned, evicted, or
//! deleted.

use std::collections::HashMap;
use std::hash::Hash;
use std::ptr::NonNull;

use parking_lot::Mutex;

/// A node in the recency list.
struct Node<T> {
    item: T,
    prev: Option<NonNull<Node<T>>>,
    next: Option<NonNull<Node<T>>>,
}

impl<T> Node<T> {
    fn new(item: T) -> Self {
        Self {
            item,
            prev: None,
            next: None,
        }
    }
}

/// Recency list plus position index, guarded as one unit.
struct LruList<T> {
    /// Map from item to its node.
    map: HashMap<T, NonNull<Node<T>>>,
    /// Most recently inserted.
    head: Option<NonNull<Node<T>>>,
    /// Least recently inserted; the next victim.
    tail: Option<NonNull<Node<T>>>,
}

impl<T: Hash + Eq + Clone> LruList<T> {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    fn push_front(&mut self, mut node_ptr: NonNull<Node<T>>) {
        unsafe {
            let node = node_ptr.as_mut();
            node.prev = None;
            node.next = self.head;

            if let Some(mut head) = self.head {
                head.as_mut().prev = Some(node_ptr);
            }

            self.head = Some(node_ptr);

            if self.tail.is_none() {
                self.tail = Some(node_ptr);
            }
        }
    }

    fn unlink(&mut self, node_ptr: NonNull<Node<T>>) {
        unsafe {
            let node = node_ptr.as_ref();
            let prev = node.prev;
            let next = node.next;

            match prev {
                Some(mut prev) => prev.as_mut().next = next,
                None => self.head = next,
            }

            match next {
                Some(mut next) => next.as_mut().prev = prev,
                None => self.tail = prev,
            }
        }
    }
}

impl<T> Drop for LruList<T> {
    fn drop(&mut self) {
        let mut current = self.head;
        while let Some(node_ptr) = current {
            unsafe {
                current = (*node_ptr.as_ptr()).next;
                drop(Box::from_raw(node_ptr.as_ptr()));
            }
        }
    }
}

/// A thread-safe LRU replacer with O(1) operations.
///
/// # Example
///
/// ```
/// use basalt_storage::buffer::LruReplacer;
///
/// let replacer = LruReplacer::new();
/// replacer.insert(1);
/// replacer.insert(2);
/// assert_eq!(replacer.victim(), Some(1));
/// assert_eq!(replacer.victim(), Some(2));
/// assert_eq!(replacer.victim(), None);
/// ```
pub struct LruReplacer<T> {
    inner: Mutex<LruList<T>>,
}

// Safety: the list owns its nodes and every access goes through the
// mutex; the raw pointers never leave the structure.
unsafe impl<T: Send> Send for LruReplacer<T> {}
unsafe impl<T: Send> Sync for LruReplacer<T> {}

impl<T: Hash + Eq + Clone> LruReplacer<T> {
    /// Creates an empty replacer.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LruList::new()),
        }
    }

    /// Makes `item` the most recently used entry, adding it if absent.
    pub fn insert(&self, item: T) {
        let mut list = self.inner.lock();
        if let Some(&node_ptr) = list.map.get(&item) {
            list.unlink(node_ptr);
            list.push_front(node_ptr);
            return;
        }

        let node = Box::new(Node::new(item.clone()));
        let node_ptr = NonNull::from(Box::leak(node));
        list.push_front(node_ptr);
        list.map.insert(item, node_ptr);
    }

    /// Removes and returns the least recently used entry, or `None` if
    /// the replacer is empty.
    pub fn victim(&self) -> Option<T> {
        let mut list = self.inner.lock();
        let tail = list.tail?;
        list.unlink(tail);
        // Safety: the tail pointer was owned by the list; after unlink we
        // are its sole owner.
        let node = unsafe { Box::from_raw(tail.as_ptr()) };
        list.map.remove(&node.item);
        Some(node.item)
    }

    /// Removes `item` from the replacer. Returns false if it was not
    /// present.
    pub fn erase(&self, item: &T) -> bool {
        let mut list = self.inner.lock();
        match list.map.remove(item) {
            Some(node_ptr) => {
                list.unlink(node_ptr);
                // Safety: removed from the map, so this is the only
                // remaining pointer to the node.
                drop(unsafe { Box::from_raw(node_ptr.as_ptr()) });
                true
            }
            None => false,
        }
    }

    /// Returns true if `item` is currently evictable.
    pub fn contains(&self, item: &T) -> bool {
        self.inner.lock().map.contains_key(item)
    }

    /// Returns the number of evictable entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Returns true if nothing is evictable.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Hash + Eq + Clone> Default for LruReplacer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone> std::fmt::Debug for LruReplacer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruReplacer")
            .field("len", &self.len())
            .finish()
    }
}
