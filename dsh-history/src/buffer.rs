//! Bounded in-memory history buffer.
//!
//! Entries are kept most-recent-first behind an `Arc` under the write lock.
//! Mutations copy the sequence only while a snapshot obtained from
//! [`HistoryBuffer::list`] is still alive, so a snapshot is never affected by
//! later changes.

use crate::DEFAULT_HISTORY_SIZE;
use crate::entry::Entry;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// A capacity-bounded, most-recent-first collection of entries.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    entries: RwLock<Arc<Vec<Entry>>>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        HistoryBuffer {
            capacity,
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create a buffer from a signed size; negative sizes fall back to
    /// [`DEFAULT_HISTORY_SIZE`].
    pub fn from_signed(capacity: i64) -> Self {
        Self::new(capacity_or_default(capacity))
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Insert an entry as the most recent one, evicting the oldest entries
    /// beyond capacity.
    pub fn append(&self, entry: Entry) {
        let mut guard = self.entries.write();
        let entries = Arc::make_mut(&mut *guard);
        entries.insert(0, entry);
        entries.truncate(self.capacity);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        *self.entries.write() = Arc::new(Vec::new());
    }

    /// Keep only entries recorded strictly after `cutoff`.
    ///
    /// Returns the number of entries removed.
    pub fn shrink(&self, cutoff: NaiveDateTime) -> usize {
        let mut guard = self.entries.write();
        let kept: Vec<Entry> = guard
            .iter()
            .filter(|e| e.timestamp() > cutoff)
            .cloned()
            .collect();
        let removed = guard.len() - kept.len();
        if removed > 0 {
            debug!("pruned {} history entries older than {}", removed, cutoff);
            *guard = Arc::new(kept);
        }
        removed
    }

    /// Snapshot of the entries, most recent first.
    pub fn list(&self) -> Arc<Vec<Entry>> {
        Arc::clone(&self.entries.read())
    }

    /// Command texts, most recent first.
    pub fn commands(&self) -> Vec<String> {
        self.list().iter().map(|e| e.text().to_string()).collect()
    }

    /// Install a most-recent-first sequence, truncated to capacity.
    pub(crate) fn replace(&self, mut entries: Vec<Entry>) {
        entries.truncate(self.capacity);
        *self.entries.write() = Arc::new(entries);
    }
}

pub(crate) fn capacity_or_default(capacity: i64) -> usize {
    usize::try_from(capacity).unwrap_or(DEFAULT_HISTORY_SIZE)
}
