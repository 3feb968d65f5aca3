//! File-backed history store.
//!
//! The backing file holds one encoded [`Entry`] per line, oldest first. The
//! in-memory buffer and the file only meet at [`PersistentHistoryStore::load`]
//! and [`PersistentHistoryStore::save`].

use crate::buffer::HistoryBuffer;
use crate::config::HistoryConfig;
use crate::encoding::Encoding;
use crate::entry::Entry;
use crate::error::{HistoryError, Result};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A history buffer persisted to a flat text file.
#[derive(Debug)]
pub struct PersistentHistoryStore {
    buffer: HistoryBuffer,
    path: PathBuf,
    encoding: Encoding,
    io_lock: Mutex<()>,
}

impl PersistentHistoryStore {
    pub fn new(path: impl Into<PathBuf>, encoding: Encoding, capacity: usize) -> Self {
        PersistentHistoryStore {
            buffer: HistoryBuffer::new(capacity),
            path: path.into(),
            encoding,
            io_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.path(), config.encoding, config.capacity)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn buffer(&self) -> &HistoryBuffer {
        &self.buffer
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn list(&self) -> Arc<Vec<Entry>> {
        self.buffer.list()
    }

    pub fn append(&self, entry: Entry) {
        self.buffer.append(entry)
    }

    pub fn clear(&self) {
        self.buffer.clear()
    }

    pub fn shrink(&self, cutoff: NaiveDateTime) -> usize {
        self.buffer.shrink(cutoff)
    }

    /// Replace the buffer contents with the newest entries of the file.
    ///
    /// Nothing is installed unless every line parses.
    pub fn load(&self) -> Result<usize> {
        let _guard = self.io_lock.lock();

        let bytes = std::fs::read(&self.path).map_err(|e| HistoryError::io(&self.path, e))?;
        let content = self
            .encoding
            .decode(bytes)
            .map_err(|e| HistoryError::io(&self.path, e))?;

        let mut entries = content
            .lines()
            .enumerate()
            .map(|(i, line)| Entry::parse(line).map_err(|e| e.at_line(i + 1)))
            .collect::<Result<Vec<Entry>>>()?;

        let skip = entries.len().saturating_sub(self.buffer.capacity());
        entries.drain(..skip);
        entries.reverse();

        let loaded = entries.len();
        self.buffer.replace(entries);
        debug!(
            "loaded {} history entries from {} (skipped {})",
            loaded,
            self.path.display(),
            skip
        );
        Ok(loaded)
    }

    /// Write the buffer to the file, oldest entry first, replacing its
    /// previous contents in one step.
    pub fn save(&self) -> Result<usize> {
        let _guard = self.io_lock.lock();

        let snapshot = self.buffer.list();
        let mut content = String::new();
        for entry in snapshot.iter().take(self.buffer.capacity()).rev() {
            content.push_str(&entry.format());
            content.push('\n');
        }
        let bytes = self
            .encoding
            .encode(&content)
            .map_err(|e| HistoryError::io(&self.path, e))?;

        write_atomically(&self.path, &bytes).map_err(|e| HistoryError::io(&self.path, e))?;
        debug!(
            "saved {} history entries to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(snapshot.len().min(self.buffer.capacity()))
    }
}

/// Write to a temporary sibling file and rename it over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".history")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
