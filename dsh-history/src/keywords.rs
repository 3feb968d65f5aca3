//! Keyword history for interactive front ends.
//!
//! Wraps a [`PersistentHistoryStore`] with the load/prune/save and
//! append/save sequences a prompt or search box runs, driven by a
//! [`HistoryConfig`].

use crate::config::HistoryConfig;
use crate::entry::Entry;
use crate::error::{HistoryError, Result};
use crate::store::PersistentHistoryStore;
use chrono::Local;
use std::fs::OpenOptions;
use tracing::debug;

#[derive(Debug)]
pub struct KeywordHistory {
    config: HistoryConfig,
    store: PersistentHistoryStore,
}

impl KeywordHistory {
    pub fn new(config: HistoryConfig) -> Self {
        let store = PersistentHistoryStore::from_config(&config);
        KeywordHistory { config, store }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn store(&self) -> &PersistentHistoryStore {
        &self.store
    }

    /// Create the history directory and an empty history file if missing.
    pub fn initialize(&self) -> Result<()> {
        let dir = &self.config.directory;
        std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;

        let path = self.config.path();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| HistoryError::io(&path, e))?;
        Ok(())
    }

    /// Whether the history file exists.
    pub fn is_valid(&self) -> bool {
        self.store.path().is_file()
    }

    /// Load the history, drop entries older than the configured age and
    /// write the result back.
    ///
    /// Returns the number of entries pruned.
    pub fn load_keywords(&self) -> Result<usize> {
        self.store.load()?;
        let cutoff = self.config.cutoff(Local::now().naive_local());
        let pruned = self.store.shrink(cutoff);
        self.store.save()?;
        debug!(
            "history ready: {} entries, {} pruned",
            self.store.buffer().len(),
            pruned
        );
        Ok(pruned)
    }

    /// Record a keyword as the most recent entry and persist.
    pub fn update_keywords(&self, keyword: &str) -> Result<()> {
        self.store.append(Entry::new(keyword)?);
        self.store.save()?;
        Ok(())
    }

    /// Remove every keyword and persist the empty history.
    pub fn clear_keywords(&self) -> Result<()> {
        self.store.clear();
        self.store.save()?;
        Ok(())
    }

    /// Keywords, most recent first. Empty when the history file is missing.
    pub fn keywords(&self) -> Vec<String> {
        if self.is_valid() {
            self.store.buffer().commands()
        } else {
            Vec::new()
        }
    }
}
