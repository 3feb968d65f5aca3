use crate::buffer::capacity_or_default;
use crate::encoding::Encoding;
use crate::error::{HistoryError, Result};
use crate::{DEFAULT_HISTORY_FILE, DEFAULT_HISTORY_SIZE, DEFAULT_REMAIN_DAYS};
use chrono::{Duration, NaiveDateTime};
use std::env;
use std::path::PathBuf;

pub const ENV_HISTORY_SIZE: &str = "DSH_HISTORY_SIZE";
pub const ENV_HISTORY_DIR: &str = "DSH_HISTORY_DIR";
pub const ENV_HISTORY_FILE: &str = "DSH_HISTORY_FILE";
pub const ENV_HISTORY_CHARSET: &str = "DSH_HISTORY_CHARSET";
pub const ENV_HISTORY_REMAIN_DAYS: &str = "DSH_HISTORY_REMAIN_DAYS";

/// Configuration for a file-backed history
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Directory holding the history file
    pub directory: PathBuf,
    /// File name inside `directory`
    pub file_name: String,
    /// Maximum number of entries kept
    pub capacity: usize,
    /// Entries older than this are pruned by `KeywordHistory::load_keywords`
    pub remaining: Duration,
    /// Character encoding of the history file
    pub encoding: Encoding,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            directory: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            file_name: DEFAULT_HISTORY_FILE.to_string(),
            capacity: DEFAULT_HISTORY_SIZE,
            remaining: Duration::days(DEFAULT_REMAIN_DAYS),
            encoding: Encoding::Utf8,
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the defaults overridden by `DSH_HISTORY_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(size) = value(ENV_HISTORY_SIZE) {
            let size: i64 = size.trim().parse().map_err(|_| {
                HistoryError::InvalidArgument(format!(
                    "{ENV_HISTORY_SIZE} is not a number: {size}"
                ))
            })?;
            config = config.with_signed_capacity(size);
        }
        if let Some(dir) = value(ENV_HISTORY_DIR) {
            config.directory = PathBuf::from(shellexpand::tilde(&dir).into_owned());
        }
        if let Some(file) = value(ENV_HISTORY_FILE) {
            config = config.with_path(PathBuf::from(shellexpand::tilde(&file).into_owned()));
        }
        if let Some(charset) = value(ENV_HISTORY_CHARSET) {
            config.encoding = charset.parse()?;
        }
        if let Some(days) = value(ENV_HISTORY_REMAIN_DAYS) {
            let days: u32 = days.trim().parse().map_err(|_| {
                HistoryError::InvalidArgument(format!(
                    "{ENV_HISTORY_REMAIN_DAYS} is not a number of days: {days}"
                ))
            })?;
            config.remaining = Duration::days(i64::from(days));
        }
        Ok(config)
    }

    /// Full path of the history file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Oldest timestamp that survives pruning at `now`.
    ///
    /// An age reaching past the earliest representable time keeps everything.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_sub_signed(self.remaining).unwrap_or(NaiveDateTime::MIN)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Negative capacities fall back to the default size.
    pub fn with_signed_capacity(self, capacity: i64) -> Self {
        self.with_capacity(capacity_or_default(capacity))
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Split a full file path into directory and file name.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(name) = path.file_name() {
            self.file_name = name.to_string_lossy().into_owned();
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.directory = parent.to_path_buf();
        }
        self
    }

    pub fn with_remaining(mut self, remaining: Duration) -> Self {
        self.remaining = remaining;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}
