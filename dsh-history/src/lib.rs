//! Bounded command history with flat-file persistence.
//!
//! # Module Structure
//!
//! - [`codec`] - comma separated line encoding
//! - [`entry`] - timestamped history entry
//! - [`buffer`] - capacity-bounded, most-recent-first buffer
//! - [`store`] - buffer persisted to a text file
//! - [`keywords`] - load/prune/save sequences for interactive front ends

pub mod buffer;
pub mod codec;
pub mod config;
mod encoding;
pub mod entry;
mod error;
pub mod keywords;
pub mod store;

#[cfg(test)]
mod extra_tests;

/// Capacity used when none, or a negative one, is given.
pub const DEFAULT_HISTORY_SIZE: usize = 128;
/// History file name under the history directory.
pub const DEFAULT_HISTORY_FILE: &str = ".history";
/// Age after which entries are pruned on load.
pub const DEFAULT_REMAIN_DAYS: i64 = 30;

pub use crate::buffer::HistoryBuffer;
pub use crate::config::HistoryConfig;
pub use crate::encoding::Encoding;
pub use crate::entry::Entry;
pub use crate::error::{HistoryError, Result};
pub use crate::keywords::KeywordHistory;
pub use crate::store::PersistentHistoryStore;
