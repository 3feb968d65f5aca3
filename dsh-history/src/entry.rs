//! Entry structure for command history.
//!
//! Represents a single command together with the local time it was recorded.

use crate::codec;
use crate::error::{HistoryError, Result};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Timestamp text written to the history file.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Accepted on read only; seconds omitted.
const TIMESTAMP_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// A single command history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entry {
    /// The command text.
    text: String,
    /// Local time when the command was recorded.
    timestamp: NaiveDateTime,
}

impl Entry {
    /// Create an entry stamped with the current local time.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::with_timestamp(text, Local::now().naive_local())
    }

    /// Create an entry with an explicit timestamp.
    pub fn with_timestamp(text: impl Into<String>, timestamp: NaiveDateTime) -> Result<Self> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(HistoryError::InvalidArgument(format!(
                "history entry must be a single line: {text:?}"
            )));
        }
        Ok(Entry { text, timestamp })
    }

    /// Decode an entry from a `timestamp,command` line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = codec::decode(line)?;
        if fields.len() != 2 {
            return Err(HistoryError::malformed(format!(
                "expected 2 fields, found {}",
                fields.len()
            )));
        }
        let text = fields.pop().unwrap_or_default();
        let timestamp = parse_timestamp(&fields[0])?;
        Self::with_timestamp(text, timestamp)
            .map_err(|err| HistoryError::malformed(err.to_string()))
    }

    /// Encode this entry as a `timestamp,command` line.
    pub fn format(&self) -> String {
        codec::encode(&[format_timestamp(&self.timestamp), self.text.clone()])
    }

    /// The recorded command text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Local time the command was recorded.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Entry {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self> {
        Entry::parse(s)
    }
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT_MINUTES))
        .map_err(|err| HistoryError::malformed(format!("invalid timestamp {text:?}: {err}")))
}
