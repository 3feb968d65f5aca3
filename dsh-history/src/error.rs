use std::path::PathBuf;
use thiserror::Error;

/// History specific error types
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", malformed_message(.line, .reason))]
    MalformedLine { line: Option<usize>, reason: String },

    #[error("History file operation failed on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn malformed_message(line: &Option<usize>, reason: &str) -> String {
    match line {
        Some(n) => format!("Malformed history line {n}: {reason}"),
        None => format!("Malformed history line: {reason}"),
    }
}

impl HistoryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        HistoryError::MalformedLine {
            line: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HistoryError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a 1-based line number to a malformed line error.
    pub(crate) fn at_line(self, number: usize) -> Self {
        match self {
            HistoryError::MalformedLine { reason, .. } => HistoryError::MalformedLine {
                line: Some(number),
                reason,
            },
            other => other,
        }
    }

    /// Whether this error reports an undecodable history line.
    pub fn is_malformed(&self) -> bool {
        matches!(self, HistoryError::MalformedLine { .. })
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
