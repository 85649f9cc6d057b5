use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single input line could not be turned into a reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line did not carry both a timestamp and a count.
    #[error("expected 2 whitespace-separated tokens, found {found}")]
    MissingTokens { found: usize },

    /// The first token is not a `YYYY-MM-DDTHH:MM:SS` timestamp.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// The second token is not a non-negative integer.
    #[error("invalid vehicle count {0:?}")]
    InvalidCount(String),
}

/// All errors produced by the traffic monitor.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// The input source could not be opened.
    #[error("Input source unavailable {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already opened source failed part-way through.
    #[error("Failed to read {path} at line {line}: {source}")]
    SourceRead {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line of input was malformed. `line` is 1-based; 0 means the line
    /// was parsed on its own, outside of any source.
    #[error("Malformed reading at line {line} ({content:?}): {reason}")]
    Parse {
        line: usize,
        content: String,
        #[source]
        reason: ParseErrorKind,
    },

    /// A timestamp was seen twice while duplicates are being rejected.
    #[error("Duplicate interval timestamp: {timestamp}")]
    DuplicateTimestamp { timestamp: NaiveDateTime },

    /// Adding a reading's count would overflow a running total.
    #[error("Vehicle count overflow at {timestamp}")]
    CountOverflow { timestamp: NaiveDateTime },

    /// A report could not be serialised to JSON.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrafficError {
    /// Attach a 1-based line number to a parse error. Other variants pass
    /// through untouched.
    pub fn at_line(self, line_number: usize) -> Self {
        match self {
            TrafficError::Parse {
                content, reason, ..
            } => TrafficError::Parse {
                line: line_number,
                content,
                reason,
            },
            other => other,
        }
    }
}

/// Convenience alias used throughout the traffic crates.
pub type Result<T> = std::result::Result<T, TrafficError>;
