//! Common error types for ATP

use thiserror::Error;

/// Common result type for ATP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds raised by the core and its configuration layer
#[derive(Error, Debug)]
pub enum Error {
    /// Normalization left no non-empty rows
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Reconstruction recognized no timetable entries at all
    #[error("No timetable entries found: {0}")]
    NoEntriesFound(String),

    /// Attendance snapshot failed validation
    #[error("Invalid snapshot: {field} {reason}")]
    InvalidSnapshot {
        /// Wire name of the offending field
        field: &'static str,
        reason: String,
    },

    /// Invalid user input outside the snapshot (e.g. OCR confidence)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration reading, parsing or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Stable snake_case name of the error kind, for JSON responses
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyInput(_) => "empty_input",
            Error::NoEntriesFound(_) => "no_entries_found",
            Error::InvalidSnapshot { .. } => "invalid_snapshot",
            Error::InvalidInput(_) => "invalid_input",
            Error::Config(_) => "config",
        }
    }

    /// True for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput(_)
                | Error::NoEntriesFound(_)
                | Error::InvalidSnapshot { .. }
                | Error::InvalidInput(_)
        )
    }
}
