use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the practice dashboard.
#[derive(Error, Debug)]
pub enum PracticeError {
    /// A required export file (history, stats, exercise progress) is absent.
    #[error("Required data file not found: {path}")]
    RequiredFileMissing { path: PathBuf },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required JSON document exists but is not valid JSON.
    #[error("Invalid JSON document {path}: {source}")]
    JsonDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required JSON document is valid JSON but not an array of records.
    #[error("Expected a JSON array of records in {path}, found {found}")]
    UnexpectedShape { path: PathBuf, found: String },

    /// A JSON value could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PracticeError {
    /// `true` for the conditions that make startup impossible.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            PracticeError::RequiredFileMissing { .. }
                | PracticeError::FileRead { .. }
                | PracticeError::JsonDocument { .. }
                | PracticeError::UnexpectedShape { .. }
        )
    }
}

/// Convenience alias used throughout the practice crates.
pub type Result<T> = std::result::Result<T, PracticeError>;
