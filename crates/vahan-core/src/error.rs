use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Vahan dashboard.
#[derive(Error, Debug)]
pub enum VahanError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer could not read or decode a row.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date string did not match any recognised format.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// A category label could not be mapped to 2W / 3W / 4W.
    #[error("Unknown vehicle category: {0}")]
    UnknownCategory(String),

    /// A row of the input table is malformed.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// A data-source name is not one of the recognised sources.
    #[error("Invalid data source: {0}")]
    InvalidSource(String),

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

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, VahanError>;
