//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and merging the source datasets.
///
/// Per-record problems (a row that fails to deserialize, a null field) are
/// handled by dropping or defaulting the record and are never surfaced
/// through this enum. These variants are reserved for failures that make the
/// whole build impossible: unreadable files and malformed headers.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader itself failed (broken framing, bad UTF-8, ...)
    #[error("CSV error in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from the header row. Fatal: the build
    /// cannot proceed without it.
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
