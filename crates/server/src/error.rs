//! Serving-time error taxonomy.

use thiserror::Error;

/// Errors a caller of [`crate::RecommenderService`] can see.
///
/// This is deliberately small: per-item problems (a missing detail row, a
/// failed poster lookup, a genre column that will not parse) are recovered
/// to defaults inside the enricher and never reach the caller. A query that
/// matches nothing is answered with an empty recommendation list, not an
/// error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ServeError {
    /// No catalog artifact is loaded; every operation fails with this until
    /// a rebuilt model is swapped in.
    #[error("Model not loaded")]
    ServiceUnavailable,

    /// The query was empty (or whitespace-only) after trimming.
    #[error("Query is required")]
    QueryRequired,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ServeError>;
