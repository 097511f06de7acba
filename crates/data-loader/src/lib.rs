//! # Data Loader Crate
//!
//! Loads the TMDB 5000 movies and credits CSV files, joins them on title,
//! and produces the typed records the feature pipeline consumes.
//!
//! ## Main Components
//!
//! - **types**: Typed CSV rows and the post-merge record shapes
//! - **parser**: CSV parsing plus the title-keyed inner join and filtering
//! - **index**: [`DetailsIndex`] for serving-time metadata lookups
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, DetailsIndex};
//! use std::path::Path;
//!
//! let movies = parser::parse_movies(Path::new("data/tmdb_5000_movies.csv"))?;
//! let credits = parser::parse_credits(Path::new("data/tmdb_5000_credits.csv"))?;
//!
//! let merged = parser::merge_records(&movies, &credits);
//! let details = DetailsIndex::from_rows(&movies);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::DetailsIndex;
pub use types::{
    // Type aliases
    MovieId,
    // Row types
    MovieRow,
    CreditsRow,
    // Derived records
    MergedMovie,
    MovieDetails,
    // Embedded JSON shapes
    NamedEntity,
    CrewEntry,
};
