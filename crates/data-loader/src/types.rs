//! Core domain types for the TMDB catalog build.
//!
//! Two CSV files feed the build: a movies table (overview, genres, keywords,
//! release date, vote average) and a credits table (cast, crew). Both carry a
//! `title` column, which is the join key. The structured columns (genres,
//! keywords, cast, crew) hold JSON-encoded lists of objects as strings; they
//! stay raw at this layer and are decoded by the feature builder.

use serde::Deserialize;

/// Unique identifier for a movie in the TMDB dataset
pub type MovieId = u32;

/// One row of the movies CSV.
///
/// Every metadata field is optional: an empty CSV cell deserializes to
/// `None`, and rows with missing required fields are dropped during the
/// merge rather than failing the build.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRow {
    pub id: MovieId,
    pub title: String,
    pub overview: Option<String>,
    /// Raw JSON list of `{id, name}` objects
    pub genres: Option<String>,
    /// Raw JSON list of `{id, name}` objects
    pub keywords: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

/// One row of the credits CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsRow {
    pub movie_id: MovieId,
    pub title: String,
    /// Raw JSON list of cast objects (ordered by billing)
    pub cast: Option<String>,
    /// Raw JSON list of crew objects with a `job` field
    pub crew: Option<String>,
}

/// A movie record after the inner join on title and the null/duplicate
/// filtering pass. All required fields are present; the structured columns
/// are still raw JSON strings.
///
/// Derives `Eq` and `Hash` so exact duplicates produced by the join can be
/// dropped with a set, the same way the source tables are deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergedMovie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

/// An entry in a JSON list column that only contributes its `name`
/// (genres, keywords, cast).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

/// An entry in the crew list column. Only the director is extracted, so the
/// `job` field is needed alongside the name.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewEntry {
    pub name: String,
    pub job: String,
}

/// Raw per-title metadata kept around for serving-time enrichment.
///
/// Unlike [`MergedMovie`], nothing here is required: a movie with a null
/// overview still gets enriched, just with defaults.
#[derive(Debug, Clone)]
pub struct MovieDetails {
    pub title: String,
    pub overview: Option<String>,
    /// Raw JSON list of `{id, name}` objects, re-parsed by the enricher
    pub genres: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

impl From<&MovieRow> for MovieDetails {
    fn from(row: &MovieRow) -> Self {
        Self {
            title: row.title.clone(),
            overview: row.overview.clone(),
            genres: row.genres.clone(),
            release_date: row.release_date.clone(),
            vote_average: row.vote_average,
        }
    }
}
