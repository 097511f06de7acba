//! Title-keyed lookup of raw movie metadata for serving-time enrichment.

use crate::error::Result;
use crate::parser;
use crate::types::{MovieDetails, MovieRow};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Read-only index from exact title to the raw movies-file metadata.
///
/// Built once at startup and only read afterwards. Where a title appears on
/// several rows the first occurrence wins, matching the source dataset's
/// ordering.
#[derive(Debug, Default)]
pub struct DetailsIndex {
    by_title: HashMap<String, MovieDetails>,
}

impl DetailsIndex {
    /// Build the index from already-parsed movie rows.
    pub fn from_rows(rows: &[MovieRow]) -> Self {
        let mut by_title = HashMap::with_capacity(rows.len());
        for row in rows {
            by_title
                .entry(row.title.clone())
                .or_insert_with(|| MovieDetails::from(row));
        }
        Self { by_title }
    }

    /// Load the index straight from the movies CSV.
    pub fn load(path: &Path) -> Result<Self> {
        let rows = parser::parse_movies(path)?;
        let index = Self::from_rows(&rows);
        info!(titles = index.len(), "built details index");
        Ok(index)
    }

    /// Look up the raw metadata for an exact title.
    pub fn get(&self, title: &str) -> Option<&MovieDetails> {
        self.by_title.get(title)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}
