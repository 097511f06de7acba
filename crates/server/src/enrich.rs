//! Detail enricher: resolved titles to front-end detail records.
//!
//! Enrichment is best-effort per item. A title with no raw metadata row gets
//! a minimal fallback record; a genres column that fails to parse becomes
//! `"[]"`; a poster lookup that fails becomes the placeholder sentinel. No
//! failure here ever aborts the request or the other items in a batch.

use crate::poster::PosterProvider;
use data_loader::{DetailsIndex, MovieDetails, NamedEntity};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Wire shape consumed by the front-end. Field names and types are a stable
/// contract and must not change.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub overview: String,
    /// JSON array of genre names, serialized as a string (e.g. `["Action"]`)
    pub genres: String,
    pub release_date: String,
    pub vote_average: f64,
    /// Always null; retained for wire compatibility
    pub poster_path: Option<String>,
    /// Image URL, or the `"placeholder"` sentinel
    pub poster_url: String,
}

/// Looks up raw metadata and the external poster for one title at a time.
pub struct DetailEnricher {
    details: DetailsIndex,
    poster: Arc<dyn PosterProvider>,
}

impl DetailEnricher {
    pub fn new(details: DetailsIndex, poster: Arc<dyn PosterProvider>) -> Self {
        Self { details, poster }
    }

    /// Build the detail record for a resolved title.
    ///
    /// One external poster call per invocation; callers enriching a batch
    /// are expected to bound the batch size.
    pub async fn enrich(&self, title: &str) -> DetailRecord {
        match self.details.get(title) {
            Some(details) => self.from_details(details).await,
            None => {
                debug!(title, "no raw metadata row; using fallback record");
                let poster_url = self.poster.poster_url(title, None).await;
                DetailRecord {
                    title: title.to_string(),
                    overview: "No overview available".to_string(),
                    genres: "[]".to_string(),
                    release_date: "Unknown".to_string(),
                    vote_average: 0.0,
                    poster_path: None,
                    poster_url,
                }
            }
        }
    }

    async fn from_details(&self, details: &MovieDetails) -> DetailRecord {
        let poster_url = self
            .poster
            .poster_url(&details.title, details.release_date.as_deref())
            .await;
        DetailRecord {
            title: details.title.clone(),
            overview: details
                .overview
                .clone()
                .unwrap_or_else(|| "No overview available".to_string()),
            genres: genre_names_json(details.genres.as_deref()),
            release_date: details
                .release_date
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            vote_average: details.vote_average.unwrap_or(0.0),
            poster_path: None,
            poster_url,
        }
    }
}

/// Re-parse the raw genres column into a JSON array of plain names.
/// Any failure yields `"[]"` — parse errors never reach the caller.
fn genre_names_json(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "[]".to_string();
    };
    match serde_json::from_str::<Vec<NamedEntity>>(raw) {
        Ok(entries) => {
            let names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
            serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
        }
        Err(_) => "[]".to_string(),
    }
}
