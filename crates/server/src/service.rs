//! # Recommender Service
//!
//! The explicit service object that owns all serving-time state: catalog,
//! similarity matrix, title lookup, and the detail enricher. Constructed
//! once at startup from a built model and shared read-only with request
//! handlers; reload means building a fresh service and swapping it in.
//!
//! Query resolution has two paths:
//! 1. **Exact-match path** — the trimmed query equals a catalog title
//!    (case-sensitive), so its row's nearest neighbors are returned.
//! 2. **Fallback search path** — no exact match; the catalog is scanned for
//!    substring/token hits and title matches are ranked first.

use crate::enrich::{DetailEnricher, DetailRecord};
use crate::error::{Result, ServeError};
use crate::poster::PosterProvider;
use data_loader::DetailsIndex;
use pipeline::RecommenderModel;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Neighbors returned for an exact title match.
pub const RECOMMEND_NEIGHBORS: usize = 6;
/// Cap on fallback search hits.
pub const FALLBACK_SEARCH_LIMIT: usize = 10;
/// Hard cap on `search` results; bounds per-request poster lookups.
pub const MAX_SEARCH_LIMIT: usize = 20;

/// Response for a recommendation query.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<DetailRecord>,
    /// `"keyword_search"` when the fallback path answered the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<&'static str>,
}

struct ServiceState {
    model: RecommenderModel,
    /// Exact (case-sensitive) title → catalog row; first row wins when a
    /// title repeats.
    title_to_row: HashMap<String, usize>,
    enricher: DetailEnricher,
}

/// Read-only serving facade over the built model.
pub struct RecommenderService {
    state: Option<ServiceState>,
}

impl RecommenderService {
    /// Create a loaded service.
    pub fn new(
        model: RecommenderModel,
        details: DetailsIndex,
        poster: Arc<dyn PosterProvider>,
    ) -> Self {
        let mut title_to_row = HashMap::with_capacity(model.catalog().len());
        for (row, movie) in model.catalog().iter().enumerate() {
            title_to_row.entry(movie.title.clone()).or_insert(row);
        }
        info!(movies = model.catalog().len(), "recommender service ready");
        Self {
            state: Some(ServiceState {
                model,
                title_to_row,
                enricher: DetailEnricher::new(details, poster),
            }),
        }
    }

    /// Create a service with no model loaded. Every operation answers
    /// [`ServeError::ServiceUnavailable`] until a rebuilt service replaces
    /// this one.
    pub fn unavailable() -> Self {
        Self { state: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> Result<&ServiceState> {
        self.state.as_ref().ok_or(ServeError::ServiceUnavailable)
    }

    /// All catalog titles in row order (search suggestions).
    pub fn list_titles(&self) -> Result<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .model
            .catalog()
            .iter()
            .map(|m| m.title.clone())
            .collect())
    }

    /// Recommend similar movies for a title or free-text query.
    #[instrument(skip(self))]
    pub async fn recommend(&self, query: &str) -> Result<RecommendResponse> {
        let state = self.state()?;
        let query = query.trim();
        if query.is_empty() {
            return Err(ServeError::QueryRequired);
        }

        // Exact-match path: case-sensitive, matching the original behavior
        // (the fallback below is case-insensitive; the asymmetry is kept
        // deliberately).
        if let Some(&row) = state.title_to_row.get(query) {
            let neighbor_rows = state.model.similarity().neighbors(row, RECOMMEND_NEIGHBORS);
            let mut recommendations = Vec::with_capacity(neighbor_rows.len());
            for neighbor in neighbor_rows {
                let title = &state.model.catalog()[neighbor].title;
                recommendations.push(state.enricher.enrich(title).await);
            }
            info!(query, results = recommendations.len(), "exact-match recommendation");
            return Ok(RecommendResponse {
                query: query.to_string(),
                recommendations,
                search_type: None,
            });
        }

        // Fallback search path
        let titles = self.fallback_titles(state, query);
        let mut recommendations = Vec::with_capacity(titles.len());
        for title in &titles {
            recommendations.push(state.enricher.enrich(title).await);
        }
        info!(query, results = recommendations.len(), "fallback keyword search");
        Ok(RecommendResponse {
            query: query.to_string(),
            recommendations,
            search_type: Some("keyword_search"),
        })
    }

    /// Scan the catalog for fallback matches.
    ///
    /// A record matches when the lowercased query is a substring of the
    /// lowercased title, a substring of the tag string, or equals one of the
    /// tag tokens. Collection stops at [`FALLBACK_SEARCH_LIMIT`]; the stable
    /// re-sort then moves title matches ahead of tag-only matches.
    fn fallback_titles(&self, state: &ServiceState, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        let mut hits: Vec<(bool, String)> = Vec::new();

        for movie in state.model.catalog() {
            let title_match = movie.title.to_lowercase().contains(&needle);
            // Tags are lowercased at build time
            let tag_match = movie.tags.contains(&needle)
                || movie.tags.split_whitespace().any(|token| token == needle);
            if title_match || tag_match {
                hits.push((title_match, movie.title.clone()));
                if hits.len() >= FALLBACK_SEARCH_LIMIT {
                    break;
                }
            }
        }

        hits.sort_by_key(|(title_match, _)| !*title_match);
        hits.into_iter().map(|(_, title)| title).collect()
    }

    /// Case-insensitive title-substring search, in catalog order.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<DetailRecord>> {
        let state = self.state()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit.min(MAX_SEARCH_LIMIT);
        let needle = query.to_lowercase();

        let mut results = Vec::new();
        for movie in state.model.catalog() {
            if movie.title.to_lowercase().contains(&needle) {
                results.push(state.enricher.enrich(&movie.title).await);
                if results.len() >= limit {
                    break;
                }
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poster::{PosterProvider, POSTER_PLACEHOLDER};
    use async_trait::async_trait;
    use data_loader::MovieRow;
    use pipeline::MovieRecord;

    // ========================================================================
    // Test Fixtures
    // ========================================================================

    /// Offline poster provider with deterministic output.
    struct MockPoster;

    #[async_trait]
    impl PosterProvider for MockPoster {
        async fn poster_url(&self, _title: &str, _release_date: Option<&str>) -> String {
            POSTER_PLACEHOLDER.to_string()
        }
    }

    fn record(id: u32, title: &str, tags: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            tags: tags.to_string(),
        }
    }

    fn detail_row(title: &str) -> MovieRow {
        MovieRow {
            id: 1,
            title: title.to_string(),
            overview: Some(format!("Overview of {title}")),
            genres: Some(r#"[{"id": 28, "name": "Action"}]"#.to_string()),
            keywords: None,
            release_date: Some("2009-01-01".to_string()),
            vote_average: Some(6.5),
        }
    }

    /// Eight movies sharing the "action" token so every row has six or more
    /// neighbors with positive similarity.
    fn test_catalog() -> Vec<MovieRecord> {
        vec![
            record(1, "Avatar", "pandora marine alien action space"),
            record(2, "Avatar: The Way of Water", "pandora ocean alien action space"),
            record(3, "Aliens", "alien marine space action colony"),
            record(4, "Titanic", "ship ocean romance disaster action"),
            record(5, "The Terminator", "robot future action machine"),
            record(6, "True Lies", "spy action comedy"),
            record(7, "Speed", "bus bomb action"),
            record(8, "Midnight in Paris", "writer paris romance nostalgia action"),
        ]
    }

    fn test_service() -> RecommenderService {
        let catalog = test_catalog();
        let rows: Vec<MovieRow> = catalog.iter().map(|m| detail_row(&m.title)).collect();
        let model = RecommenderModel::build(catalog, 5000);
        RecommenderService::new(model, DetailsIndex::from_rows(&rows), Arc::new(MockPoster))
    }

    // ========================================================================
    // recommend: exact-match path
    // ========================================================================

    #[tokio::test]
    async fn test_exact_match_returns_six_neighbors() {
        let service = test_service();
        let response = service.recommend("Avatar").await.unwrap();

        assert_eq!(response.query, "Avatar");
        assert_eq!(response.recommendations.len(), RECOMMEND_NEIGHBORS);
        assert!(response.search_type.is_none());
        assert!(response
            .recommendations
            .iter()
            .all(|r| r.title != "Avatar"));
    }

    #[tokio::test]
    async fn test_exact_match_ranks_most_similar_first() {
        let service = test_service();
        let response = service.recommend("Avatar").await.unwrap();
        // The sequel shares four of five tokens; nothing else comes close.
        assert_eq!(response.recommendations[0].title, "Avatar: The Way of Water");
    }

    #[tokio::test]
    async fn test_exact_match_is_case_sensitive() {
        let service = test_service();
        // Wrong case misses the exact path and falls back to keyword search
        let response = service.recommend("avatar").await.unwrap();
        assert_eq!(response.search_type, Some("keyword_search"));
    }

    #[tokio::test]
    async fn test_exact_match_small_catalog_returns_fewer() {
        let catalog = vec![
            record(1, "A", "action space"),
            record(2, "B", "action space"),
            record(3, "C", "action"),
        ];
        let rows: Vec<MovieRow> = catalog.iter().map(|m| detail_row(&m.title)).collect();
        let model = RecommenderModel::build(catalog, 5000);
        let service =
            RecommenderService::new(model, DetailsIndex::from_rows(&rows), Arc::new(MockPoster));

        let response = service.recommend("A").await.unwrap();
        assert_eq!(response.recommendations.len(), 2);
    }

    // ========================================================================
    // recommend: fallback search path
    // ========================================================================

    #[tokio::test]
    async fn test_fallback_title_matches_sort_before_tag_matches() {
        // "Alien" sits between two title matches in catalog order and only
        // matches on its tags; the title matches must still come out first.
        let catalog = vec![
            record(1, "Space Jam", "basketball cartoon"),
            record(2, "Alien", "space horror crew"),
            record(3, "Lost in Space", "family robot"),
        ];
        let rows: Vec<MovieRow> = catalog.iter().map(|m| detail_row(&m.title)).collect();
        let model = RecommenderModel::build(catalog, 5000);
        let service =
            RecommenderService::new(model, DetailsIndex::from_rows(&rows), Arc::new(MockPoster));

        let response = service.recommend("space").await.unwrap();
        let titles: Vec<&str> = response
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();

        assert_eq!(response.search_type, Some("keyword_search"));
        assert_eq!(titles, vec!["Space Jam", "Lost in Space", "Alien"]);
    }

    #[tokio::test]
    async fn test_fallback_finds_tag_only_matches() {
        let service = test_service();
        let response = service.recommend("pandora").await.unwrap();

        let titles: Vec<&str> = response
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert!(titles.contains(&"Avatar"));
        assert!(titles.contains(&"Avatar: The Way of Water"));
    }

    #[tokio::test]
    async fn test_fallback_caps_at_ten_in_catalog_order() {
        // Twelve movies all tagged "western": only the first ten can match.
        let catalog: Vec<MovieRecord> = (0..12)
            .map(|i| record(i, &format!("Movie {i}"), "western frontier"))
            .collect();
        let rows: Vec<MovieRow> = catalog.iter().map(|m| detail_row(&m.title)).collect();
        let model = RecommenderModel::build(catalog, 5000);
        let service =
            RecommenderService::new(model, DetailsIndex::from_rows(&rows), Arc::new(MockPoster));

        let response = service.recommend("western").await.unwrap();
        assert_eq!(response.recommendations.len(), FALLBACK_SEARCH_LIMIT);
        assert_eq!(response.recommendations[0].title, "Movie 0");
        assert_eq!(response.recommendations[9].title, "Movie 9");
    }

    #[tokio::test]
    async fn test_fallback_no_match_returns_empty_list() {
        let service = test_service();
        let response = service.recommend("zzzzzz").await.unwrap();
        assert!(response.recommendations.is_empty());
        assert_eq!(response.search_type, Some("keyword_search"));
    }

    // ========================================================================
    // recommend: error conditions
    // ========================================================================

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let service = test_service();
        assert_eq!(
            service.recommend("").await.unwrap_err(),
            ServeError::QueryRequired
        );
        assert_eq!(
            service.recommend("   \t ").await.unwrap_err(),
            ServeError::QueryRequired
        );
    }

    #[tokio::test]
    async fn test_unavailable_service_rejects_everything() {
        let service = RecommenderService::unavailable();
        assert!(!service.is_loaded());
        assert_eq!(
            service.list_titles().unwrap_err(),
            ServeError::ServiceUnavailable
        );
        assert_eq!(
            service.recommend("Avatar").await.unwrap_err(),
            ServeError::ServiceUnavailable
        );
        assert_eq!(
            service.search("Avatar", 5).await.unwrap_err(),
            ServeError::ServiceUnavailable
        );
    }

    // ========================================================================
    // search and list_titles
    // ========================================================================

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let service = test_service();
        let results = service.search("avatar", 20).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Avatar");
        assert_eq!(results[1].title, "Avatar: The Way of Water");
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_cap() {
        let catalog: Vec<MovieRecord> = (0..30)
            .map(|i| record(i, &format!("Western {i}"), "frontier"))
            .collect();
        let rows: Vec<MovieRow> = catalog.iter().map(|m| detail_row(&m.title)).collect();
        let model = RecommenderModel::build(catalog, 5000);
        let service =
            RecommenderService::new(model, DetailsIndex::from_rows(&rows), Arc::new(MockPoster));

        let results = service.search("Western", 5).await.unwrap();
        assert_eq!(results.len(), 5);

        // A limit above the cap is clamped to bound external lookups
        let results = service.search("Western", 100).await.unwrap();
        assert_eq!(results.len(), MAX_SEARCH_LIMIT);
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_empty() {
        let service = test_service();
        let results = service.search("  ", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_list_titles_in_row_order() {
        let service = test_service();
        let titles = service.list_titles().unwrap();
        assert_eq!(titles.len(), 8);
        assert_eq!(titles[0], "Avatar");
        assert_eq!(titles[7], "Midnight in Paris");
    }
}
