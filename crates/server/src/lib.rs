//! # Server Crate
//!
//! Serving layer for CineMatch: the [`RecommenderService`] facade that
//! answers recommendation and search queries over a built model, plus the
//! detail enrichment and external poster lookup it depends on.
//!
//! ## Architecture
//!
//! ```text
//! RecommenderService
//!   ├── RecommenderModel   (catalog + vocabulary + similarity, from pipeline)
//!   ├── title → row map    (exact-match resolution)
//!   └── DetailEnricher
//!         ├── DetailsIndex     (raw metadata, loaded once at startup)
//!         └── PosterProvider   (OMDb over HTTP, or a test stub)
//! ```

pub mod enrich;
pub mod error;
pub mod poster;
pub mod service;

pub use enrich::{DetailEnricher, DetailRecord};
pub use error::{Result, ServeError};
pub use poster::{OmdbPosterProvider, PosterProvider, DEFAULT_OMDB_API_KEY, POSTER_PLACEHOLDER};
pub use service::{
    RecommendResponse, RecommenderService, FALLBACK_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
    RECOMMEND_NEIGHBORS,
};
