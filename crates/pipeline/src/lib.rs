//! Offline feature-construction and similarity pipeline.
//!
//! This crate turns merged movie records into the read-only model the
//! serving layer queries:
//!
//! 1. **features**: per-movie metadata → normalized tag string
//! 2. **vectorizer**: tag corpus → vocabulary + count vectors
//! 3. **similarity**: count vectors → dense cosine matrix + neighbor lookup
//! 4. **model**: ties the stages together and persists the artifact
//!
//! The whole build is a one-shot batch job with no randomness: the same
//! source data always yields the same vocabulary and the same matrix.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{features, CatalogArtifact, RecommenderModel};
//!
//! let catalog = features::build_catalog(&merged_records);
//! CatalogArtifact::new(catalog.clone()).save(path)?;
//!
//! let model = RecommenderModel::build(catalog, 5000);
//! let neighbors = model.similarity().neighbors(0, 6);
//! ```

pub mod features;
pub mod stopwords;
pub mod vectorizer;
pub mod similarity;
pub mod model;

// Re-export main types
pub use features::MovieRecord;
pub use model::{CatalogArtifact, RecommenderModel};
pub use similarity::SimilarityIndex;
pub use vectorizer::{CountVectorizer, Vocabulary, DEFAULT_MAX_FEATURES};
