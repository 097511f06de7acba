//! Build and persistence of the recommender model.
//!
//! The persisted artifact keeps the catalog (ids, titles, raw tag strings)
//! and the vocabulary cap; vocabulary and similarity matrix are rebuilt from
//! the tags at load time. Because fitting and the cosine computation are
//! fully deterministic, a reload reproduces the exact same model without
//! touching the source CSVs.

use crate::features::MovieRecord;
use crate::similarity::SimilarityIndex;
use crate::vectorizer::{CountVectorizer, Vocabulary, DEFAULT_MAX_FEATURES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// The loaded, read-only model: catalog plus derived vector-space artifacts.
///
/// Constructed once (at build time or from a loaded artifact) and shared
/// immutably with the serving layer. Reload means full rebuild-and-swap.
#[derive(Debug)]
pub struct RecommenderModel {
    catalog: Vec<MovieRecord>,
    vocabulary: Vocabulary,
    similarity: SimilarityIndex,
}

impl RecommenderModel {
    /// Vectorize the catalog and compute the similarity matrix.
    pub fn build(catalog: Vec<MovieRecord>, max_features: usize) -> Self {
        let corpus: Vec<&str> = catalog.iter().map(|m| m.tags.as_str()).collect();
        let vectorizer = CountVectorizer::new().with_max_features(max_features);
        let (vocabulary, vectors) = vectorizer.fit_transform(&corpus);
        let similarity = SimilarityIndex::from_vectors(&vectors);
        info!(
            movies = catalog.len(),
            vocabulary = vocabulary.len(),
            "built recommender model"
        );
        Self {
            catalog,
            vocabulary,
            similarity,
        }
    }

    /// Catalog entries in row order. Row index here is the identity used by
    /// [`Self::similarity`].
    pub fn catalog(&self) -> &[MovieRecord] {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }
}

/// Serialized form of the build output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogArtifact {
    pub max_features: usize,
    pub movies: Vec<MovieRecord>,
}

impl CatalogArtifact {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            movies,
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Write the artifact as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create artifact file {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("failed to serialize artifact to {}", path.display()))?;
        info!(movies = self.movies.len(), path = %path.display(), "saved artifact");
        Ok(())
    }

    /// Read an artifact back from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open artifact file {}", path.display()))?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to deserialize artifact from {}", path.display()))?;
        info!(movies = artifact.movies.len(), path = %path.display(), "loaded artifact");
        Ok(artifact)
    }

    /// Rebuild the full model from the persisted catalog.
    pub fn into_model(self) -> RecommenderModel {
        RecommenderModel::build(self.movies, self.max_features)
    }
}
