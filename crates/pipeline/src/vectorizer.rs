//! Bag-of-words vectorizer over tag strings.
//!
//! Fitting is deterministic: tokens are ranked by corpus-wide frequency
//! (stop words excluded), ties broken by lexicographic order, and the top
//! `max_features` become the vocabulary. Transforming a document counts its
//! vocabulary tokens; out-of-vocabulary tokens are dropped silently.

use crate::stopwords::is_stop_word;
use std::collections::HashMap;
use tracing::debug;

/// Default vocabulary cap, matching the build's historical configuration.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Fixed token-to-column mapping, immutable after fitting.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Column index of a token, if it made the vocabulary.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Tokens in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Builds a [`Vocabulary`] from a corpus and maps documents to count vectors.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    max_features: usize,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }

    /// Set the maximum vocabulary size.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Learn the vocabulary from the corpus.
    ///
    /// Tokens are whitespace-delimited words of each document. Stop words
    /// never enter the vocabulary. Ranking is frequency descending, then
    /// token ascending, so identical corpora always produce identical
    /// vocabularies.
    pub fn fit<'a, I>(&self, corpus: I) -> Vocabulary
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut frequencies: HashMap<&str, u64> = HashMap::new();
        for document in corpus {
            for token in document.split_whitespace() {
                if !is_stop_word(token) {
                    *frequencies.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, u64)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        debug!(vocabulary = terms.len(), "fitted vocabulary");
        Vocabulary { index, terms }
    }

    /// Count vocabulary tokens in one document.
    pub fn transform(&self, vocabulary: &Vocabulary, document: &str) -> Vec<u32> {
        let mut counts = vec![0u32; vocabulary.len()];
        for token in document.split_whitespace() {
            if let Some(column) = vocabulary.index_of(token) {
                counts[column] += 1;
            }
        }
        counts
    }

    /// Fit on the corpus and transform every document, in order.
    pub fn fit_transform(&self, corpus: &[&str]) -> (Vocabulary, Vec<Vec<u32>>) {
        let vocabulary = self.fit(corpus.iter().copied());
        let vectors = corpus
            .iter()
            .map(|doc| self.transform(&vocabulary, doc))
            .collect();
        (vocabulary, vectors)
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
