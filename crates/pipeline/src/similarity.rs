//! All-pairs cosine similarity over count vectors.
//!
//! The matrix is dense, square, symmetric, and computed once at build time;
//! serving only reads it. Entries live in `[0, 1]` because counts are
//! non-negative. A row whose vector is all zeros has no direction, so every
//! similarity involving it — including its own diagonal entry — is defined
//! as 0.0.

use rayon::prelude::*;
use tracing::info;

/// Dense row-major cosine similarity matrix with neighbor lookup.
///
/// Row index is catalog identity: the matrix is only meaningful alongside
/// the catalog it was built from, in the same order.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    rows: usize,
    matrix: Vec<f32>,
}

impl SimilarityIndex {
    /// Compute the matrix from per-row count vectors.
    ///
    /// Dot products and norms accumulate in f64 and the result is stored as
    /// f32. Rows are computed in parallel; symmetry falls out of the
    /// commutative accumulation rather than being patched up afterwards.
    pub fn from_vectors(vectors: &[Vec<u32>]) -> Self {
        let rows = vectors.len();
        let norms: Vec<f64> = vectors
            .par_iter()
            .map(|v| {
                v.iter()
                    .map(|&c| {
                        let c = f64::from(c);
                        c * c
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let norms_ref = &norms;
        let matrix: Vec<f32> = (0..rows)
            .into_par_iter()
            .flat_map_iter(move |i| {
                let norms = norms_ref;
                (0..rows).map(move |j| {
                    if norms[i] == 0.0 || norms[j] == 0.0 {
                        return 0.0;
                    }
                    if i == j {
                        return 1.0;
                    }
                    let dot: f64 = vectors[i]
                        .iter()
                        .zip(&vectors[j])
                        .map(|(&a, &b)| f64::from(a) * f64::from(b))
                        .sum();
                    (dot / (norms[i] * norms[j])) as f32
                })
            })
            .collect();

        info!(rows, "computed similarity matrix");
        Self { rows, matrix }
    }

    /// Number of rows (== columns == catalog size).
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Cosine similarity between two rows.
    pub fn similarity(&self, i: usize, j: usize) -> f32 {
        self.matrix[i * self.rows + j]
    }

    /// The `k` nearest rows to `row`, excluding `row` itself.
    ///
    /// Ordered by similarity descending; ties break toward the lower row
    /// index. Returns fewer than `k` entries when the catalog is smaller
    /// than `k + 1`.
    pub fn neighbors(&self, row: usize, k: usize) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = (0..self.rows)
            .filter(|&j| j != row)
            .map(|j| (j, self.similarity(row, j)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored.into_iter().map(|(j, _)| j).collect()
    }
}
