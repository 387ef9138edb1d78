/// Vector space abstraction
///
/// Both backends expose the same contract: per-item vectors and a cosine
/// similarity row for any item. The lexical backend precomputes the full
/// matrix at build time; the embedding backend computes rows on demand.
use std::borrow::Cow;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod embedding;
pub mod lexical;
mod stop_words;

pub use embedding::EmbeddingSpace;
pub use lexical::{LexicalSpace, SimilarityMatrix};

/// Selects which vector space implementation backs similarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// TF-IDF over unigrams and bigrams of the composite metadata text
    #[default]
    Lexical,
    /// Externally produced dense vectors
    Embedding,
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Lexical => write!(f, "lexical"),
            Backend::Embedding => write!(f, "embedding"),
        }
    }
}

/// Sparse vector as `(dimension, weight)` pairs sorted by dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(u32, f32)>,
}

impl SparseVector {
    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Merge-join dot product; both sides must be sorted by dimension
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Borrowed view of one item's feature vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureVector<'a> {
    Sparse(&'a SparseVector),
    Dense(&'a [f32]),
}

/// Per-item vectors and cosine similarity over an immutable catalog.
///
/// Row `i` always corresponds to catalog row `i`.
pub trait VectorSpace: Send + Sync {
    /// Number of item vectors
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feature vector of the item at `index`
    fn vector_of(&self, index: usize) -> Option<FeatureVector<'_>>;

    /// Cosine similarity of the item at `index` against every item, self included
    fn similarity_row(&self, index: usize) -> Option<Cow<'_, [f32]>>;

    /// The precomputed item x item matrix, if this backend keeps one
    fn full_matrix(&self) -> Option<&SimilarityMatrix> {
        None
    }

    /// Backend name for logging and diagnostics
    fn name(&self) -> &'static str;
}

/// `dot(u, v) / (|u| * |v|)`, or 0.0 when either vector has zero length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_sparse_dot_merges_on_dimension() {
        let a = SparseVector {
            entries: vec![(0, 1.0), (3, 2.0), (7, 1.0)],
        };
        let b = SparseVector {
            entries: vec![(3, 4.0), (5, 9.0), (7, 0.5)],
        };
        assert_eq!(a.dot(&b), 8.5);
        assert_eq!(a.norm(), 6.0_f32.sqrt());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Lexical.to_string(), "lexical");
        assert_eq!(Backend::Embedding.to_string(), "embedding");
    }
}
