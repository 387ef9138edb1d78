use std::borrow::Cow;

use crate::error::{AppError, AppResult};

use super::{cosine_similarity, l2_norm, FeatureVector, VectorSpace};

/// Dense vector space over externally produced embeddings.
///
/// No matrix is kept: a similarity row is computed when asked for, which costs
/// O(n * d) per query instead of O(n^2) memory.
pub struct EmbeddingSpace {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
}

impl EmbeddingSpace {
    pub fn new(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = match vectors.first() {
            Some(first) => first.len(),
            None => return Err(AppError::Data("embedding vectors are empty".to_string())),
        };

        if dimension == 0 {
            return Err(AppError::Data(
                "embedding vectors have zero dimensions".to_string(),
            ));
        }

        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(AppError::Data(format!(
                    "embedding row {} has {} dimensions, expected {}",
                    row,
                    vector.len(),
                    dimension
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(AppError::Data(format!(
                    "embedding row {} contains a non-finite value",
                    row
                )));
            }
        }

        let norms = vectors.iter().map(|v| l2_norm(v)).collect();

        tracing::info!(
            vectors = vectors.len(),
            dimension,
            "Loaded embedding vectors"
        );

        Ok(Self {
            dimension,
            vectors,
            norms,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl VectorSpace for EmbeddingSpace {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn vector_of(&self, index: usize) -> Option<FeatureVector<'_>> {
        self.vectors.get(index).map(|v| FeatureVector::Dense(v.as_slice()))
    }

    fn similarity_row(&self, index: usize) -> Option<Cow<'_, [f32]>> {
        let query = self.vectors.get(index)?;
        if self.norms[index] == 0.0 {
            return Some(Cow::Owned(vec![0.0; self.vectors.len()]));
        }

        let row = self
            .vectors
            .iter()
            .map(|other| cosine_similarity(query, other))
            .collect();
        Some(Cow::Owned(row))
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_source() {
        assert!(matches!(EmbeddingSpace::new(vec![]), Err(AppError::Data(_))));
    }

    #[test]
    fn test_rejects_ragged_vectors() {
        let result = EmbeddingSpace::new(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let result = EmbeddingSpace::new(vec![vec![1.0, f32::NAN]]);
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_similarity_row_on_demand() {
        let space = EmbeddingSpace::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();

        assert_eq!(space.dimension(), 3);
        assert!(space.full_matrix().is_none());

        let row = space.similarity_row(0).unwrap();
        assert_eq!(row.len(), 3);
        assert!((row[0] - 1.0).abs() < 1e-6);
        assert!(row[1] > row[2]);
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_out_of_range_index() {
        let space = EmbeddingSpace::new(vec![vec![1.0]]).unwrap();
        assert!(space.similarity_row(1).is_none());
        assert!(space.vector_of(1).is_none());
    }
}
