use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogItem, CatalogSummary, QueryResponse, Recommendation, ResolvedTitle},
    services::{
        features,
        ranking::{self, DEFAULT_TOP_N},
        title_search::TitleResolver,
        vector_space::{EmbeddingSpace, LexicalSpace, VectorSpace},
    },
};

/// Vector source handed to the build phase
#[derive(Debug, Clone)]
pub enum VectorSource {
    /// Derive TF-IDF vectors from the catalog's text metadata
    Lexical,
    /// Precomputed dense vectors, one per catalog row, in catalog order
    Embedding(Vec<Vec<f32>>),
}

/// Content-based recommender built once at startup.
///
/// Holds the catalog, its vector space and the title resolver. Nothing here is
/// mutated after `build`, so a shared reference serves any number of readers.
pub struct Recommender {
    catalog: Catalog,
    space: Box<dyn VectorSpace>,
    resolver: TitleResolver,
    default_top_n: usize,
    built_at: DateTime<Utc>,
}

impl Recommender {
    /// Deduplicates titles, builds the vector space and checks row alignment.
    ///
    /// Duplicate titles (case-sensitive) keep their first row for both backends;
    /// for embeddings the dropped rows' vectors are dropped as well.
    pub fn build(
        items: Vec<CatalogItem>,
        source: VectorSource,
        resolver: TitleResolver,
    ) -> AppResult<Self> {
        if items.is_empty() {
            return Err(AppError::Data("catalog contains no rows".to_string()));
        }

        if let VectorSource::Embedding(vectors) = &source {
            if vectors.len() != items.len() {
                return Err(AppError::Data(format!(
                    "vector count {} does not match catalog length {}",
                    vectors.len(),
                    items.len()
                )));
            }
        }

        let total = items.len();
        let (items, kept) = features::dedup_by_title(items);
        if items.len() < total {
            tracing::info!(
                dropped = total - items.len(),
                kept = items.len(),
                "Dropped rows with duplicate titles"
            );
        }

        let space: Box<dyn VectorSpace> = match source {
            VectorSource::Lexical => {
                let corpus = features::compose_corpus(&items);
                Box::new(LexicalSpace::fit(&corpus)?)
            }
            VectorSource::Embedding(mut vectors) => {
                if kept.len() < vectors.len() {
                    let aligned: Vec<Vec<f32>> = kept
                        .iter()
                        .map(|&position| std::mem::take(&mut vectors[position]))
                        .collect();
                    vectors = aligned;
                }
                Box::new(EmbeddingSpace::new(vectors)?)
            }
        };

        let catalog = Catalog::new(items)?;
        if space.len() != catalog.len() {
            return Err(AppError::Data(format!(
                "vector count {} does not match catalog length {}",
                space.len(),
                catalog.len()
            )));
        }

        tracing::info!(
            items = catalog.len(),
            backend = space.name(),
            threshold = resolver.threshold(),
            "Recommender ready"
        );

        Ok(Self {
            catalog,
            space,
            resolver,
            default_top_n: DEFAULT_TOP_N,
            built_at: Utc::now(),
        })
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn space(&self) -> &dyn VectorSpace {
        self.space.as_ref()
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            items: self.catalog.len(),
            backend: self.space.name().to_string(),
            built_at: self.built_at,
        }
    }

    /// Resolves a free-text title to its catalog entry
    pub fn resolve(&self, query: &str) -> AppResult<ResolvedTitle> {
        let found = self.resolver.resolve(&self.catalog, query)?;
        let item = self.catalog.get(found.index).ok_or_else(|| {
            AppError::Internal(format!("resolved index {} is out of range", found.index))
        })?;

        Ok(ResolvedTitle {
            index: found.index,
            id: item.id,
            title: item.title.clone(),
            score: found.score,
        })
    }

    /// Movies most similar to the one `query` resolves to.
    ///
    /// `top_n` falls back to the configured default; zero is rejected.
    pub fn recommend(&self, query: &str, top_n: Option<usize>) -> AppResult<Vec<Recommendation>> {
        let top_n = top_n.unwrap_or(self.default_top_n);
        if top_n == 0 {
            return Err(AppError::InvalidInput(
                "top_n must be a positive integer".to_string(),
            ));
        }

        let found = self.resolver.resolve(&self.catalog, query)?;
        let row = self.space.similarity_row(found.index).ok_or_else(|| {
            AppError::Internal(format!("no similarity row for index {}", found.index))
        })?;

        Ok(ranking::rank(&self.catalog, found.index, &row, top_n))
    }

    /// Runs one request to completion and always produces a result object.
    ///
    /// Query errors become `{"error": ...}`; a panic inside the query is caught
    /// here so a long-running session keeps serving.
    pub fn respond(&self, query: &str, top_n: Option<usize>) -> QueryResponse {
        match catch_unwind(AssertUnwindSafe(|| self.recommend(query, top_n))) {
            Ok(result) => QueryResponse::from(result),
            Err(_) => {
                tracing::error!(query = %query, "Recommendation panicked");
                QueryResponse::error("Internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemMetadata;

    fn movie(id: i64, title: &str, genres: &str, director: &str, keywords: &str) -> CatalogItem {
        CatalogItem::new(id, title).with_metadata(ItemMetadata {
            genres: Some(genres.to_string()),
            keywords: Some(keywords.to_string()),
            director: Some(director.to_string()),
            ..Default::default()
        })
    }

    fn sample_items() -> Vec<CatalogItem> {
        vec![
            movie(1, "Avatar", "Action Adventure", "James Cameron", "alien planet marine"),
            movie(2, "Avatar 2", "Action Adventure", "James Cameron", "alien planet ocean"),
            movie(3, "Titanic", "Drama Romance", "James Cameron", "ship iceberg love"),
        ]
    }

    fn lexical() -> Recommender {
        Recommender::build(sample_items(), VectorSource::Lexical, TitleResolver::default())
            .unwrap()
    }

    #[test]
    fn test_sequel_is_top_recommendation() {
        let recommender = lexical();
        assert_eq!(recommender.resolve("avatar").unwrap().id, 1);

        let recs = recommender.recommend("avatar", Some(1)).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, 2);
    }

    #[test]
    fn test_top_n_larger_than_catalog() {
        let recs = lexical().recommend("avatar", Some(5)).unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.id != 1));
        assert!(recs[0].similarity >= recs[1].similarity);
    }

    #[test]
    fn test_zero_top_n_is_invalid() {
        assert!(matches!(
            lexical().recommend("avatar", Some(0)),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_title_responds_with_error() {
        let response = lexical().respond("xyzxyz123", None);
        match response {
            QueryResponse::Error(body) => assert!(body.error.contains("not found")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_item_catalog_recommends_nothing() {
        let recommender = Recommender::build(
            vec![movie(7, "Heat", "Crime", "Michael Mann", "heist")],
            VectorSource::Lexical,
            TitleResolver::default(),
        )
        .unwrap();

        assert!(recommender.recommend("heat", None).unwrap().is_empty());
    }

    #[test]
    fn test_empty_catalog_is_data_error() {
        let result = Recommender::build(vec![], VectorSource::Lexical, TitleResolver::default());
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_vector_count_mismatch_is_data_error() {
        let result = Recommender::build(
            sample_items(),
            VectorSource::Embedding(vec![vec![1.0, 0.0]; 2]),
            TitleResolver::default(),
        );
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_embedding_backend_drops_duplicate_rows_with_their_vectors() {
        let mut items = sample_items();
        items.push(CatalogItem::new(4, "Avatar"));
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ];

        let recommender = Recommender::build(
            items,
            VectorSource::Embedding(vectors),
            TitleResolver::default(),
        )
        .unwrap();

        assert_eq!(recommender.catalog().len(), 3);
        assert_eq!(recommender.space().len(), 3);
        assert_eq!(recommender.summary().backend, "embedding");

        let recs = recommender.recommend("Avatar", None).unwrap();
        let ids: Vec<i64> = recs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_orthogonal_embeddings_keep_catalog_order() {
        let recommender = Recommender::build(
            sample_items(),
            VectorSource::Embedding(vec![vec![-1.0, 0.0], vec![0.0, -1.0], vec![0.0, 1.0]]),
            TitleResolver::default(),
        )
        .unwrap();

        // Row for Avatar is [1.0, -0.0, 0.0]
        let recs = recommender.recommend("Avatar", Some(2)).unwrap();
        let ids: Vec<i64> = recs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(recs.iter().all(|r| r.similarity == 0.0 && r.similarity.is_sign_positive()));
    }

    #[test]
    fn test_default_top_n_is_used() {
        let recommender = lexical().with_default_top_n(1);
        assert_eq!(recommender.recommend("titanic", None).unwrap().len(), 1);
    }
}
