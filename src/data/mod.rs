pub mod artifact;
pub mod catalog;
pub mod vectors;

use std::time::Instant;

pub use artifact::{source_for, ArtifactSource, LocalFile, RemoteArtifact};
pub use catalog::parse_catalog;
pub use vectors::parse_vectors;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{vector_space::Backend, Recommender, TitleResolver, VectorSource},
};

/// Fetches the catalog (and vectors, for the embedding backend) and builds the recommender.
///
/// This is the only blocking phase; any error here is fatal for the process.
pub async fn build_recommender(config: &Config) -> AppResult<Recommender> {
    let catalog_source = source_for(&config.catalog_source);
    let vectors_source = match config.backend {
        Backend::Lexical => None,
        Backend::Embedding => {
            let location = config.vectors_source.as_deref().ok_or_else(|| {
                AppError::StartupFetch("no vector source configured".to_string())
            })?;
            Some(source_for(location))
        }
    };

    let recommender = build_from_sources(
        catalog_source.as_ref(),
        vectors_source.as_deref(),
        config.backend,
        TitleResolver::new(config.match_threshold),
    )
    .await?;

    Ok(recommender.with_default_top_n(config.top_n))
}

/// Builds a recommender from already chosen artifact sources
pub async fn build_from_sources(
    catalog_source: &dyn ArtifactSource,
    vectors_source: Option<&dyn ArtifactSource>,
    backend: Backend,
    resolver: TitleResolver,
) -> AppResult<Recommender> {
    let start = Instant::now();

    let bytes = catalog_source.fetch().await?;
    let items = parse_catalog(&bytes, backend)?;
    tracing::info!(
        source = %catalog_source.describe(),
        rows = items.len(),
        "Loaded catalog"
    );

    let vectors = match (backend, vectors_source) {
        (Backend::Lexical, _) => VectorSource::Lexical,
        (Backend::Embedding, Some(source)) => {
            let bytes = source.fetch().await?;
            let vectors = parse_vectors(&bytes)?;
            tracing::info!(source = %source.describe(), rows = vectors.len(), "Loaded vectors");
            VectorSource::Embedding(vectors)
        }
        (Backend::Embedding, None) => {
            return Err(AppError::StartupFetch(
                "no vector source configured".to_string(),
            ))
        }
    };

    // Vectorization is CPU-bound; keep it off the async workers
    let recommender =
        tokio::task::spawn_blocking(move || Recommender::build(items, vectors, resolver))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Build phase complete"
    );

    Ok(recommender)
}
