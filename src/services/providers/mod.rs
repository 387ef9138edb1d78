/// Movie metadata provider abstraction
///
/// Recommendations come from the local catalog, but posters, trailers and the
/// browse lists (popular, trending, ...) come from an external movie database.
/// The HTTP layer talks to it only through `MovieDbProvider`.
use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::AppResult,
    models::{Listing, MediaKind, PosterRecommendation, Recommendation, TrailerBody, Video},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Browse lists are cut to this many results
pub const LISTING_LIMIT: usize = 12;

/// Trait for movie database providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieDbProvider: Send + Sync {
    /// Multi search (movies, shows, people); the payload is passed through as-is
    async fn search(&self, query: &str) -> AppResult<Value>;

    /// First page of a browse list
    async fn listing(&self, listing: Listing) -> AppResult<Value>;

    /// Poster path of a movie by its database id, `None` if it has none
    async fn poster_path(&self, movie_id: i64) -> AppResult<Option<String>>;

    /// Videos attached to a movie or show
    async fn videos(&self, kind: MediaKind, id: &str) -> AppResult<Vec<Video>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Truncates the `results` array of a list payload, keeping every other field
pub fn cap_results(mut payload: Value, limit: usize) -> Value {
    if let Some(results) = payload.get_mut("results").and_then(Value::as_array_mut) {
        results.truncate(limit);
    }
    payload
}

/// Looks up every poster in parallel. A failed lookup yields `poster_path: None`
/// and never fails the batch; order is preserved.
pub async fn attach_posters(
    provider: &Arc<dyn MovieDbProvider>,
    recommendations: Vec<Recommendation>,
) -> Vec<PosterRecommendation> {
    let mut tasks = Vec::with_capacity(recommendations.len());

    for recommendation in recommendations {
        let provider = Arc::clone(provider);
        let fallback = recommendation.clone();
        let task = tokio::spawn(async move {
            let poster_path = match provider.poster_path(recommendation.id).await {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        movie_id = recommendation.id,
                        error = %e,
                        "Poster lookup failed"
                    );
                    None
                }
            };
            PosterRecommendation {
                recommendation,
                poster_path,
            }
        });
        tasks.push((fallback, task));
    }

    let mut enriched = Vec::with_capacity(tasks.len());
    for (fallback, task) in tasks {
        match task.await {
            Ok(item) => enriched.push(item),
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                enriched.push(PosterRecommendation::without_poster(fallback));
            }
        }
    }
    enriched
}

/// Finds a YouTube trailer for `id`, trying it as a movie first and as a show
/// when the movie has no videos. Lookup failures count as "no videos".
pub async fn find_trailer(provider: &dyn MovieDbProvider, id: &str) -> TrailerBody {
    let mut videos = videos_or_empty(provider, MediaKind::Movie, id).await;
    if videos.is_empty() {
        videos = videos_or_empty(provider, MediaKind::Tv, id).await;
    }

    let trailer = videos
        .iter()
        .find(|v| v.is_youtube() && v.is_trailer())
        .or_else(|| videos.iter().find(|v| v.is_youtube()));

    match trailer {
        Some(video) => TrailerBody::found(video.key.clone()),
        None => TrailerBody::missing("No trailer available"),
    }
}

async fn videos_or_empty(provider: &dyn MovieDbProvider, kind: MediaKind, id: &str) -> Vec<Video> {
    match provider.videos(kind, id).await {
        Ok(videos) => videos,
        Err(e) => {
            tracing::debug!(id = %id, kind = kind.path(), error = %e, "Video lookup failed");
            Vec::new()
        }
    }
}
