use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        CatalogSummary, Listing, PosterRecommendation, PosterRecommendationsBody, ResolvedTitle,
        TrailerBody,
    },
    services::providers::{self, LISTING_LIMIT},
};

use super::{
    extract::{AppJson, AppQuery},
    AppState,
};

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub query: Option<String>,
    pub top_n: Option<usize>,
}

/// JSON body for POST requests; `title` is any JSON value so non-text input
/// can be reported as invalid rather than rejected by the extractor
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

fn invalid_title() -> AppError {
    AppError::InvalidInput("Invalid movie title.".to_string())
}

fn tmdb_error(e: AppError) -> AppError {
    AppError::ExternalApi(format!("Error fetching data from TMDB: {}", e))
}

/// Runs CPU-bound recommender work off the async workers
async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        // Re-raised so the panic layer answers with the generic error body
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommendations for a title given as a query parameter
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppQuery(params): AppQuery<RecommendQuery>,
) -> AppResult<Json<PosterRecommendationsBody>> {
    let title = params.query.ok_or_else(invalid_title)?;
    recommend(&state, request_id, title, params.top_n).await
}

/// Recommendations for a title given in a JSON body
pub async fn post_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendRequest>,
) -> AppResult<Json<PosterRecommendationsBody>> {
    let title = match request.title {
        Some(Value::String(title)) => title,
        _ => return Err(invalid_title()),
    };
    recommend(&state, request_id, title, request.top_n).await
}

async fn recommend(
    state: &AppState,
    request_id: RequestId,
    title: String,
    top_n: Option<usize>,
) -> AppResult<Json<PosterRecommendationsBody>> {
    tracing::info!(
        request_id = %request_id,
        query = %title,
        top_n = ?top_n,
        "Processing recommendation request"
    );

    let recommender = Arc::clone(&state.recommender);
    let recommendations = run_blocking(move || recommender.recommend(&title, top_n)).await?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations computed"
    );

    let recommendations = match &state.movie_db {
        Some(provider) => providers::attach_posters(provider, recommendations).await,
        None => recommendations
            .into_iter()
            .map(PosterRecommendation::without_poster)
            .collect(),
    };

    Ok(Json(PosterRecommendationsBody { recommendations }))
}

/// Resolve a free-text title to its catalog entry
pub async fn resolve_title(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ResolveQuery>,
) -> AppResult<Json<ResolvedTitle>> {
    let query = params.q.ok_or_else(invalid_title)?;
    let recommender = Arc::clone(&state.recommender);
    let resolved = run_blocking(move || recommender.resolve(&query)).await?;
    Ok(Json(resolved))
}

/// Catalog size, backend and build time
pub async fn catalog_summary(State(state): State<AppState>) -> Json<CatalogSummary> {
    Json(state.recommender.summary())
}

// TMDB proxy

/// Multi search, passed through unmodified
pub async fn tmdb_search(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchQuery>,
) -> AppResult<Json<Value>> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Query parameter is required".to_string()))?;

    let provider = state.movie_db()?;
    let payload = provider.search(&query).await.map_err(tmdb_error)?;
    Ok(Json(payload))
}

async fn tmdb_listing(state: &AppState, listing: Listing) -> AppResult<Json<Value>> {
    let provider = state.movie_db()?;
    let payload = provider.listing(listing).await.map_err(tmdb_error)?;
    Ok(Json(providers::cap_results(payload, LISTING_LIMIT)))
}

pub async fn tmdb_popular(State(state): State<AppState>) -> AppResult<Json<Value>> {
    tmdb_listing(&state, Listing::Popular).await
}

pub async fn tmdb_trending(State(state): State<AppState>) -> AppResult<Json<Value>> {
    tmdb_listing(&state, Listing::Trending).await
}

pub async fn tmdb_top_rated(State(state): State<AppState>) -> AppResult<Json<Value>> {
    tmdb_listing(&state, Listing::TopRated).await
}

pub async fn tmdb_now_playing(State(state): State<AppState>) -> AppResult<Json<Value>> {
    tmdb_listing(&state, Listing::NowPlaying).await
}

/// YouTube trailer key for a movie or show id; always 200
pub async fn tmdb_trailer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TrailerBody> {
    match &state.movie_db {
        Some(provider) => Json(providers::find_trailer(provider.as_ref(), &id).await),
        None => Json(TrailerBody::missing("No trailer found")),
    }
}
