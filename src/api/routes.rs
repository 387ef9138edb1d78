use std::any::Any;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recommendations",
            get(handlers::get_recommendations).post(handlers::post_recommendations),
        )
        .route("/titles/resolve", get(handlers::resolve_title))
        .route("/catalog", get(handlers::catalog_summary))
        .nest("/tmdb", tmdb_routes())
}

/// TMDB proxy routes under /api/v1/tmdb
fn tmdb_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::tmdb_search))
        .route("/popular", get(handlers::tmdb_popular))
        .route("/trending", get(handlers::tmdb_trending))
        .route("/toprated", get(handlers::tmdb_top_rated))
        .route("/nowplaying", get(handlers::tmdb_now_playing))
        .route("/trailer/:id", get(handlers::tmdb_trailer))
}

/// Turns a panic inside a handler into the generic error body
fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal error" })),
    )
        .into_response()
}
