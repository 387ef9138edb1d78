use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Startup fetch error: {0}")]
    StartupFetch(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Catalog parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errors that can only arise while building the recommender and must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Data(_)
                | AppError::StartupFetch(_)
                | AppError::Csv(_)
                | AppError::Io(_)
                | AppError::HttpClient(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Data(_)
            | AppError::StartupFetch(_)
            | AppError::Csv(_)
            | AppError::Io(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Malformed request bodies answer with the same `{"error"}` shape as every other failure
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_errors_are_not_fatal() {
        assert!(!AppError::InvalidInput("Invalid movie title.".to_string()).is_fatal());
        assert!(!AppError::NotFound("'x' not found in dataset.".to_string()).is_fatal());
        assert!(!AppError::Internal("boom".to_string()).is_fatal());
    }

    #[test]
    fn test_build_errors_are_fatal() {
        assert!(AppError::Data("empty catalog".to_string()).is_fatal());
        assert!(AppError::StartupFetch("movies.csv".to_string()).is_fatal());
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::InvalidInput("Invalid movie title.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Data("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::ExternalApi("TMDB returned 500".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::Unavailable("TMDB is not configured".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_upstream_errors_are_not_fatal() {
        assert!(!AppError::ExternalApi("timeout".to_string()).is_fatal());
        assert!(!AppError::Unavailable("not configured".to_string()).is_fatal());
    }

    #[test]
    fn test_query_error_messages_are_bare() {
        let err = AppError::NotFound("'xyz' not found in dataset.".to_string());
        assert_eq!(err.to_string(), "'xyz' not found in dataset.");
    }
}
