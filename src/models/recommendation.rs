use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// A single ranked recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub title: String,
    /// Cosine similarity to the queried movie, rounded to 4 decimal places
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationsBody {
    pub recommendations: Vec<Recommendation>,
}

/// A recommendation as served over HTTP, with its TMDB poster.
///
/// `poster_path` is always present on the wire and is `null` when the lookup
/// failed or no TMDB key is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub poster_path: Option<String>,
}

impl PosterRecommendation {
    pub fn without_poster(recommendation: Recommendation) -> Self {
        Self {
            recommendation,
            poster_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterRecommendationsBody {
    pub recommendations: Vec<PosterRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// One structured result object per request: either recommendations or an error.
///
/// Serializes untagged, so the wire shape is exactly
/// `{"recommendations": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryResponse {
    Recommendations(RecommendationsBody),
    Error(ErrorBody),
}

impl QueryResponse {
    pub fn error(message: impl Into<String>) -> Self {
        QueryResponse::Error(ErrorBody {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResponse::Error(_))
    }
}

impl From<AppResult<Vec<Recommendation>>> for QueryResponse {
    fn from(result: AppResult<Vec<Recommendation>>) -> Self {
        match result {
            Ok(recommendations) => {
                QueryResponse::Recommendations(RecommendationsBody { recommendations })
            }
            Err(e) => QueryResponse::error(e.to_string()),
        }
    }
}

/// The catalog entry a free-text query resolved to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedTitle {
    pub index: usize,
    pub id: i64,
    pub title: String,
    /// Fuzzy match score on a 0-100 scale
    pub score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub items: usize,
    pub backend: String,
    pub built_at: DateTime<Utc>,
}
