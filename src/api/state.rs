use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::{MovieDbProvider, Recommender},
};

/// Shared application state
///
/// The recommender is immutable after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    /// Poster, trailer and browse-list source; absent when no API key is configured
    pub movie_db: Option<Arc<dyn MovieDbProvider>>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
            movie_db: None,
        }
    }

    pub fn with_movie_db(mut self, provider: Arc<dyn MovieDbProvider>) -> Self {
        self.movie_db = Some(provider);
        self
    }

    /// The provider, or the error the TMDB routes answer with when there is none
    pub fn movie_db(&self) -> AppResult<&Arc<dyn MovieDbProvider>> {
        self.movie_db
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("TMDB is not configured".to_string()))
    }
}
