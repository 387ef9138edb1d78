/// TMDB (The Movie Database) API provider
///
/// Catalog ids are TMDB movie ids, so posters are fetched straight from
/// `/movie/{id}`. Every request carries the key as the `api_key` query parameter.
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Listing, MediaKind, Video},
    services::providers::MovieDbProvider,
};

pub const DEFAULT_TMDB_API_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.url(path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path = %path, status = %status, "TMDB request failed");
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[derive(Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

#[derive(Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

#[async_trait::async_trait]
impl MovieDbProvider for TmdbClient {
    async fn search(&self, query: &str) -> AppResult<Value> {
        tracing::info!(query = %query, "TMDB multi search");
        self.get_json("search/multi", &[("query", query)]).await
    }

    async fn listing(&self, listing: Listing) -> AppResult<Value> {
        self.get_json(listing.path(), &[("page", "1")]).await
    }

    async fn poster_path(&self, movie_id: i64) -> AppResult<Option<String>> {
        let details: MovieDetails = self.get_json(&format!("movie/{}", movie_id), &[]).await?;
        Ok(details.poster_path.filter(|path| !path.is_empty()))
    }

    async fn videos(&self, kind: MediaKind, id: &str) -> AppResult<Vec<Video>> {
        let response: VideosResponse = self
            .get_json(&format!("{}/{}/videos", kind.path(), id), &[])
            .await?;
        Ok(response.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
