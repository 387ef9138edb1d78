/// Startup artifact sources
///
/// The catalog and vector artifacts may live on local disk or behind an HTTP
/// URL. Either way they are fetched once, fully into memory, before the
/// recommender is built.
use reqwest::Client as HttpClient;

use crate::error::{AppError, AppResult};

/// Something that can produce the raw bytes of a startup artifact
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch the complete artifact
    async fn fetch(&self) -> AppResult<Vec<u8>>;

    /// Human readable location for logs and error messages
    fn describe(&self) -> String;
}

/// Artifact stored on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: String,
}

impl LocalFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ArtifactSource for LocalFile {
    async fn fetch(&self) -> AppResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| AppError::StartupFetch(format!("{}: {}", self.path, e)))
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

/// Artifact downloaded over HTTP(S)
#[derive(Clone)]
pub struct RemoteArtifact {
    http_client: HttpClient,
    url: String,
}

impl RemoteArtifact {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ArtifactSource for RemoteArtifact {
    async fn fetch(&self) -> AppResult<Vec<u8>> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::StartupFetch(format!("{}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::StartupFetch(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        tracing::info!(url = %self.url, bytes = bytes.len(), "Downloaded artifact");
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Picks a source by location: `http://` and `https://` are remote, anything else is a path.
pub fn source_for(location: &str) -> Box<dyn ArtifactSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(RemoteArtifact::new(location))
    } else {
        Box::new(LocalFile::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_for_picks_by_scheme() {
        assert_eq!(
            source_for("https://example.com/movies.csv").describe(),
            "https://example.com/movies.csv"
        );
        assert_eq!(source_for("data/movies.csv").describe(), "data/movies.csv");
    }

    #[test]
    fn test_missing_local_file_is_startup_fetch_error() {
        let source = LocalFile::new("/definitely/not/here/movies.csv");
        let result = tokio_test::block_on(source.fetch());
        assert!(matches!(result, Err(AppError::StartupFetch(_))));
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_startup_fetch_error() {
        let source = RemoteArtifact::new("http://127.0.0.1:1/movies.csv");
        let result = source.fetch().await;
        assert!(matches!(result, Err(AppError::StartupFetch(_))));
    }
}
