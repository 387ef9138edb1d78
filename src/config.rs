use serde::Deserialize;

use crate::services::{providers::tmdb::DEFAULT_TMDB_API_URL, vector_space::Backend};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog CSV location (local path or http(s) URL)
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,

    /// Which vector space backs similarity
    #[serde(default)]
    pub backend: Backend,

    /// Precomputed embedding vectors (JSON), required by the embedding backend
    #[serde(default)]
    pub vectors_source: Option<String>,

    /// Number of recommendations returned when a request does not ask for a count
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Minimum fuzzy match score (0-100) for a query to resolve to a title
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// TMDB API key; without it posters are null and the TMDB routes answer 503
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,
}

fn default_catalog_source() -> String {
    "movies.csv".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_match_threshold() -> u8 {
    60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_tmdb_api_url() -> String {
    DEFAULT_TMDB_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_source: default_catalog_source(),
            backend: Backend::default(),
            vectors_source: None,
            top_n: default_top_n(),
            match_threshold: default_match_threshold(),
            host: default_host(),
            port: default_port(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.top_n == 0 {
            anyhow::bail!("TOP_N must be at least 1");
        }
        if self.match_threshold > 100 {
            anyhow::bail!(
                "MATCH_THRESHOLD is on a 0-100 scale, got {}",
                self.match_threshold
            );
        }
        if self.backend == Backend::Embedding && self.vectors_source.is_none() {
            anyhow::bail!("VECTORS_SOURCE is required when BACKEND=embedding");
        }
        Ok(())
    }

    /// The TMDB key, if one is set and non-blank
    pub fn tmdb_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
