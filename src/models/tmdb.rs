use serde::{Deserialize, Serialize};

/// One entry of a TMDB `/videos` listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site == "YouTube"
    }

    pub fn is_trailer(&self) -> bool {
        self.kind == "Trailer"
    }
}

/// `{"key": "..."}` when a trailer exists, `{"key": null, "message": "..."}` otherwise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailerBody {
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TrailerBody {
    pub fn found(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            message: None,
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: Some(message.into()),
        }
    }
}

/// TMDB lists proxied by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Popular,
    Trending,
    TopRated,
    NowPlaying,
}

impl Listing {
    /// Path below the TMDB API root
    pub fn path(&self) -> &'static str {
        match self {
            Listing::Popular => "movie/popular",
            Listing::Trending => "trending/all/day",
            Listing::TopRated => "movie/top_rated",
            Listing::NowPlaying => "movie/now_playing",
        }
    }
}

/// Where a TMDB id is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}
