mod catalog;
mod recommendation;
mod tmdb;

pub use catalog::{Catalog, CatalogItem, ItemMetadata};
pub use recommendation::{
    CatalogSummary, ErrorBody, PosterRecommendation, PosterRecommendationsBody, QueryResponse,
    Recommendation, RecommendationsBody, ResolvedTitle,
};
pub use tmdb::{Listing, MediaKind, TrailerBody, Video};
