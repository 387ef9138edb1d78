use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, ItemMetadata},
    services::vector_space::Backend,
};

const REQUIRED_COLUMNS: [&str; 2] = ["id", "title"];
const LEXICAL_COLUMNS: [&str; 5] = ["genres", "keywords", "cast", "director", "tagline"];
const EMBEDDING_COLUMNS: [&str; 1] = ["tags"];

/// One CSV row; unknown columns are ignored and absent optional columns read as empty
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: String,
    title: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
    #[serde(default)]
    cast: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

impl CatalogRecord {
    fn metadata(&mut self) -> ItemMetadata {
        ItemMetadata {
            genres: self.genres.take(),
            keywords: self.keywords.take(),
            cast: self.cast.take(),
            director: self.director.take(),
            tagline: self.tagline.take(),
            tags: self.tags.take(),
        }
    }
}

/// Columns a catalog must carry for the given backend
pub fn required_columns(backend: Backend) -> Vec<&'static str> {
    let extra: &[&str] = match backend {
        Backend::Lexical => &LEXICAL_COLUMNS,
        Backend::Embedding => &EMBEDDING_COLUMNS,
    };
    REQUIRED_COLUMNS.iter().chain(extra).copied().collect()
}

/// Parses a CSV catalog, validating its header for `backend` before reading rows.
pub fn parse_catalog(bytes: &[u8], backend: Backend) -> AppResult<Vec<CatalogItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = required_columns(backend)
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Data(format!(
            "catalog is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut items = Vec::new();
    for (row, record) in reader.deserialize::<CatalogRecord>().enumerate() {
        let mut record = record?;
        let line = row + 2;

        let id = record.id.trim().parse::<i64>().map_err(|_| {
            AppError::Data(format!("row {}: id '{}' is not an integer", line, record.id))
        })?;
        let title = record
            .title
            .take()
            .ok_or_else(|| AppError::Data(format!("row {}: title is empty", line)))?;

        let metadata = record.metadata();
        items.push(CatalogItem {
            id,
            title,
            metadata,
        });
    }

    if items.is_empty() {
        return Err(AppError::Data("catalog contains no rows".to_string()));
    }

    Ok(items)
}
