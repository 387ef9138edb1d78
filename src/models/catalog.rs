use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Raw per-movie text metadata as it appears in the catalog source.
///
/// Every field is optional; a missing value is treated as an empty string
/// when features are composed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemMetadata {
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    /// Free-text tags the external embedding vectors were produced from
    #[serde(default)]
    pub tags: Option<String>,
}

/// A recommendable movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub metadata: ItemMetadata,
}

impl CatalogItem {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            metadata: ItemMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The fixed, ordered set of recommendable movies.
///
/// Row positions are stable for the lifetime of the catalog and line up with
/// the rows of whatever vector space was built from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    lowercase_titles: Vec<String>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> AppResult<Self> {
        if items.is_empty() {
            return Err(AppError::Data("catalog contains no rows".to_string()));
        }

        let lowercase_titles = items.iter().map(|item| item.title.to_lowercase()).collect();

        Ok(Self {
            items,
            lowercase_titles,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Titles lowercased once at construction, index-aligned with `items`
    pub fn lowercase_titles(&self) -> &[String] {
        &self.lowercase_titles
    }

    /// First row whose lowercase title equals `lowercase_title` exactly
    pub fn position_of_lowercase(&self, lowercase_title: &str) -> Option<usize> {
        self.lowercase_titles
            .iter()
            .position(|title| title == lowercase_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = Catalog::new(vec![]);
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_lowercase_titles_are_aligned() {
        let catalog = Catalog::new(vec![
            CatalogItem::new(1, "Avatar"),
            CatalogItem::new(2, "The Dark Knight"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lowercase_titles(), ["avatar", "the dark knight"]);
    }

    #[test]
    fn test_position_of_lowercase_prefers_first_row() {
        let catalog = Catalog::new(vec![
            CatalogItem::new(1, "Heat"),
            CatalogItem::new(2, "HEAT"),
            CatalogItem::new(3, "Alien"),
        ])
        .unwrap();

        assert_eq!(catalog.position_of_lowercase("heat"), Some(0));
        assert_eq!(catalog.position_of_lowercase("alien"), Some(2));
        assert_eq!(catalog.position_of_lowercase("aliens"), None);
    }
}
