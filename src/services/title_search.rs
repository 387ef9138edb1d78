use crate::{
    error::{AppError, AppResult},
    models::Catalog,
    services::fuzzy,
};

pub const DEFAULT_MATCH_THRESHOLD: u8 = 60;

/// Result of resolving a free-text query against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleMatch {
    pub index: usize,
    pub score: u8,
}

/// Maps free-text queries to catalog rows.
///
/// Resolution is two-phase: the best fuzzy-scoring lowercase title *text* is
/// chosen first, then the first row carrying exactly that lowercase title wins.
/// Rows whose lowercase title repeats an earlier row are never returned.
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver {
    threshold: u8,
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl TitleResolver {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn resolve(&self, catalog: &Catalog, query: &str) -> AppResult<TitleMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Invalid movie title.".to_string()));
        }

        let query = query.to_lowercase();
        let not_found = || AppError::NotFound(format!("'{}' not found in dataset.", query));

        // Ties keep the earliest title
        let mut best: Option<(&str, u8)> = None;
        for title in catalog.lowercase_titles() {
            let score = fuzzy::weighted_ratio(&query, title);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((title.as_str(), score));
            }
            if score == 100 {
                break;
            }
        }

        let (matched, score) = best.ok_or_else(not_found)?;
        if score < self.threshold {
            tracing::info!(query = %query, best = %matched, score, "No title above threshold");
            return Err(not_found());
        }

        let index = catalog.position_of_lowercase(matched).ok_or_else(not_found)?;

        tracing::debug!(query = %query, matched = %matched, score, index, "Resolved title");

        Ok(TitleMatch { index, score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogItem;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| CatalogItem::new(i as i64 + 1, *t))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_query() {
        let resolver = TitleResolver::default();
        let catalog = catalog(&["Avatar"]);
        assert!(matches!(
            resolver.resolve(&catalog, ""),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            resolver.resolve(&catalog, "   "),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exact_match_scores_maximal() {
        let resolver = TitleResolver::default();
        let catalog = catalog(&["Avatar", "Avatar 2", "Titanic"]);

        let found = resolver.resolve(&catalog, "AVATAR").unwrap();
        assert_eq!(found, TitleMatch { index: 0, score: 100 });

        let found = resolver.resolve(&catalog, "titanic").unwrap();
        assert_eq!(found.index, 2);
        assert_eq!(found.score, 100);
    }

    #[test]
    fn test_typo_resolves() {
        let resolver = TitleResolver::default();
        let catalog = catalog(&["Avatar", "Titanic", "The Dark Knight"]);

        let found = resolver.resolve(&catalog, "dark knigth").unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_unrelated_query_not_found() {
        let resolver = TitleResolver::default();
        let catalog = catalog(&["Avatar", "Titanic"]);

        let err = resolver.resolve(&catalog, "xyzxyz123").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_duplicate_lowercase_titles_resolve_to_first_row() {
        let resolver = TitleResolver::default();
        let catalog = catalog(&["Alien", "Heat", "HEAT"]);

        let found = resolver.resolve(&catalog, "heat").unwrap();
        assert_eq!(found.index, 1);
    }

    #[test]
    fn test_threshold_is_respected() {
        let catalog = catalog(&["Avatar"]);
        assert!(TitleResolver::new(100).resolve(&catalog, "avatr").is_err());
        assert!(TitleResolver::new(50).resolve(&catalog, "avatr").is_ok());
    }
}
