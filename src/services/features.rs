use std::collections::HashSet;

use crate::models::{CatalogItem, ItemMetadata};

/// How many times each metadata field is repeated in the composite text.
///
/// Repetition raises a field's term frequencies, so director and cast overlap
/// counts for more than a shared tagline word.
const FIELD_WEIGHTS: [(Field, usize); 5] = [
    (Field::Genres, 1),
    (Field::Keywords, 2),
    (Field::Cast, 2),
    (Field::Director, 3),
    (Field::Tagline, 1),
];

#[derive(Debug, Clone, Copy)]
enum Field {
    Genres,
    Keywords,
    Cast,
    Director,
    Tagline,
}

impl Field {
    fn value(self, metadata: &ItemMetadata) -> Option<&str> {
        match self {
            Field::Genres => metadata.genres.as_deref(),
            Field::Keywords => metadata.keywords.as_deref(),
            Field::Cast => metadata.cast.as_deref(),
            Field::Director => metadata.director.as_deref(),
            Field::Tagline => metadata.tagline.as_deref(),
        }
    }
}

/// Lowercases, replaces everything outside `[a-z0-9]` and whitespace with a
/// space, then collapses whitespace runs and trims.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the weighted composite text for one movie.
pub fn compose_features(metadata: &ItemMetadata) -> String {
    let mut parts: Vec<String> = Vec::new();

    for (field, weight) in FIELD_WEIGHTS {
        let normalized = field.value(metadata).map(normalize_text).unwrap_or_default();
        for _ in 0..weight {
            parts.push(normalized.clone());
        }
    }

    parts.join(" ")
}

/// Composite text for every item, index-aligned with `items`.
pub fn compose_corpus(items: &[CatalogItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| compose_features(&item.metadata))
        .collect()
}

/// Drops items whose title (case-sensitive) repeats an earlier item's title.
///
/// Returns the surviving items together with their positions in the input,
/// so row-aligned data (such as precomputed vectors) can be filtered to match.
pub fn dedup_by_title(items: Vec<CatalogItem>) -> (Vec<CatalogItem>, Vec<usize>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut kept_positions = Vec::with_capacity(items.len());

    for (position, item) in items.into_iter().enumerate() {
        if seen.insert(item.title.clone()) {
            kept.push(item);
            kept_positions.push(position);
        }
    }

    (kept, kept_positions)
}
