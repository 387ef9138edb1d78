use crate::models::{Catalog, Recommendation};

pub const DEFAULT_TOP_N: usize = 5;

/// Rounds to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Top `top_n` items by similarity to the item at `index`, the item itself excluded.
///
/// Scores sort descending; equal scores keep ascending catalog order. The result
/// holds `min(top_n, catalog.len() - 1)` entries.
pub fn rank(catalog: &Catalog, index: usize, row: &[f32], top_n: usize) -> Vec<Recommendation> {
    debug_assert_eq!(row.len(), catalog.len());

    let mut scored: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != index)
        // -0.0 + 0.0 == +0.0, so signed zeros tie under total_cmp
        .map(|(i, score)| (i, score + 0.0))
        .collect();

    scored.sort_by(|(a_idx, a), (b_idx, b)| b.total_cmp(a).then(a_idx.cmp(b_idx)));
    scored.truncate(top_n);

    scored
        .into_iter()
        .filter_map(|(i, score)| {
            catalog.get(i).map(|item| Recommendation {
                id: item.id,
                title: item.title.clone(),
                similarity: round4(score as f64),
            })
        })
        .collect()
}
