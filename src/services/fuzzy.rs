//! Approximate string scoring on a 0-100 scale.
//!
//! `weighted_ratio` blends a plain edit-based ratio with token-order and
//! token-set insensitive variants, falling back to best-substring ("partial")
//! comparisons when one string is much longer than the other.

use std::collections::BTreeSet;

/// Lowercases, turns every non-alphanumeric character into a space, and
/// collapses whitespace.
pub fn preprocess(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weighted similarity of two strings, 0-100. Both inputs are preprocessed.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_len = a.chars().count() as f64;
    let b_len = b.chars().count() as f64;
    let length_ratio = a_len.max(b_len) / a_len.min(b_len);

    let base = ratio(&a, &b);

    let best = if length_ratio < 1.5 {
        base.max(token_sort_ratio(&a, &b, false) * 0.95)
            .max(token_set_ratio(&a, &b, false) * 0.95)
    } else {
        let partial_scale = if length_ratio <= 8.0 { 0.9 } else { 0.6 };
        base.max(partial_ratio(&a, &b) * partial_scale)
            .max(token_sort_ratio(&a, &b, true) * 0.95 * partial_scale)
            .max(token_set_ratio(&a, &b, true) * 0.95 * partial_scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// `2 * LCS / (|a| + |b|)`, scaled to 0-100
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Best ratio of the shorter string against every equal-length window of the longer one
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return 0.0;
    }
    if shorter.len() == longer.len() {
        return ratio_chars(&shorter, &longer);
    }

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        best = best.max(ratio_chars(&shorter, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

/// Compares the shared tokens against each side's shared-plus-remaining tokens
fn token_set_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();

    let shared: Vec<&str> = a_tokens.intersection(&b_tokens).copied().collect();
    if partial && !shared.is_empty() {
        return 100.0;
    }

    let only_a: Vec<&str> = a_tokens.difference(&b_tokens).copied().collect();
    let only_b: Vec<&str> = b_tokens.difference(&a_tokens).copied().collect();

    let sect = shared.join(" ");
    let combined_a = format!("{} {}", sect, only_a.join(" ")).trim().to_string();
    let combined_b = format!("{} {}", sect, only_b.join(" ")).trim().to_string();

    let score = |x: &str, y: &str| {
        if partial {
            partial_ratio(x, y)
        } else {
            ratio(x, y)
        }
    };

    let mut best = score(&combined_a, &combined_b);
    if !sect.is_empty() {
        best = best
            .max(score(&sect, &combined_a))
            .max(score(&sect, &combined_b));
    }
    best
}
