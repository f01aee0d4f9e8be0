//! Stable multi-key result ranking.

use std::cmp::Ordering;

use rxnear_core::{SearchResult, SortBy};

/// Sorts results in place by the requested key. The sort is stable, so
/// equal-key results keep their pipeline order.
pub fn sort_results(results: &mut [SearchResult], key: SortBy) {
    match key {
        SortBy::Distance => results.sort_by(compare_distance),
        SortBy::Rating => results.sort_by(|a, b| match (a.rating, b.rating) {
            // Descending by rating; unrated entries sort last.
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortBy::Name => results.sort_by(|a, b| {
            // Case-insensitive ascending; empty names sort last.
            match (a.name.is_empty(), b.name.is_empty()) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            }
        }),
        SortBy::OpenFirst => results.sort_by(|a, b| match (a.is_open_now, b.is_open_now) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => compare_distance(a, b),
        }),
    }
}

fn compare_distance(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.distance_km
        .partial_cmp(&b.distance_km)
        .unwrap_or(Ordering::Equal)
}
