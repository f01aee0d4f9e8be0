//! Short-TTL result cache keyed by normalized request parameters.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use rxnear_core::{SearchRequest, SortBy};

struct CacheEntry<T> {
    stored_at: Instant,
    value: T,
}

/// TTL cache over a read-write-locked map.
///
/// Reads take the shared lock, so concurrent searches never block each other
/// on hits. Entries are invalidated purely by TTL expiry; expired entries
/// are dropped lazily on insert.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetches a live entry, `None` if missing or expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: String, value: T) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }
}

fn flag(value: Option<bool>) -> char {
    match value {
        Some(true) => '1',
        Some(false) => '0',
        None => '-',
    }
}

fn sort_tag(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Distance => "distance",
        SortBy::Rating => "rating",
        SortBy::Name => "name",
        SortBy::OpenFirst => "open_first",
    }
}

/// Builds the normalized cache key for a request.
///
/// The coordinate is rounded to four decimals (~11 m) so jittery client GPS
/// reads still hit; radius and max results are the effective values after
/// defaulting and clamping. Service tags are lowercased and sorted so the
/// same filter set always produces the same key.
#[must_use]
pub fn cache_key(request: &SearchRequest, radius_km: f64, max_results: usize) -> String {
    let mut services: Vec<String> = request
        .services
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();
    services.sort();

    let chain = request
        .chain_name
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let medicine = request
        .medicine_name
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    format!(
        "{:.4},{:.4}|r{radius_km:.2}|n{max_results}|s{}|f{}{}{}{}{}|c{chain}|v{}|m{medicine}",
        request.latitude,
        request.longitude,
        sort_tag(request.sort_by),
        flag(request.open_now),
        flag(request.is_24_hours),
        flag(request.has_delivery),
        flag(request.has_drive_through),
        flag(request.accepts_insurance),
        services.join("+"),
    )
}
