//! Best-effort travel-time enrichment.

use std::time::Duration;

use rxnear_core::{Coordinate, SearchResult};
use rxnear_routing::RoutingProvider;

use crate::merge::prefer;

/// Fills `travel_time_minutes` on each result from one batched provider call.
///
/// The call is bounded by `deadline`; a hung or slow provider degrades to
/// missing travel times rather than stalling the search. Never fails: this
/// is the pipeline's single soft-failure stage.
pub async fn enrich_travel_times<R: RoutingProvider>(
    routing: &R,
    origin: Coordinate,
    results: &mut [SearchResult],
    deadline: Duration,
) {
    if results.is_empty() {
        return;
    }

    let destinations: Vec<Coordinate> = results
        .iter()
        .map(|r| Coordinate {
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect();

    let times = match tokio::time::timeout(
        deadline,
        routing.batch_travel_times(origin, &destinations),
    )
    .await
    {
        Ok(times) => times,
        Err(_) => {
            tracing::warn!(
                deadline_secs = deadline.as_secs(),
                destinations = destinations.len(),
                "travel-time enrichment timed out — continuing without travel times"
            );
            vec![None; results.len()]
        }
    };

    for (result, time) in results.iter_mut().zip(times) {
        result.travel_time_minutes = prefer(time, result.travel_time_minutes);
    }
}
