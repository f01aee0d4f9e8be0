//! HTTP client for an OSRM-style `/table` routing endpoint.

use std::fmt::Write as _;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use rxnear_core::Coordinate;
use serde::Deserialize;

use crate::provider::RoutingProvider;
use crate::retry::retry_with_backoff;
use crate::RoutingError;

/// HTTP client for the routing table service.
///
/// One request answers travel times from the origin to every destination:
/// `GET {base}/table/v1/driving/{lon,lat;lon,lat;…}?sources=0&annotations=duration`.
/// The origin is coordinate 0; the response's first durations row is read
/// back, skipping the origin-to-origin cell.
///
/// Transient errors (429, 5xx, network failures) are automatically retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct TableClient {
    client: Client,
    base_url: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    code: String,
    #[serde(default)]
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl TableClient {
    /// Creates a `TableClient` with configured timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidBaseUrl`] for an unusable base URL and
    /// [`RoutingError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, RoutingError> {
        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| RoutingError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches travel times in minutes from `origin` to each destination.
    ///
    /// Returns one `Option<u32>` per destination in input order; a `None`
    /// slot means the service could not route that pair.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`RoutingError::ServerError`] — 5xx after all retries exhausted.
    /// - [`RoutingError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`RoutingError::Http`] — network failure after all retries exhausted.
    /// - [`RoutingError::Deserialize`] — response body is not valid JSON (not retried).
    /// - [`RoutingError::NoRoute`] — service-level rejection (`code != "Ok"`).
    pub async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<Option<u32>>, RoutingError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(origin, destinations);
        let expected = destinations.len();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(RoutingError::RateLimited { retry_after_secs });
                }

                if status.is_server_error() {
                    return Err(RoutingError::ServerError {
                        status: status.as_u16(),
                        url,
                    });
                }

                if !status.is_success() {
                    return Err(RoutingError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<TableResponse>(&body).map_err(|e| {
                    RoutingError::Deserialize {
                        context: "table response".to_owned(),
                        source: e,
                    }
                })?;

                if parsed.code != "Ok" {
                    return Err(RoutingError::NoRoute { code: parsed.code });
                }

                Ok(Self::minutes_from_durations(
                    parsed.durations.as_deref(),
                    expected,
                ))
            }
        })
        .await
    }

    /// Maps the first durations row (seconds, origin cell included) to whole
    /// minutes per destination. Missing rows or short rows pad with `None`.
    fn minutes_from_durations(
        durations: Option<&[Vec<Option<f64>>]>,
        expected: usize,
    ) -> Vec<Option<u32>> {
        let row = durations.and_then(|rows| rows.first());
        let mut minutes = Vec::with_capacity(expected);
        for i in 0..expected {
            // Skip cell 0: origin to itself.
            let cell = row.and_then(|r| r.get(i + 1)).copied().flatten();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            minutes.push(cell.filter(|secs| secs.is_finite() && *secs >= 0.0).map(
                |secs| (secs / 60.0) as u32,
            ));
        }
        minutes
    }

    /// Builds the table URL for the origin plus destination coordinates.
    ///
    /// OSRM takes `longitude,latitude` pairs separated by `;`, with the
    /// origin as coordinate 0 selected via `sources=0`.
    fn table_url(&self, origin: Coordinate, destinations: &[Coordinate]) -> String {
        let mut coords = format!("{:.6},{:.6}", origin.longitude, origin.latitude);
        for dest in destinations {
            let _ = write!(coords, ";{:.6},{:.6}", dest.longitude, dest.latitude);
        }
        format!(
            "{}/table/v1/driving/{coords}?sources=0&annotations=duration",
            self.base_url
        )
    }
}

impl RoutingProvider for TableClient {
    fn batch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Vec<Option<u32>>> + Send {
        async move {
            match self.fetch_travel_times(origin, destinations).await {
                Ok(times) => times,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        destinations = destinations.len(),
                        "travel-time lookup failed — continuing without travel times"
                    );
                    vec![None; destinations.len()]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate {
            latitude: lat,
            longitude: lon,
        }
    }

    fn test_client() -> TableClient {
        TableClient::new("http://routing.test", 5, 0, 0).expect("failed to build TableClient")
    }

    #[test]
    fn table_url_places_origin_first_in_lon_lat_order() {
        let client = test_client();
        let url = client.table_url(coord(40.7128, -74.0060), &[coord(40.7560, -73.9900)]);
        assert_eq!(
            url,
            "http://routing.test/table/v1/driving/-74.006000,40.712800;-73.990000,40.756000?sources=0&annotations=duration"
        );
    }

    #[test]
    fn new_strips_trailing_slash() {
        let client = TableClient::new("http://routing.test/", 5, 0, 0).unwrap();
        let url = client.table_url(coord(0.0, 0.0), &[coord(1.0, 1.0)]);
        assert!(url.starts_with("http://routing.test/table/"));
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = TableClient::new("not a url", 5, 0, 0);
        assert!(matches!(result, Err(RoutingError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn minutes_skips_origin_cell_and_floors() {
        let row = vec![vec![Some(0.0), Some(734.6), Some(59.9)]];
        let minutes = TableClient::minutes_from_durations(Some(row.as_slice()), 2);
        assert_eq!(minutes, vec![Some(12), Some(0)]);
    }

    #[test]
    fn minutes_maps_null_cells_to_none() {
        let row = vec![vec![Some(0.0), None, Some(120.0)]];
        let minutes = TableClient::minutes_from_durations(Some(row.as_slice()), 2);
        assert_eq!(minutes, vec![None, Some(2)]);
    }

    #[test]
    fn minutes_pads_short_rows_with_none() {
        let row = vec![vec![Some(0.0), Some(60.0)]];
        let minutes = TableClient::minutes_from_durations(Some(row.as_slice()), 3);
        assert_eq!(minutes, vec![Some(1), None, None]);
    }

    #[test]
    fn minutes_handles_missing_durations() {
        let minutes = TableClient::minutes_from_durations(None, 2);
        assert_eq!(minutes, vec![None, None]);
    }

    #[test]
    fn minutes_rejects_negative_durations() {
        let row = vec![vec![Some(0.0), Some(-5.0)]];
        let minutes = TableClient::minutes_from_durations(Some(row.as_slice()), 1);
        assert_eq!(minutes, vec![None]);
    }
}
