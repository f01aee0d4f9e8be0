//! Retry with exponential backoff for transient routing-service errors.
//!
//! Non-retriable errors (parse failures, 4xx other than 429, route-level
//! rejections) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::RoutingError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`RoutingError::RateLimited`] — HTTP 429; the service asked us to back off.
/// - [`RoutingError::ServerError`] — 5xx; often momentary.
/// - [`RoutingError::Http`] — network-level failure (connection reset, timeout, etc.).
///
/// Non-retriable errors (propagated immediately):
/// - [`RoutingError::UnexpectedStatus`] — non-retriable HTTP status (e.g., 403).
/// - [`RoutingError::Deserialize`] — response body does not parse; retrying won't fix it.
/// - [`RoutingError::NoRoute`] — the service evaluated the request and rejected it.
/// - [`RoutingError::InvalidBaseUrl`] — configuration problem.
fn is_retriable(err: &RoutingError) -> bool {
    matches!(
        err,
        RoutingError::RateLimited { .. }
            | RoutingError::ServerError { .. }
            | RoutingError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, RoutingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RoutingError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, capped to avoid overflow.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient routing error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
