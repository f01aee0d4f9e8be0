//! Best-effort travel-time provider seam.

use std::future::Future;

use rxnear_core::Coordinate;

/// Batched travel-time lookup from one origin to many destinations.
///
/// The contract is best-effort by construction: the returned vector always
/// has the same length as `destinations`, and every slot the provider could
/// not answer — individual unreachable destinations, provider outages,
/// timeouts — is `None`. Failures are logged by the implementation, never
/// surfaced to the caller.
pub trait RoutingProvider {
    fn batch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Vec<Option<u32>>> + Send;
}

/// Provider that answers every lookup with `None`.
///
/// Used when no routing service is configured (CLI, offline development).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRouting;

impl RoutingProvider for NoopRouting {
    fn batch_travel_times(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Vec<Option<u32>>> + Send {
        let len = destinations.len();
        async move { vec![None; len] }
    }
}

/// Provider selected from configuration: a real table client when a base URL
/// is set, otherwise the no-op provider.
pub enum ConfiguredRouting {
    Table(crate::TableClient),
    Disabled(NoopRouting),
}

impl ConfiguredRouting {
    /// Builds the provider the configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RoutingError`] if a base URL is set but the client
    /// cannot be constructed from it.
    pub fn from_options(
        base_url: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, crate::RoutingError> {
        match base_url {
            Some(url) => {
                let client =
                    crate::TableClient::new(url, timeout_secs, max_retries, backoff_base_secs)?;
                Ok(Self::Table(client))
            }
            None => {
                tracing::info!("no routing base URL configured; travel times disabled");
                Ok(Self::Disabled(NoopRouting))
            }
        }
    }
}

impl RoutingProvider for ConfiguredRouting {
    fn batch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Vec<Option<u32>>> + Send {
        async move {
            match self {
                Self::Table(client) => client.batch_travel_times(origin, destinations).await,
                Self::Disabled(noop) => noop.batch_travel_times(origin, destinations).await,
            }
        }
    }
}
