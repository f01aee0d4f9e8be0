//! Travel-time lookup against an external routing service.
//!
//! [`TableClient`] issues one batched request to an OSRM-style `/table`
//! endpoint and converts durations to whole minutes. Transient failures
//! (429, 5xx, network errors) are retried with exponential backoff; anything
//! else degrades to missing travel times rather than failing the caller.

pub mod client;
pub mod error;
pub mod provider;

mod retry;

pub use client::TableClient;
pub use error::RoutingError;
pub use provider::{ConfiguredRouting, NoopRouting, RoutingProvider};
