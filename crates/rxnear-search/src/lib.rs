//! Search-and-ranking pipeline for rxnear.
//!
//! One request flows through: bounding-box prefilter against the store,
//! exact-distance + feature filtering, projection to results with computed
//! open-now state, optional availability scoring, best-effort travel-time
//! enrichment, multi-key ranking, truncation, and a short-TTL result cache.

pub mod availability;
pub mod cache;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod geo;
pub mod hours;
pub mod merge;
pub mod rank;
pub mod service;

pub use error::SearchError;
pub use service::{SearchConfig, SearchService};
