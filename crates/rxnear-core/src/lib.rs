//! Core domain types and configuration for rxnear.
//!
//! Defines the validated coordinate/bounding-box primitives, the pharmacy and
//! medicine records the search pipeline consumes as immutable snapshots, the
//! request/response shapes of the search API, and env-based application
//! configuration.

pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    AvailabilityEstimate, BoundingBox, Coordinate, CoordinateError, Medicine, Pharmacy,
    SearchRequest, SearchResult, SortBy, StockLevel,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
