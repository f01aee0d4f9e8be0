//! Domain types shared across the rxnear crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A validated WGS84 point. Out-of-range values are rejected at construction
/// and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude must be in [-90, 90], got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be in [-180, 180], got {0}")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// Builds a coordinate, rejecting out-of-range latitude or longitude.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] naming the offending field.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Axis-aligned lat/lon rectangle used as a cheap store prefilter.
///
/// Deliberately loose near the poles; callers re-filter with exact distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

/// A pharmacy record as stored. Read-only to the search pipeline; treated as
/// an immutable snapshot for the duration of one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub website_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable weekly schedule, e.g. `"Mon-Fri: 8AM-10PM, Sat-Sun: 9AM-9PM"`.
    pub operating_hours: Option<String>,
    pub is_24_hours: bool,
    pub accepts_insurance: bool,
    pub has_drive_through: bool,
    pub has_delivery: bool,
    pub has_consultation: bool,
    pub services: Vec<String>,
    pub chain_name: Option<String>,
    pub manager_name: Option<String>,
    pub pharmacist_name: Option<String>,
    pub rating: Option<f64>,
    pub is_active: bool,
}

impl Pharmacy {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A medicine record from the catalog. Read-only to the search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub requires_prescription: bool,
    pub brand_names: Vec<String>,
}

/// Sort key for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Distance,
    Rating,
    Name,
    OpenFirst,
}

/// Coarse stock-level bucket derived by thresholding the confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    High,
    Medium,
    Low,
    OutOfStock,
    Unknown,
}

/// A nearby-pharmacy search request. Built once per call, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Defaults to the configured radius; clamped to the configured maximum.
    #[serde(default)]
    pub radius_km: Option<f64>,
    /// Defaults to 20; hard-capped by configuration.
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub is_24_hours: Option<bool>,
    #[serde(default)]
    pub has_delivery: Option<bool>,
    #[serde(default)]
    pub has_drive_through: Option<bool>,
    #[serde(default)]
    pub accepts_insurance: Option<bool>,
    #[serde(default)]
    pub chain_name: Option<String>,
    #[serde(default)]
    pub services: Option<Vec<String>>,
    /// When set, results carry an availability estimate for this medicine.
    #[serde(default)]
    pub medicine_name: Option<String>,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl SearchRequest {
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }
}

/// Heuristic estimate that a medicine is stocked at a pharmacy.
///
/// A pure function of the pharmacy and the resolved medicine record; never
/// persisted, always recomputed or served from the short-TTL result cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEstimate {
    pub medicine_name: String,
    pub likely_available: bool,
    /// Heuristic confidence in [0, 1]; not a measured probability.
    pub confidence: f64,
    pub stock_level: StockLevel,
    pub computed_at: DateTime<Utc>,
}

/// One ranked search hit: a pharmacy projection plus computed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub pharmacy_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub website_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance from the request origin, rounded to 2 decimals.
    pub distance_km: f64,
    pub operating_hours: Option<String>,
    pub is_open_now: bool,
    pub is_24_hours: bool,
    pub accepts_insurance: bool,
    pub has_drive_through: bool,
    pub has_delivery: bool,
    pub has_consultation: bool,
    pub services: Vec<String>,
    pub chain_name: Option<String>,
    pub manager_name: Option<String>,
    pub pharmacist_name: Option<String>,
    pub rating: Option<f64>,
    pub directions_url: String,
    /// Absent when travel-time enrichment failed or was not attempted.
    pub travel_time_minutes: Option<u32>,
    /// Present only when the request named a medicine.
    pub availability: Option<AvailabilityEstimate>,
}
