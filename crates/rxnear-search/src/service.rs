//! Search orchestration.
//!
//! One request runs through: validate → cache lookup → bounding-box store
//! query → predicate filtering → projection → availability scoring →
//! travel-time enrichment → ranking → truncation → cache insert.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, NaiveTime, Weekday};
use rxnear_core::{
    AppConfig, AvailabilityEstimate, Coordinate, Pharmacy, SearchRequest, SearchResult,
};
use rxnear_routing::RoutingProvider;
use rxnear_store::{MedicineCatalog, PharmacyStore};
use uuid::Uuid;

use crate::cache::{self, TtlCache};
use crate::{availability, enrich, filter, geo, hours, rank, SearchError};

/// Results returned when a request does not say how many it wants.
const DEFAULT_MAX_RESULTS: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub max_results_cap: usize,
    pub cache_ttl: Duration,
    pub routing_deadline: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 10.0,
            max_radius_km: 50.0,
            max_results_cap: 50,
            cache_ttl: Duration::from_secs(300),
            routing_deadline: Duration::from_secs(10),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_radius_km: config.default_radius_km,
            max_radius_km: config.max_radius_km,
            max_results_cap: config.max_results_cap,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            routing_deadline: Duration::from_secs(config.routing_timeout_secs),
        }
    }
}

/// The search pipeline, generic over its collaborators so tests can inject
/// in-memory stores and scripted routing providers.
pub struct SearchService<S, C, R> {
    store: S,
    catalog: C,
    routing: R,
    config: SearchConfig,
    cache: TtlCache<Vec<SearchResult>>,
}

impl<S, C, R> SearchService<S, C, R>
where
    S: PharmacyStore,
    C: MedicineCatalog,
    R: RoutingProvider,
{
    #[must_use]
    pub fn new(store: S, catalog: C, routing: R, config: SearchConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl);
        Self {
            store,
            catalog,
            routing,
            config,
            cache,
        }
    }

    /// Ranked nearby-pharmacy search evaluated at the local wall clock.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidRequest`] — out-of-range coordinates,
    ///   non-positive radius, or a blank medicine name. Rejected before any
    ///   store access.
    /// - [`SearchError::Store`] — the primary store query failed.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let now = chrono::Local::now();
        self.search_at(request, now.weekday(), now.time()).await
    }

    /// [`search`](Self::search) with an explicit evaluation instant for
    /// open-now decisions. Deterministic given its inputs.
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search).
    pub async fn search_at(
        &self,
        request: &SearchRequest,
        weekday: Weekday,
        now: NaiveTime,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let origin = Coordinate::new(request.latitude, request.longitude)?;
        let radius_km = self.effective_radius(request.radius_km)?;
        let medicine_name = validated_medicine_name(request)?;
        let max_results = request
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .min(self.config.max_results_cap);

        let key = cache::cache_key(request, radius_km, max_results);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(results = cached.len(), "serving search from cache");
            return Ok(cached);
        }

        tracing::info!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            radius_km,
            "searching nearby pharmacies"
        );

        let bounds = geo::bounding_box(origin, radius_km);
        let candidates = self.store.find_in_bounds(bounds, true)?;
        let candidate_count = candidates.len();
        let matched = filter::apply(candidates, request, origin, radius_km, weekday, now);
        tracing::debug!(
            candidates = candidate_count,
            matched = matched.len(),
            "filtered bounding-box candidates"
        );

        let resolved = match medicine_name {
            Some(name) => Some((name, availability::resolve_medicine(&self.catalog, name)?)),
            None => None,
        };

        let mut results: Vec<SearchResult> = matched
            .iter()
            .map(|pharmacy| {
                let estimate = resolved.as_ref().map(|(name, medicine)| match medicine {
                    Some(m) => availability::estimate(pharmacy, m, name),
                    None => availability::unknown(name),
                });
                to_result(pharmacy, origin, weekday, now, estimate)
            })
            .collect();

        enrich::enrich_travel_times(
            &self.routing,
            origin,
            &mut results,
            self.config.routing_deadline,
        )
        .await;

        rank::sort_results(&mut results, request.sort_by);
        results.truncate(max_results);

        self.cache.insert(key, results.clone());
        Ok(results)
    }

    /// Search restricted to results whose availability confidence meets
    /// `min_confidence`. The request must name a medicine.
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search); additionally rejects a request with no
    /// medicine name.
    pub async fn search_with_medicine(
        &self,
        request: &SearchRequest,
        min_confidence: f64,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if validated_medicine_name(request)?.is_none() {
            return Err(SearchError::InvalidRequest {
                field: "medicine_name",
                reason: "medicine_name is required when filtering by availability".to_string(),
            });
        }

        let results = self.search(request).await?;
        Ok(results
            .into_iter()
            .filter(|r| {
                r.availability
                    .as_ref()
                    .is_some_and(|a| a.confidence >= min_confidence)
            })
            .collect())
    }

    /// Single-pharmacy lookup with location context. A miss is `Ok(None)`.
    ///
    /// With a viewer coordinate, distance and (best-effort) travel time are
    /// computed from there; without one, the result carries zero distance.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] if the lookup fails.
    pub async fn pharmacy_details(
        &self,
        id: Uuid,
        viewer: Option<Coordinate>,
    ) -> Result<Option<SearchResult>, SearchError> {
        let Some(pharmacy) = self.store.find_by_id(id)? else {
            tracing::debug!(%id, "pharmacy detail lookup missed");
            return Ok(None);
        };

        let now = chrono::Local::now();
        let origin = viewer.unwrap_or_else(|| pharmacy.coordinate());
        let mut result = to_result(&pharmacy, origin, now.weekday(), now.time(), None);

        if viewer.is_some() {
            enrich::enrich_travel_times(
                &self.routing,
                origin,
                std::slice::from_mut(&mut result),
                self.config.routing_deadline,
            )
            .await;
        }

        Ok(Some(result))
    }

    /// Availability of several medicines at one pharmacy. A pharmacy miss is
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] if a store or catalog lookup fails.
    pub fn availability_summary(
        &self,
        pharmacy_id: Uuid,
        medicine_names: &[String],
    ) -> Result<Option<HashMap<String, AvailabilityEstimate>>, SearchError> {
        let Some(pharmacy) = self.store.find_by_id(pharmacy_id)? else {
            return Ok(None);
        };
        let summary = availability::availability_summary(&self.catalog, &pharmacy, medicine_names)?;
        Ok(Some(summary))
    }

    /// Defaults an absent radius and clamps a present one to the maximum.
    /// A provided non-positive or non-finite radius is a request error.
    fn effective_radius(&self, requested: Option<f64>) -> Result<f64, SearchError> {
        match requested {
            None => Ok(self.config.default_radius_km),
            Some(r) if !r.is_finite() || r <= 0.0 => Err(SearchError::InvalidRequest {
                field: "radius_km",
                reason: format!("radius_km must be positive, got {r}"),
            }),
            Some(r) => Ok(r.min(self.config.max_radius_km)),
        }
    }
}

fn validated_medicine_name(request: &SearchRequest) -> Result<Option<&str>, SearchError> {
    match request.medicine_name.as_deref() {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(SearchError::InvalidRequest {
                    field: "medicine_name",
                    reason: "medicine_name must be non-empty when provided".to_string(),
                });
            }
            Ok(Some(trimmed))
        }
        None => Ok(None),
    }
}

fn to_result(
    pharmacy: &Pharmacy,
    origin: Coordinate,
    weekday: Weekday,
    now: NaiveTime,
    availability: Option<AvailabilityEstimate>,
) -> SearchResult {
    let destination = pharmacy.coordinate();
    SearchResult {
        pharmacy_id: pharmacy.id,
        name: pharmacy.name.clone(),
        address: pharmacy.address.clone(),
        city: pharmacy.city.clone(),
        state: pharmacy.state.clone(),
        zip_code: pharmacy.zip_code.clone(),
        phone_number: pharmacy.phone_number.clone(),
        email_address: pharmacy.email_address.clone(),
        website_url: pharmacy.website_url.clone(),
        latitude: pharmacy.latitude,
        longitude: pharmacy.longitude,
        distance_km: geo::round_km(geo::haversine_km(origin, destination)),
        operating_hours: pharmacy.operating_hours.clone(),
        is_open_now: hours::is_open_at(
            pharmacy.operating_hours.as_deref().unwrap_or(""),
            pharmacy.is_24_hours,
            weekday,
            now,
        ),
        is_24_hours: pharmacy.is_24_hours,
        accepts_insurance: pharmacy.accepts_insurance,
        has_drive_through: pharmacy.has_drive_through,
        has_delivery: pharmacy.has_delivery,
        has_consultation: pharmacy.has_consultation,
        services: pharmacy.services.clone(),
        chain_name: pharmacy.chain_name.clone(),
        manager_name: pharmacy.manager_name.clone(),
        pharmacist_name: pharmacy.pharmacist_name.clone(),
        rating: pharmacy.rating,
        directions_url: geo::directions_url(origin, destination),
        travel_time_minutes: None,
        availability,
    }
}
