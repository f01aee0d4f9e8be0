use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rxnear_core::{AvailabilityEstimate, Coordinate, SearchRequest, SearchResult};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_search_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn search_pharmacies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let results = state
        .service
        .search(&request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: results,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct WithMedicineQuery {
    #[serde(default = "default_min_confidence")]
    min_confidence: f64,
}

fn default_min_confidence() -> f64 {
    0.6
}

pub(super) async fn search_with_medicine(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WithMedicineQuery>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let results = state
        .service
        .search_with_medicine(&request, query.min_confidence)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: results,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailQuery {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl DetailQuery {
    /// A viewer coordinate needs both halves; one without the other is a
    /// client mistake worth naming.
    fn viewer(&self, request_id: &str) -> Result<Option<Coordinate>, ApiError> {
        match (self.latitude, self.longitude) {
            (None, None) => Ok(None),
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon)
                .map(Some)
                .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string())),
            _ => Err(ApiError::new(
                request_id,
                "validation_error",
                "latitude and longitude must be provided together",
            )),
        }
    }
}

pub(super) async fn pharmacy_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let viewer = query.viewer(&req_id.0)?;

    let detail = state
        .service
        .pharmacy_details(id, viewer)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", format!("pharmacy {id} not found")))?;

    Ok(Json(ApiResponse {
        data: detail,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AvailabilityQuery {
    /// Comma-separated medicine names.
    medicines: String,
}

pub(super) async fn availability_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<HashMap<String, AvailabilityEstimate>>>, ApiError> {
    let names: Vec<String> = query
        .medicines
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "medicines must list at least one name",
        ));
    }

    let summary = state
        .service
        .availability_summary(id, &names)
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", format!("pharmacy {id} not found")))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
