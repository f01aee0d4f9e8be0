use rxnear_core::CoordinateError;
use rxnear_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Rejected before any store access; `field` names what failed.
    #[error("invalid request: {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    /// Unexpected store failure. There is no valid partial-result semantics
    /// without facility data, so this propagates as an internal error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoordinateError> for SearchError {
    fn from(err: CoordinateError) -> Self {
        let field = match err {
            CoordinateError::LatitudeOutOfRange(_) => "latitude",
            CoordinateError::LongitudeOutOfRange(_) => "longitude",
        };
        SearchError::InvalidRequest {
            field,
            reason: err.to_string(),
        }
    }
}
