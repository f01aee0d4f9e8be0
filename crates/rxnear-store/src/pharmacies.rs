//! Pharmacy store interface and in-memory implementation.

use rxnear_core::{BoundingBox, Pharmacy};
use uuid::Uuid;

use crate::StoreError;

/// Keyed pharmacy lookup with a bounding-box range query.
///
/// The search pipeline treats returned records as immutable snapshots and
/// never writes back through this interface.
pub trait PharmacyStore {
    /// Returns pharmacies whose stored coordinate falls inside `bounds`.
    ///
    /// With `active_only`, inactive records are excluded at the store level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying store failure.
    fn find_in_bounds(
        &self,
        bounds: BoundingBox,
        active_only: bool,
    ) -> Result<Vec<Pharmacy>, StoreError>;

    /// Looks up a single pharmacy by id. A miss is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying store failure.
    fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>, StoreError>;
}

/// Immutable in-memory pharmacy snapshot, shared via `Arc` across requests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPharmacyStore {
    pharmacies: Vec<Pharmacy>,
}

impl InMemoryPharmacyStore {
    #[must_use]
    pub fn new(pharmacies: Vec<Pharmacy>) -> Self {
        Self { pharmacies }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pharmacies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pharmacies.is_empty()
    }
}

impl PharmacyStore for InMemoryPharmacyStore {
    fn find_in_bounds(
        &self,
        bounds: BoundingBox,
        active_only: bool,
    ) -> Result<Vec<Pharmacy>, StoreError> {
        Ok(self
            .pharmacies
            .iter()
            .filter(|p| bounds.contains(p.coordinate()))
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>, StoreError> {
        Ok(self.pharmacies.iter().find(|p| p.id == id).cloned())
    }
}
