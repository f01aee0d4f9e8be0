//! Pharmacy and medicine stores for rxnear.
//!
//! Defines the collaborator interfaces the search pipeline consumes
//! (`PharmacyStore`, `MedicineCatalog`) and in-memory implementations backed
//! by a YAML seed dataset. Persistent storage is deliberately out of scope;
//! the pipeline only needs keyed lookup plus a bounding-box range query.

pub mod error;
pub mod medicines;
pub mod pharmacies;
pub mod seed;

pub use error::StoreError;
pub use medicines::{InMemoryMedicineCatalog, MedicineCatalog};
pub use pharmacies::{InMemoryPharmacyStore, PharmacyStore};
pub use seed::{load_medicines, load_pharmacies};
