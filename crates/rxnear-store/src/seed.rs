//! YAML seed dataset loading.
//!
//! The in-memory store is populated from two YAML files at startup. Seed
//! records carry no ids; a v4 UUID is minted per record at load time.

use std::path::Path;

use rxnear_core::{Coordinate, Medicine, Pharmacy};
use serde::Deserialize;
use uuid::Uuid;

use crate::StoreError;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct PharmacySeed {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub is_24_hours: bool,
    #[serde(default)]
    pub accepts_insurance: bool,
    #[serde(default)]
    pub has_drive_through: bool,
    #[serde(default)]
    pub has_delivery: bool,
    #[serde(default)]
    pub has_consultation: bool,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub chain_name: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub pharmacist_name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PharmaciesFile {
    pub pharmacies: Vec<PharmacySeed>,
}

#[derive(Debug, Deserialize)]
pub struct MedicineSeed {
    pub name: String,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default)]
    pub brand_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MedicinesFile {
    pub medicines: Vec<MedicineSeed>,
}

/// Load and validate the pharmacy seed dataset from a YAML file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read, parsed, or a record
/// fails validation (blank name, out-of-range coordinate).
pub fn load_pharmacies(path: &Path) -> Result<Vec<Pharmacy>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::SeedIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: PharmaciesFile = serde_yaml::from_str(&content)?;

    let mut pharmacies = Vec::with_capacity(file.pharmacies.len());
    for seed in file.pharmacies {
        if seed.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "pharmacy name must be non-empty".to_string(),
            ));
        }
        Coordinate::new(seed.latitude, seed.longitude).map_err(|e| {
            StoreError::Validation(format!("pharmacy \"{}\": {e}", seed.name))
        })?;
        pharmacies.push(Pharmacy {
            id: Uuid::new_v4(),
            name: seed.name,
            address: seed.address,
            city: seed.city,
            state: seed.state,
            zip_code: seed.zip_code,
            phone_number: seed.phone_number,
            email_address: seed.email_address,
            website_url: seed.website_url,
            latitude: seed.latitude,
            longitude: seed.longitude,
            operating_hours: seed.operating_hours,
            is_24_hours: seed.is_24_hours,
            accepts_insurance: seed.accepts_insurance,
            has_drive_through: seed.has_drive_through,
            has_delivery: seed.has_delivery,
            has_consultation: seed.has_consultation,
            services: seed.services,
            chain_name: seed.chain_name,
            manager_name: seed.manager_name,
            pharmacist_name: seed.pharmacist_name,
            rating: seed.rating,
            is_active: seed.is_active,
        });
    }

    tracing::info!(count = pharmacies.len(), "loaded pharmacy seed dataset");
    Ok(pharmacies)
}

/// Load and validate the medicine seed dataset from a YAML file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read, parsed, or a record
/// fails validation.
pub fn load_medicines(path: &Path) -> Result<Vec<Medicine>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::SeedIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: MedicinesFile = serde_yaml::from_str(&content)?;

    let mut medicines = Vec::with_capacity(file.medicines.len());
    for seed in file.medicines {
        if seed.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "medicine name must be non-empty".to_string(),
            ));
        }
        medicines.push(Medicine {
            id: Uuid::new_v4(),
            name: seed.name,
            generic_name: seed.generic_name,
            category: seed.category,
            description: seed.description,
            requires_prescription: seed.requires_prescription,
            brand_names: seed.brand_names,
        });
    }

    tracing::info!(count = medicines.len(), "loaded medicine seed dataset");
    Ok(medicines)
}
