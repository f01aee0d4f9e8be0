//! Heuristic medicine-availability scoring.
//!
//! Confidence starts at a 0.5 base and accumulates independent, individually
//! tested adjustments, then clamps to [0, 1]. The result is an estimate, not
//! ground truth: no inventory system is consulted.

use std::collections::HashMap;

use chrono::Utc;
use rxnear_core::{AvailabilityEstimate, Medicine, Pharmacy, StockLevel};
use rxnear_store::{MedicineCatalog, StoreError};

use crate::merge::first_non_empty;

const BASE_CONFIDENCE: f64 = 0.5;

/// Confidence above which a medicine is reported as likely available.
const LIKELY_THRESHOLD: f64 = 0.6;

/// Confidence assigned when the requested name resolves to nothing.
const UNKNOWN_CONFIDENCE: f64 = 0.1;

/// Medicines typically stocked at most pharmacies. Matched as
/// case-insensitive substrings of the medicine or generic name.
const COMMON_MEDICINES: &[&str] = &[
    "paracetamol",
    "acetaminophen",
    "ibuprofen",
    "aspirin",
    "tylenol",
    "advil",
    "motrin",
    "benadryl",
    "claritin",
    "zyrtec",
    "sudafed",
    "pepto bismol",
    "tums",
    "rolaids",
    "cough drops",
    "throat lozenges",
];

/// Chains that typically carry deeper stock. Matched as case-insensitive
/// substrings of the chain name.
const MAJOR_CHAINS: &[&str] = &[
    "cvs",
    "walgreens",
    "rite aid",
    "walmart",
    "target",
    "costco",
    "sam's club",
    "kroger",
    "safeway",
    "publix",
];

/// Scores a resolved medicine against a pharmacy.
///
/// `requested_name` is echoed back on the estimate so callers see the name
/// they asked about, not the catalog's canonical one.
#[must_use]
pub fn estimate(pharmacy: &Pharmacy, medicine: &Medicine, requested_name: &str) -> AvailabilityEstimate {
    let confidence = confidence_for(pharmacy, medicine);
    tracing::debug!(
        pharmacy = %pharmacy.name,
        medicine = %medicine.name,
        confidence,
        "estimated availability"
    );
    AvailabilityEstimate {
        medicine_name: requested_name.to_string(),
        likely_available: confidence > LIKELY_THRESHOLD,
        confidence,
        stock_level: stock_level_for(confidence),
        computed_at: Utc::now(),
    }
}

/// Estimate for a name the catalog cannot resolve at all.
#[must_use]
pub fn unknown(requested_name: &str) -> AvailabilityEstimate {
    AvailabilityEstimate {
        medicine_name: requested_name.to_string(),
        likely_available: false,
        confidence: UNKNOWN_CONFIDENCE,
        stock_level: StockLevel::Unknown,
        computed_at: Utc::now(),
    }
}

/// Resolves a free-text medicine name against the catalog.
///
/// Resolution order: exact case-insensitive name, cross-field search,
/// generic name, brand alias. The first non-empty lookup wins and its first
/// record is taken as the best match.
///
/// # Errors
///
/// Returns [`StoreError`] if a catalog lookup fails.
pub fn resolve_medicine<C: MedicineCatalog>(
    catalog: &C,
    name: &str,
) -> Result<Option<Medicine>, StoreError> {
    if let Some(exact) = catalog.find_by_exact_name(name)? {
        return Ok(Some(exact));
    }
    Ok(first_non_empty([
        catalog.search_all_fields(name)?,
        catalog.find_by_generic_name(name)?,
        catalog.find_by_brand_alias(name)?,
    ]))
}

/// Resolves `name` and scores it, falling back to the unknown estimate.
///
/// # Errors
///
/// Returns [`StoreError`] if a catalog lookup fails.
pub fn estimate_for_name<C: MedicineCatalog>(
    catalog: &C,
    pharmacy: &Pharmacy,
    name: &str,
) -> Result<AvailabilityEstimate, StoreError> {
    match resolve_medicine(catalog, name)? {
        Some(medicine) => Ok(estimate(pharmacy, &medicine, name)),
        None => Ok(unknown(name)),
    }
}

/// Availability of several medicines at one pharmacy, keyed by requested name.
///
/// # Errors
///
/// Returns [`StoreError`] if a catalog lookup fails.
pub fn availability_summary<C: MedicineCatalog>(
    catalog: &C,
    pharmacy: &Pharmacy,
    names: &[String],
) -> Result<HashMap<String, AvailabilityEstimate>, StoreError> {
    let mut summary = HashMap::with_capacity(names.len());
    for name in names {
        summary.insert(name.clone(), estimate_for_name(catalog, pharmacy, name)?);
    }
    Ok(summary)
}

fn confidence_for(pharmacy: &Pharmacy, medicine: &Medicine) -> f64 {
    let mut confidence = BASE_CONFIDENCE;

    confidence += prescription_adjustment(medicine);
    confidence += common_medicine_adjustment(medicine);
    confidence += chain_reliability_score(pharmacy.chain_name.as_deref());
    confidence += service_breadth_adjustment(&pharmacy.services);
    if pharmacy.is_24_hours {
        confidence += 0.1;
    }
    if pharmacy.has_consultation {
        confidence += 0.05;
    }
    confidence += category_adjustment(medicine.category.as_deref());

    confidence.clamp(0.0, 1.0)
}

/// OTC medicines are more likely on the shelf than prescription ones.
fn prescription_adjustment(medicine: &Medicine) -> f64 {
    if medicine.requires_prescription {
        0.0
    } else {
        0.2
    }
}

fn is_common_medicine(name: &str) -> bool {
    let lower = name.to_lowercase();
    COMMON_MEDICINES.iter().any(|m| lower.contains(m))
}

fn common_medicine_adjustment(medicine: &Medicine) -> f64 {
    let generic_is_common = medicine
        .generic_name
        .as_deref()
        .is_some_and(is_common_medicine);
    if is_common_medicine(&medicine.name) || generic_is_common {
        0.3
    } else {
        0.0
    }
}

fn chain_reliability_score(chain_name: Option<&str>) -> f64 {
    let Some(chain) = chain_name else {
        return 0.0;
    };
    let lower = chain.to_lowercase();

    if MAJOR_CHAINS.iter().any(|c| lower.contains(c)) {
        return 0.2;
    }
    if lower.contains("independent") || lower.contains("local") {
        return 0.1;
    }
    0.05
}

/// Broader service menus correlate with broader inventory. Caps at +0.1.
fn service_breadth_adjustment(services: &[String]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let breadth = services.len() as f64 * 0.02;
    breadth.min(0.1)
}

fn category_adjustment(category: Option<&str>) -> f64 {
    let Some(category) = category else {
        return 0.0;
    };
    match category.to_lowercase().as_str() {
        "analgesic" | "nsaid" | "antihistamine" => 0.15,
        "antibiotic" | "antidiabetic" => 0.1,
        "cardiovascular" | "psychiatric" => 0.05,
        "oncology" | "rare disease" => -0.1,
        _ => 0.0,
    }
}

fn stock_level_for(confidence: f64) -> StockLevel {
    if confidence < 0.3 {
        StockLevel::OutOfStock
    } else if confidence < 0.5 {
        StockLevel::Low
    } else if confidence < 0.8 {
        StockLevel::Medium
    } else {
        StockLevel::High
    }
}

#[cfg(test)]
mod tests {
    use rxnear_store::InMemoryMedicineCatalog;
    use uuid::Uuid;

    use super::*;

    fn pharmacy() -> Pharmacy {
        Pharmacy {
            id: Uuid::new_v4(),
            name: "Test Pharmacy".to_string(),
            address: "1 Main St".to_string(),
            city: None,
            state: None,
            zip_code: None,
            phone_number: None,
            email_address: None,
            website_url: None,
            latitude: 40.7,
            longitude: -74.0,
            operating_hours: None,
            is_24_hours: false,
            accepts_insurance: false,
            has_drive_through: false,
            has_delivery: false,
            has_consultation: false,
            services: Vec::new(),
            chain_name: None,
            manager_name: None,
            pharmacist_name: None,
            rating: None,
            is_active: true,
        }
    }

    fn medicine(name: &str, category: Option<&str>, prescription: bool) -> Medicine {
        Medicine {
            id: Uuid::new_v4(),
            name: name.to_string(),
            generic_name: None,
            category: category.map(str::to_string),
            description: None,
            requires_prescription: prescription,
            brand_names: Vec::new(),
        }
    }

    #[test]
    fn confidence_is_always_clamped() {
        // Everything stacked positive.
        let mut p = pharmacy();
        p.chain_name = Some("CVS".to_string());
        p.is_24_hours = true;
        p.has_consultation = true;
        p.services = (0..12).map(|i| format!("service-{i}")).collect();
        let m = Medicine {
            generic_name: Some("ibuprofen".to_string()),
            ..medicine("Advil", Some("nsaid"), false)
        };
        let c = confidence_for(&p, &m);
        assert!((c - 1.0).abs() < f64::EPSILON, "got {c}");

        // Everything stacked negative.
        let bare = pharmacy();
        let rare = medicine("Obscuratinib", Some("oncology"), true);
        let c = confidence_for(&bare, &rare);
        assert!((0.0..=1.0).contains(&c), "got {c}");
    }

    #[test]
    fn common_otc_at_major_24h_chain_scores_high() {
        let mut p = pharmacy();
        p.chain_name = Some("Walgreens #204".to_string());
        p.is_24_hours = true;
        p.services = vec![
            "vaccinations".to_string(),
            "photo".to_string(),
            "refills".to_string(),
        ];
        let m = medicine("Tylenol", Some("analgesic"), false);
        let est = estimate(&p, &m, "tylenol");
        assert_eq!(est.stock_level, StockLevel::High);
        assert!(est.likely_available);
        assert!(est.confidence >= 0.8);
    }

    #[test]
    fn unknown_medicine_short_circuits() {
        let est = unknown("unobtainium");
        assert_eq!(est.stock_level, StockLevel::Unknown);
        assert!(!est.likely_available);
        assert!(est.confidence <= 0.1);
        assert_eq!(est.medicine_name, "unobtainium");
    }

    #[test]
    fn prescription_adjustment_rules() {
        assert!((prescription_adjustment(&medicine("x", None, false)) - 0.2).abs() < 1e-9);
        assert!(prescription_adjustment(&medicine("x", None, true)).abs() < 1e-9);
    }

    #[test]
    fn common_medicine_matches_generic_name() {
        let m = Medicine {
            generic_name: Some("Acetaminophen 500mg".to_string()),
            ..medicine("StoreBrand Pain Relief", None, false)
        };
        assert!((common_medicine_adjustment(&m) - 0.3).abs() < 1e-9);
        assert!(common_medicine_adjustment(&medicine("Obscuratinib", None, false)).abs() < 1e-9);
    }

    #[test]
    fn chain_reliability_tiers() {
        assert!((chain_reliability_score(Some("CVS Pharmacy #1234")) - 0.2).abs() < 1e-9);
        assert!((chain_reliability_score(Some("Joe's Independent Drugs")) - 0.1).abs() < 1e-9);
        assert!((chain_reliability_score(Some("Local Chemists")) - 0.1).abs() < 1e-9);
        assert!((chain_reliability_score(Some("MediMart")) - 0.05).abs() < 1e-9);
        assert!(chain_reliability_score(None).abs() < 1e-9);
    }

    #[test]
    fn service_breadth_caps_at_ten() {
        let three: Vec<String> = (0..3).map(|i| format!("s{i}")).collect();
        let twenty: Vec<String> = (0..20).map(|i| format!("s{i}")).collect();
        assert!((service_breadth_adjustment(&three) - 0.06).abs() < 1e-9);
        assert!((service_breadth_adjustment(&twenty) - 0.1).abs() < 1e-9);
        assert!(service_breadth_adjustment(&[]).abs() < 1e-9);
    }

    #[test]
    fn category_adjustment_table() {
        assert!((category_adjustment(Some("NSAID")) - 0.15).abs() < 1e-9);
        assert!((category_adjustment(Some("antibiotic")) - 0.1).abs() < 1e-9);
        assert!((category_adjustment(Some("psychiatric")) - 0.05).abs() < 1e-9);
        assert!((category_adjustment(Some("oncology")) - (-0.1)).abs() < 1e-9);
        assert!(category_adjustment(Some("homeopathy")).abs() < 1e-9);
        assert!(category_adjustment(None).abs() < 1e-9);
    }

    #[test]
    fn stock_level_thresholds() {
        assert_eq!(stock_level_for(0.29), StockLevel::OutOfStock);
        assert_eq!(stock_level_for(0.3), StockLevel::Low);
        assert_eq!(stock_level_for(0.49), StockLevel::Low);
        assert_eq!(stock_level_for(0.5), StockLevel::Medium);
        assert_eq!(stock_level_for(0.79), StockLevel::Medium);
        assert_eq!(stock_level_for(0.8), StockLevel::High);
    }

    fn catalog() -> InMemoryMedicineCatalog {
        InMemoryMedicineCatalog::new(vec![
            Medicine {
                id: Uuid::new_v4(),
                name: "Tylenol".to_string(),
                generic_name: Some("acetaminophen".to_string()),
                category: Some("analgesic".to_string()),
                description: Some("pain reliever".to_string()),
                requires_prescription: false,
                brand_names: vec!["Panadol".to_string()],
            },
            Medicine {
                id: Uuid::new_v4(),
                name: "Advil".to_string(),
                generic_name: Some("ibuprofen".to_string()),
                category: Some("nsaid".to_string()),
                description: None,
                requires_prescription: false,
                brand_names: vec!["Motrin".to_string()],
            },
        ])
    }

    #[test]
    fn resolve_prefers_exact_name() {
        let resolved = resolve_medicine(&catalog(), "advil").unwrap().unwrap();
        assert_eq!(resolved.name, "Advil");
    }

    #[test]
    fn resolve_falls_back_to_generic_then_brand() {
        let resolved = resolve_medicine(&catalog(), "ibuprofen").unwrap().unwrap();
        assert_eq!(resolved.name, "Advil");
        let resolved = resolve_medicine(&catalog(), "panadol").unwrap().unwrap();
        assert_eq!(resolved.name, "Tylenol");
    }

    #[test]
    fn resolve_miss_returns_none() {
        assert!(resolve_medicine(&catalog(), "unobtainium")
            .unwrap()
            .is_none());
    }

    #[test]
    fn estimate_for_name_unresolved_is_unknown() {
        let est = estimate_for_name(&catalog(), &pharmacy(), "unobtainium").unwrap();
        assert_eq!(est.stock_level, StockLevel::Unknown);
    }

    #[test]
    fn summary_covers_every_requested_name() {
        let names = vec!["tylenol".to_string(), "unobtainium".to_string()];
        let summary = availability_summary(&catalog(), &pharmacy(), &names).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary["unobtainium"].stock_level,
            StockLevel::Unknown
        );
        assert_ne!(summary["tylenol"].stock_level, StockLevel::Unknown);
    }
}
