//! Multi-predicate candidate filtering.
//!
//! Every predicate is independent: an absent request constraint never
//! rejects. Candidates that survive keep their input order.

use chrono::{NaiveTime, Weekday};
use rxnear_core::{Coordinate, Pharmacy, SearchRequest};

use crate::{geo, hours};

/// Applies all request predicates to the bounding-box candidates.
///
/// `radius_km` is the effective (defaulted/clamped) radius; the exact
/// haversine distance check here is the correctness backstop for the loose
/// bounding-box prefilter.
#[must_use]
pub fn apply(
    candidates: Vec<Pharmacy>,
    request: &SearchRequest,
    origin: Coordinate,
    radius_km: f64,
    weekday: Weekday,
    now: NaiveTime,
) -> Vec<Pharmacy> {
    candidates
        .into_iter()
        .filter(|p| accepts(p, request, origin, radius_km, weekday, now))
        .collect()
}

fn accepts(
    pharmacy: &Pharmacy,
    request: &SearchRequest,
    origin: Coordinate,
    radius_km: f64,
    weekday: Weekday,
    now: NaiveTime,
) -> bool {
    if geo::haversine_km(origin, pharmacy.coordinate()) > radius_km {
        return false;
    }

    if !pharmacy.is_active {
        return false;
    }

    if request.open_now == Some(true)
        && !hours::is_open_at(
            pharmacy.operating_hours.as_deref().unwrap_or(""),
            pharmacy.is_24_hours,
            weekday,
            now,
        )
    {
        return false;
    }

    // Feature flags match exactly when requested: asking for
    // `is_24_hours: false` really does mean "not 24-hour".
    if let Some(wanted) = request.is_24_hours {
        if wanted != pharmacy.is_24_hours {
            return false;
        }
    }
    if let Some(wanted) = request.has_delivery {
        if wanted != pharmacy.has_delivery {
            return false;
        }
    }
    if let Some(wanted) = request.has_drive_through {
        if wanted != pharmacy.has_drive_through {
            return false;
        }
    }
    if let Some(wanted) = request.accepts_insurance {
        if wanted != pharmacy.accepts_insurance {
            return false;
        }
    }

    if let Some(chain) = request.chain_name.as_deref() {
        let chain = chain.trim();
        if !chain.is_empty() {
            let matches = pharmacy
                .chain_name
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&chain.to_lowercase()));
            if !matches {
                return false;
            }
        }
    }

    if let Some(wanted_services) = request.services.as_deref() {
        if !wanted_services.is_empty() {
            let any_match = wanted_services.iter().any(|wanted| {
                let wanted = wanted.to_lowercase();
                pharmacy
                    .services
                    .iter()
                    .any(|offered| offered.to_lowercase().contains(&wanted))
            });
            if !any_match {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    fn noon() -> (Weekday, NaiveTime) {
        (Weekday::Wed, NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    fn pharmacy(name: &str) -> Pharmacy {
        Pharmacy {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: "1 Main St".to_string(),
            city: None,
            state: None,
            zip_code: None,
            phone_number: None,
            email_address: None,
            website_url: None,
            latitude: ORIGIN.latitude,
            longitude: ORIGIN.longitude,
            operating_hours: Some("Mon-Fri: 8AM-10PM".to_string()),
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

    fn run(candidates: Vec<Pharmacy>, request: &SearchRequest) -> Vec<String> {
        let (weekday, now) = noon();
        apply(candidates, request, ORIGIN, 10.0, weekday, now)
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn unconstrained_request_keeps_everything_in_radius() {
        let request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        let names = run(vec![pharmacy("a"), pharmacy("b")], &request);
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn distance_boundary_is_inclusive() {
        let mut near = pharmacy("near");
        near.latitude = ORIGIN.latitude + 0.05;
        let mut far = pharmacy("far");
        far.latitude = ORIGIN.latitude + 0.05;

        let exact = geo::haversine_km(ORIGIN, near.coordinate());
        let (weekday, now) = noon();
        let request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);

        // Radius exactly equal to the distance: included.
        let kept = apply(vec![near], &request, ORIGIN, exact, weekday, now);
        assert_eq!(kept.len(), 1);

        // Radius a hair under: excluded.
        let kept = apply(vec![far], &request, ORIGIN, exact - 1e-9, weekday, now);
        assert!(kept.is_empty());
    }

    #[test]
    fn inactive_pharmacies_are_rejected() {
        let mut closed = pharmacy("closed-down");
        closed.is_active = false;
        let request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        assert!(run(vec![closed], &request).is_empty());
    }

    #[test]
    fn open_now_uses_schedule() {
        let open = pharmacy("open");
        let mut shut = pharmacy("shut");
        shut.operating_hours = Some("Sat-Sun: 9AM-5PM".to_string());

        let mut request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        request.open_now = Some(true);
        // Wednesday noon: weekday schedule matches, weekend-only does not.
        assert_eq!(run(vec![open, shut], &request), vec!["open"]);
    }

    #[test]
    fn boolean_filters_require_exact_equality() {
        let mut always_open = pharmacy("around-the-clock");
        always_open.is_24_hours = true;
        let daytime = pharmacy("daytime");

        let mut request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        request.is_24_hours = Some(false);
        assert_eq!(
            run(vec![always_open, daytime], &request),
            vec!["daytime"]
        );
    }

    #[test]
    fn chain_name_is_case_insensitive_substring() {
        let mut cvs = pharmacy("cvs-store");
        cvs.chain_name = Some("CVS Pharmacy".to_string());
        let mut indie = pharmacy("indie");
        indie.chain_name = Some("Village Drugs".to_string());
        let unbranded = pharmacy("unbranded");

        let mut request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        request.chain_name = Some("cvs".to_string());
        assert_eq!(run(vec![cvs, indie, unbranded], &request), vec!["cvs-store"]);
    }

    #[test]
    fn blank_chain_filter_is_no_constraint() {
        let mut request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        request.chain_name = Some("   ".to_string());
        assert_eq!(run(vec![pharmacy("any")], &request), vec!["any"]);
    }

    #[test]
    fn services_any_match_not_all_match() {
        let mut vax = pharmacy("vax");
        vax.services = vec!["Vaccinations".to_string()];
        let mut photo = pharmacy("photo");
        photo.services = vec!["Photo Printing".to_string()];
        let bare = pharmacy("bare");

        let mut request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        request.services = Some(vec!["vaccin".to_string(), "compounding".to_string()]);
        // vax matches one of the two requested tags; that is enough.
        assert_eq!(run(vec![vax, photo, bare], &request), vec!["vax"]);
    }

    #[test]
    fn output_preserves_input_order() {
        let request = SearchRequest::at(ORIGIN.latitude, ORIGIN.longitude);
        let names = run(
            vec![pharmacy("z"), pharmacy("m"), pharmacy("a")],
            &request,
        );
        assert_eq!(names, vec!["z", "m", "a"]);
    }
}
