//! Great-circle distance and bounding-box prefilter math.

use rxnear_core::{BoundingBox, Coordinate};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometers per degree of latitude (and of longitude at the
/// equator). Good enough for a prefilter that over-selects on purpose.
const KM_PER_DEGREE: f64 = 111.0;

/// Haversine great-circle distance in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_delta = (b.latitude - a.latitude).to_radians();
    let lon_delta = (b.longitude - a.longitude).to_radians();

    let h = (lat_delta / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (lon_delta / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Bounding box covering a circle of `radius_km` around `center`.
///
/// The longitude offset is corrected only for the center's latitude, so the
/// box over- or under-selects near the poles and at large radii. Callers
/// re-filter with exact distance afterward.
#[must_use]
pub fn bounding_box(center: Coordinate, radius_km: f64) -> BoundingBox {
    let lat_offset = radius_km / KM_PER_DEGREE;
    let lon_offset = radius_km / (KM_PER_DEGREE * center.latitude.to_radians().cos());

    BoundingBox {
        min_lat: center.latitude - lat_offset,
        max_lat: center.latitude + lat_offset,
        min_lon: center.longitude - lon_offset,
        max_lon: center.longitude + lon_offset,
    }
}

/// Rounds a distance to two decimal places for presentation.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Google-Maps-style driving-directions deep link.
#[must_use]
pub fn directions_url(origin: Coordinate, destination: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/{:.6},{:.6}/{:.6},{:.6}",
        origin.latitude, origin.longitude, destination.latitude, destination.longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate {
            latitude: lat,
            longitude: lon,
        }
    }

    const NYC: Coordinate = Coordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    };
    const LA: Coordinate = Coordinate {
        latitude: 34.0522,
        longitude: -118.2437,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(NYC, NYC).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(NYC, LA);
        let back = haversine_km(LA, NYC);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn nyc_to_la_is_about_3936_km() {
        let d = haversine_km(NYC, LA);
        assert!((d - 3936.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = haversine_km(coord(0.0, 0.0), coord(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1.0, "got {d}");
    }

    #[test]
    fn bounding_box_contains_circle_points() {
        let bb = bounding_box(NYC, 10.0);
        // Points ~10 km due north/south/east/west must fall inside the box.
        let km_per_lat_degree = 111.0;
        let north = coord(NYC.latitude + 10.0 / km_per_lat_degree, NYC.longitude);
        let east = coord(
            NYC.latitude,
            NYC.longitude + 10.0 / (km_per_lat_degree * NYC.latitude.to_radians().cos()),
        );
        assert!(bb.contains(north));
        assert!(bb.contains(east));
        assert!(!bb.contains(coord(NYC.latitude + 1.0, NYC.longitude)));
    }

    #[test]
    fn bounding_box_widens_longitude_at_high_latitude() {
        let equator = bounding_box(coord(0.0, 0.0), 10.0);
        let arctic = bounding_box(coord(70.0, 0.0), 10.0);
        let equator_width = equator.max_lon - equator.min_lon;
        let arctic_width = arctic.max_lon - arctic.min_lon;
        assert!(arctic_width > equator_width * 2.0);
    }

    #[test]
    fn round_km_two_decimals() {
        assert!((round_km(3.14159) - 3.14).abs() < 1e-9);
        assert!((round_km(3.145) - 3.15).abs() < 1e-9);
        assert!((round_km(0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn directions_url_format() {
        let url = directions_url(NYC, LA);
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/40.712800,-74.006000/34.052200,-118.243700"
        );
    }
}
