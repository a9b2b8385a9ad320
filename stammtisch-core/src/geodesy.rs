//! Great-circle distances and speed-based travel time estimates.
//!
//! These are the fallbacks used whenever the routing provider cannot supply a
//! sample, so both functions are total: any pair of finite coordinates yields a
//! finite, non-negative distance.

use geo::Coord;

use crate::TransportMode;

/// Earth radius in kilometres assumed by [`great_circle_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Haversine distance in kilometres between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stammtisch_core::great_circle_km;
///
/// let marienplatz = Coord { x: 11.5755, y: 48.1374 };
/// assert_eq!(great_circle_km(marienplatz, marienplatz), 0.0);
/// ```
#[must_use]
pub fn great_circle_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let from_lat = from.y.to_radians();
    let to_lat = to.y.to_radians();
    let half_d_lat = (to.y - from.y).to_radians() / 2.0;
    let half_d_lng = (to.x - from.x).to_radians() / 2.0;

    let haversine = half_d_lat.sin().powi(2)
        + from_lat.cos() * to_lat.cos() * half_d_lng.sin().powi(2);
    // Rounding may leave the term a hair outside [0, 1].
    let h = haversine.clamp(0.0, 1.0);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * central_angle
}

/// Minutes needed to cover `distance_km` at the mode's average speed.
///
/// # Examples
/// ```
/// use stammtisch_core::{TransportMode, estimate_travel_minutes};
///
/// assert_eq!(estimate_travel_minutes(5.0, TransportMode::Walk), 60.0);
/// assert_eq!(estimate_travel_minutes(15.0, TransportMode::Bike), 60.0);
/// ```
#[must_use]
pub fn estimate_travel_minutes(distance_km: f64, mode: TransportMode) -> f64 {
    distance_km / mode.average_speed_kmh() * MINUTES_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(lat: f64, lng: f64) -> Coord<f64> {
        Coord { x: lng, y: lat }
    }

    #[rstest]
    fn one_degree_of_latitude_at_the_equator() {
        let distance = great_circle_km(coord(0.0, 0.0), coord(1.0, 0.0));
        assert!(
            (distance - 111.2).abs() <= 111.2 * 0.01,
            "expected about 111.2 km, got {distance}"
        );
    }

    #[rstest]
    fn antipodal_points_do_not_produce_nan() {
        let distance = great_circle_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!(distance.is_finite());
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((distance - half_circumference).abs() < 1e-6);
    }

    #[rstest]
    #[case(coord(48.1374, 11.5755))]
    #[case(coord(-33.8688, 151.2093))]
    #[case(coord(89.9999, -179.9999))]
    fn identical_points_are_exactly_zero(#[case] point: Coord<f64>) {
        assert_eq!(great_circle_km(point, point), 0.0);
    }

    #[rstest]
    fn munich_hauptbahnhof_to_marienplatz() {
        // Roughly 1.4 km as the crow flies.
        let distance = great_circle_km(coord(48.1402, 11.5600), coord(48.1374, 11.5755));
        assert!((1.0..2.0).contains(&distance), "got {distance}");
    }

    #[rstest]
    #[case(TransportMode::Walk, 12.0)]
    #[case(TransportMode::Bike, 4.0)]
    #[case(TransportMode::Car, 2.0)]
    fn travel_minutes_follow_mode_speed(#[case] mode: TransportMode, #[case] expected: f64) {
        let minutes = estimate_travel_minutes(1.0, mode);
        assert!((minutes - expected).abs() < 1e-9, "got {minutes}");
    }

    #[rstest]
    fn zero_distance_takes_no_time() {
        for mode in TransportMode::ALL {
            assert_eq!(estimate_travel_minutes(0.0, mode), 0.0);
        }
    }
}
