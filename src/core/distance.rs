use crate::core::{Coordinate, Unit};

/// Great-circle distance between two points on a spherical earth
/// (haversine formula), in `unit`.
pub fn distance(a: Coordinate, b: Coordinate, unit: Unit) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    unit.earth_radius() * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn berlin() -> Coordinate {
        coord(52.52, 13.405)
    }

    fn paris() -> Coordinate {
        coord(48.8566, 2.3522)
    }

    #[test]
    fn test_berlin_paris_in_kilometers() {
        let d = distance(berlin(), paris(), Unit::Kilometers);
        assert!((d - 878.4).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let tokyo = coord(35.6762, 139.6503);
        let new_york = coord(40.7128, -74.0060);
        for unit in [Unit::Kilometers, Unit::Miles] {
            assert!((distance(tokyo, new_york, unit) - distance(new_york, tokyo, unit)).abs() < 1e-9);
            assert!((distance(berlin(), paris(), unit) - distance(paris(), berlin(), unit)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_point_is_zero() {
        for point in [berlin(), paris(), coord(-90.0, 180.0), coord(0.0, 0.0)] {
            assert_eq!(distance(point, point, Unit::Kilometers), 0.0);
            assert_eq!(distance(point, point, Unit::Miles), 0.0);
        }
    }

    #[test]
    fn test_units_scale_by_radius_ratio() {
        let km = distance(berlin(), paris(), Unit::Kilometers);
        let miles = distance(berlin(), paris(), Unit::Miles);
        let expected = km * (Unit::MILES_RADIUS / Unit::KILOMETERS_RADIUS);
        assert!((miles - expected).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_points_stay_finite() {
        let d = distance(coord(0.0, 0.0), coord(0.0, 180.0), Unit::Kilometers);
        assert!((d - std::f64::consts::PI * Unit::KILOMETERS_RADIUS).abs() < 1e-6);
    }
}
