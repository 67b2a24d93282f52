use crate::models::Coordinate;

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers on a spherical Earth. Inputs are not range
/// checked.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in kilometers
#[inline]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

/// Most decimals worth showing for a distance held in an `f64`
pub const MAX_DISPLAY_PRECISION: u32 = 15;

/// Round a distance for display; infinite distances are left alone
///
/// `decimals` above [`MAX_DISPLAY_PRECISION`] are treated as the maximum.
pub fn round_km(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals.min(MAX_DISPLAY_PRECISION) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    fn point(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_known_fractions_of_circumference() {
        let origin = point(0.0, 0.0);

        assert_eq!(round_km(distance(&origin, &point(0.0, 90.0)), 2), 10007.54);
        assert_eq!(round_km(distance(&origin, &point(90.0, 0.0)), 2), 10007.54);
        assert_eq!(round_km(distance(&origin, &point(0.0, 180.0)), 2), 20015.09);
        assert_eq!(distance(&origin, &origin), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = point(-33.8688, 151.2093);
        let b = point(35.6762, 139.6503);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_agrees_with_geo_crate() {
        // geo uses a slightly larger mean radius (6371.0088 km)
        let a = point(40.748817, -73.985428);
        let b = point(51.507222, -0.1275);

        let ours = distance(&a, &b);
        let theirs = geo::Point::from(a).haversine_distance(&geo::Point::from(b)) / 1000.0;
        assert!((ours - theirs).abs() / theirs < 1e-5, "{} vs {}", ours, theirs);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1568.5236, 2), 1568.52);
        assert_eq!(round_km(776.8649, 1), 776.9);
        assert!(round_km(f64::INFINITY, 2).is_infinite());
    }

    #[test]
    fn test_round_km_caps_precision() {
        let d = 1568.5236;
        assert_eq!(round_km(d, MAX_DISPLAY_PRECISION), round_km(d, 400));
        assert_eq!(round_km(d, u32::MAX), round_km(d, MAX_DISPLAY_PRECISION));
        assert!((round_km(d, 400) - d).abs() < 1e-9);
    }
}
