/// Great-circle distance on a spherical Earth.
///
/// Uses a 6,367,137 m sphere rather than the 6,371,008.8 m mean radius in
/// `geo`, so distances come out about 0.06% shorter than `HaversineDistance`.
use geo::Point;

pub const EARTH_RADIUS_M: f64 = 6_367_137.0;

/// Haversine distance in meters between two (lat, lon) pairs given in degrees.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Same as [`haversine_m`] for `geo` points (x = longitude, y = latitude).
pub fn point_distance_m(a: &Point<f64>, b: &Point<f64>) -> f64 {
    haversine_m(a.y(), a.x(), b.y(), b.x())
}
