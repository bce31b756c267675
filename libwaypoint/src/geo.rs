//! Great-circle distance calculations

/// Mean Earth radius in kilometers, as used by the haversine formula
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the haversine distance in kilometers between two points given as
/// `(latitude, longitude)` pairs in degrees
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
