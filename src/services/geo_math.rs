// src/services/geo_math.rs
// DOCUMENTATION: Great-circle distance
// PURPOSE: Distance from the search center to each café

use crate::models::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters
/// DOCUMENTATION: Pure and deterministic. No validation here; GeoPoint
/// construction already guarantees finite, in-range coordinates
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine(a.lat(), a.lng(), b.lat(), b.lng())
}

/// Same formula on raw coordinates (NaN in, NaN out)
pub fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal pairs
    let a = ((d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
