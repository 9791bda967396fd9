// src/models/location.rs
// DOCUMENTATION: Geographic points, resolved locations and the geolocation contract
// PURPOSE: Validated coordinates shared by every pipeline stage

use crate::errors::CafeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A validated WGS84 coordinate
/// DOCUMENTATION: lat ∈ [-90, 90], lng ∈ [-180, 180], both finite.
/// Fields are private so a GeoPoint can't change after construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = CafeError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Build a point, rejecting NaN, infinities and out-of-range values
    pub fn new(lat: f64, lng: f64) -> Result<Self, CafeError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CafeError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CafeError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Human-readable label used when reverse geocoding is unavailable
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo_types::Point::new(point.lng, point.lat)
    }
}

/// A point together with a display label
/// DOCUMENTATION: Produced by the geocoder (or the coordinate fallback).
/// Replaced wholesale on every search, never patched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    /// Structured address fields (road, city, postcode, ...) when the geocoder returned them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<BTreeMap<String, String>>,
}

impl ResolvedLocation {
    pub fn new(
        point: GeoPoint,
        display_name: String,
        address: Option<BTreeMap<String, String>>,
    ) -> Self {
        Self {
            lat: point.lat(),
            lng: point.lng(),
            display_name,
            address,
        }
    }

    /// Location labelled with its own coordinates
    pub fn from_coordinates(point: GeoPoint) -> Self {
        Self::new(point, point.label(), None)
    }

    pub fn point(&self) -> Result<GeoPoint, CafeError> {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Result of a reverse geocode lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceLabel {
    pub display_name: String,
    pub address: Option<BTreeMap<String, String>>,
}

/// Why the client's geolocation provider couldn't produce a fix
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationFailure {
    #[error("Location access denied. Please allow location access.")]
    PermissionDenied,

    #[error("Location unavailable. Please check your location settings.")]
    PositionUnavailable,

    #[error("Location request timed out.")]
    Timeout,
}

impl GeolocationFailure {
    /// Map a W3C GeolocationPositionError code
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationFailure::PermissionDenied,
            3 => GeolocationFailure::Timeout,
            _ => GeolocationFailure::PositionUnavailable,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            GeolocationFailure::PermissionDenied => "permission_denied",
            GeolocationFailure::PositionUnavailable => "position_unavailable",
            GeolocationFailure::Timeout => "timeout",
        }
    }
}

/// Settings clients should hand to their geolocation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl GeolocationOptions {
    /// High accuracy, 10s timeout, fixes up to five minutes old
    pub fn recommended() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 300_000,
        }
    }
}

/// Error report forwarded from a client's geolocation provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeolocationErrorReport {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new(48.8566, 2.3522).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(90.0001, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_geo_point_deserialize_validates() {
        let ok: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 40.4, "lng": -3.7}"#);
        assert!(ok.is_ok());

        let bad: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 140.0, "lng": -3.7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_coordinate_label() {
        let point = GeoPoint::new(48.856614, 2.3522219).unwrap();
        assert_eq!(point.label(), "48.8566, 2.3522");
        assert_eq!(
            ResolvedLocation::from_coordinates(point).display_name,
            "48.8566, 2.3522"
        );
    }

    #[test]
    fn test_geo_types_conversion_is_lng_lat() {
        let point: geo_types::Point<f64> = GeoPoint::new(10.0, 20.0).unwrap().into();
        assert_eq!(point.x(), 20.0);
        assert_eq!(point.y(), 10.0);
    }

    #[test]
    fn test_geolocation_codes() {
        assert_eq!(
            GeolocationFailure::from_code(1),
            GeolocationFailure::PermissionDenied
        );
        assert_eq!(
            GeolocationFailure::from_code(2),
            GeolocationFailure::PositionUnavailable
        );
        assert_eq!(GeolocationFailure::from_code(3), GeolocationFailure::Timeout);
        assert_eq!(
            GeolocationFailure::from_code(42),
            GeolocationFailure::PositionUnavailable
        );
        assert_eq!(GeolocationFailure::Timeout.reason(), "timeout");
    }

    #[test]
    fn test_recommended_options() {
        let options = GeolocationOptions::recommended();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout_ms, 10_000);
        assert_eq!(options.maximum_age_ms, 300_000);
    }
}
