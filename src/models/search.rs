// src/models/search.rs
// DOCUMENTATION: Search request and response DTOs
// PURPOSE: Shapes exchanged between HTTP handlers and the search service

use super::{Cafe, GeoPoint, GeolocationErrorReport, GeolocationFailure, ResolvedLocation};
use crate::errors::CafeError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Attribute predicates applied after a fetch
/// DOCUMENTATION: Independently toggleable and combined with AND.
/// Radius is deliberately absent: changing it needs a new fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    /// Keep only cafés known to be open (unknown counts as not open)
    pub open_now: bool,
    pub wifi: bool,
    pub outdoor: bool,
    pub takeaway: bool,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        !(self.open_now || self.wifi || self.outdoor || self.takeaway)
    }
}

/// POST /cafes/search body
#[derive(Debug, Deserialize, Validate)]
pub struct LocationSearchRequest {
    /// Caller-chosen id grouping consecutive searches from one UI session
    #[validate(length(min = 1, max = 128))]
    pub session: String,

    /// Free-text place name or address
    #[validate(length(min = 1, max = 255))]
    pub query: String,

    /// Search radius in meters (server default when absent)
    pub radius: Option<u32>,

    #[serde(default)]
    pub filters: FilterSet,
}

/// Coordinates as sent by a client's geolocation provider
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PositionFix {
    pub lat: f64,
    pub lng: f64,
}

/// POST /cafes/nearby body
/// DOCUMENTATION: Carries either a position fix or the provider's error
#[derive(Debug, Deserialize, Validate)]
pub struct NearbySearchRequest {
    #[validate(length(min = 1, max = 128))]
    pub session: String,

    pub position: Option<PositionFix>,

    pub error: Option<GeolocationErrorReport>,

    pub radius: Option<u32>,

    #[serde(default)]
    pub filters: FilterSet,
}

impl NearbySearchRequest {
    /// Resolve the report into a point, surfacing provider failures as typed errors
    pub fn point(&self) -> Result<GeoPoint, CafeError> {
        if let Some(report) = &self.error {
            return Err(CafeError::Geolocation(GeolocationFailure::from_code(
                report.code,
            )));
        }

        match self.position {
            Some(fix) => GeoPoint::new(fix.lat, fix.lng),
            None => Err(CafeError::InvalidInput(
                "either position or error is required".to_string(),
            )),
        }
    }
}

/// POST /cafes/refine body
#[derive(Debug, Deserialize, Validate)]
pub struct RefineRequest {
    #[validate(length(min = 1, max = 128))]
    pub session: String,

    #[serde(default)]
    pub filters: FilterSet,
}

/// GET /cafes/by-name query string
#[derive(Debug, Deserialize, Validate)]
pub struct NameSearchQuery {
    #[validate(length(min = 1, max = 128))]
    pub session: String,

    #[serde(default)]
    pub term: String,
}

/// GET /cafes/map query string
#[derive(Debug, Deserialize, Validate)]
pub struct MapQuery {
    #[validate(length(min = 1, max = 128))]
    pub session: String,

    #[serde(default)]
    pub open_now: bool,
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub outdoor: bool,
    #[serde(default)]
    pub takeaway: bool,
}

impl MapQuery {
    pub fn filters(&self) -> FilterSet {
        FilterSet {
            open_now: self.open_now,
            wifi: self.wifi,
            outdoor: self.outdoor,
            takeaway: self.takeaway,
        }
    }
}

/// Result of a location search, refinement or name search
/// DOCUMENTATION: An empty `cafes` list is a normal "no cafés found" result
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Where the search was centered
    pub location: ResolvedLocation,
    /// Cafés after filters / name search, ascending by distance
    pub cafes: Vec<Cafe>,
    /// Length of `cafes`
    pub total: usize,
    /// Size of the full fetch before filters
    pub unfiltered_total: usize,
    /// Radius the fetch used, in meters
    pub radius: u32,
}

impl SearchResponse {
    pub fn new(
        location: ResolvedLocation,
        cafes: Vec<Cafe>,
        unfiltered_total: usize,
        radius: u32,
    ) -> Self {
        Self {
            location,
            total: cafes.len(),
            cafes,
            unfiltered_total,
            radius,
        }
    }
}
