// src/models/cafe.rs
// DOCUMENTATION: Core data structures for cafés
// PURPOSE: Raw POI elements, the canonical Cafe record and its map representation

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;

/// Name used when a POI carries no `name` tag
pub const UNNAMED_CAFE: &str = "Unnamed Café";

/// Cuisine reported when a POI carries no `cuisine` tag
pub const DEFAULT_CUISINE: &str = "coffee";

/// One element of an Overpass `out body` response
/// DOCUMENTATION: Opaque to the pipeline apart from id, position and tags.
/// Consumed once by the tag normalizer and discarded
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RawPoiElement {
    /// OSM node identifier
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    /// Free-form OSM tags (`amenity`, `name`, `addr:street`, ...)
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Amenity flags derived from OSM tags
/// DOCUMENTATION: Every key is always present; absent tags mean false
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub wifi: bool,
    pub outdoor_seating: bool,
    pub takeaway: bool,
    pub wheelchair: bool,
    pub smoking: bool,
    pub parking: bool,
    pub delivery: bool,
    pub reservation: bool,
}

/// Display price bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Upscale,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [PriceRange::Budget, PriceRange::Moderate, PriceRange::Upscale];

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceRange::Budget => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Upscale => "$$$",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The canonical café record
/// DOCUMENTATION: Built once per fetch from a RawPoiElement and never mutated
/// afterwards. Filtering and search only select subsets of these records.
///
/// `rating`, `price_range`, `description`, `specialties`, `atmosphere` and a
/// synthetic phone are display flavour re-drawn on every fetch; don't compare
/// them across fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    /// OSM node id, unique within one fetch
    pub id: i64,
    pub name: String,
    /// Comma-joined house number, street, city, postcode
    pub address: Option<String>,
    pub phone: String,
    /// True when `phone` was generated rather than read from the `phone` tag
    pub phone_is_synthetic: bool,
    pub website: Option<String>,
    pub email: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Meters from the search center, rounded
    pub distance: u32,
    /// Raw `opening_hours` tag
    pub opening_hours: Option<String>,
    /// Tri-state: Some(true) open, Some(false) closed, None unknown
    pub is_open: Option<bool>,
    pub amenities: Amenities,
    /// Display tags in fixed precedence: cuisine, outdoor seating, wifi, takeaway, wheelchair
    pub tags: Vec<String>,
    pub cuisine: String,
    pub rating: f64,
    pub price_range: PriceRange,
    pub description: String,
    pub specialties: Vec<String>,
    pub atmosphere: String,
}

impl Cafe {
    /// GeoJSON point feature for map clients
    pub fn to_feature(&self) -> Feature {
        let point = geo_types::Point::new(self.lng, self.lat);

        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), json!(self.id));
        properties.insert("name".to_string(), json!(self.name));
        properties.insert("distance".to_string(), json!(self.distance));
        properties.insert("isOpen".to_string(), json!(self.is_open));
        properties.insert("rating".to_string(), json!(self.rating));
        properties.insert("priceRange".to_string(), json!(self.price_range.symbol()));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::from(&point))),
            id: Some(Id::Number(self.id.into())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Wrap a café list as a FeatureCollection, keeping list order
pub fn to_feature_collection(cafes: &[Cafe]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: cafes.iter().map(Cafe::to_feature).collect(),
        foreign_members: None,
    }
}
