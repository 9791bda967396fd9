// src/services/tag_normalizer.rs
// DOCUMENTATION: OSM tag normalization
// PURPOSE: Turn a heterogeneous OSM tag map into the sourced fields of a Cafe

use crate::models::{Amenities, RawPoiElement, DEFAULT_CUISINE, UNNAMED_CAFE};
use std::collections::HashMap;

/// Fields of a Cafe that come straight from source data
/// DOCUMENTATION: Everything except distance and the enrichment fields
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCafe {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    /// Real phone from the `phone` tag; the enricher fills the gap when None
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub opening_hours: Option<String>,
    pub is_open: Option<bool>,
    pub amenities: Amenities,
    pub tags: Vec<String>,
    pub cuisine: String,
}

/// Tag normalizer
/// DOCUMENTATION: Total, deterministic mapping. Missing tags fall back to
/// None / false / defaults, never to an error
pub struct TagNormalizer;

/// Read a tag, treating an empty value like a missing one
fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn tag_is(tags: &HashMap<String, String>, key: &str, expected: &str) -> bool {
    tag(tags, key) == Some(expected)
}

impl TagNormalizer {
    /// Normalize one raw element
    pub fn normalize(raw: &RawPoiElement) -> NormalizedCafe {
        let tags = &raw.tags;
        let amenities = Self::extract_amenities(tags);
        let opening_hours = tag(tags, "opening_hours").map(str::to_string);

        NormalizedCafe {
            id: raw.id,
            name: tag(tags, "name").unwrap_or(UNNAMED_CAFE).to_string(),
            address: Self::format_address(tags),
            phone: tag(tags, "phone").map(str::to_string),
            website: tag(tags, "website").map(str::to_string),
            email: tag(tags, "email").map(str::to_string),
            lat: raw.lat,
            lng: raw.lon,
            is_open: Self::is_open(opening_hours.as_deref()),
            opening_hours,
            amenities,
            tags: Self::display_tags(tags),
            cuisine: tag(tags, "cuisine").unwrap_or(DEFAULT_CUISINE).to_string(),
        }
    }

    /// Derive amenity flags
    /// DOCUMENTATION: Only the listed tag values count; anything else is false
    pub fn extract_amenities(tags: &HashMap<String, String>) -> Amenities {
        Amenities {
            wifi: tag_is(tags, "internet_access", "wlan")
                || tag_is(tags, "wifi", "yes")
                || tag_is(tags, "internet_access:fee", "no"),
            outdoor_seating: tag_is(tags, "outdoor_seating", "yes"),
            takeaway: tag_is(tags, "takeaway", "yes"),
            wheelchair: tag_is(tags, "wheelchair", "yes"),
            smoking: tag_is(tags, "smoking", "yes") || tag_is(tags, "smoking", "outside"),
            parking: tag_is(tags, "parking", "yes") || tag_is(tags, "parking:fee", "no"),
            delivery: tag_is(tags, "delivery", "yes"),
            reservation: tag_is(tags, "reservation", "yes"),
        }
    }

    /// Open/closed/unknown from the raw `opening_hours` tag
    /// DOCUMENTATION: Only "24/7" is understood. Weekly schedules are not
    /// evaluated and stay unknown
    pub fn is_open(opening_hours: Option<&str>) -> Option<bool> {
        match opening_hours {
            Some("24/7") => Some(true),
            _ => None,
        }
    }

    /// House number, street, city, postcode joined with ", "
    pub fn format_address(tags: &HashMap<String, String>) -> Option<String> {
        let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:city", "addr:postcode"]
            .iter()
            .filter_map(|key| tag(tags, key))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Display tags in precedence order: cuisine, outdoor seating, wifi, takeaway, wheelchair
    /// DOCUMENTATION: The wifi tag only reflects explicit wlan/wifi tags,
    /// not the free-access fallback used for the amenity flag
    pub fn display_tags(tags: &HashMap<String, String>) -> Vec<String> {
        let mut display = Vec::new();

        if let Some(cuisine) = tag(tags, "cuisine") {
            display.push(cuisine.to_string());
        }
        if tag_is(tags, "outdoor_seating", "yes") {
            display.push("outdoor seating".to_string());
        }
        if tag_is(tags, "internet_access", "wlan") || tag_is(tags, "wifi", "yes") {
            display.push("wifi".to_string());
        }
        if tag_is(tags, "takeaway", "yes") {
            display.push("takeaway".to_string());
        }
        if tag_is(tags, "wheelchair", "yes") {
            display.push("wheelchair accessible".to_string());
        }

        display
    }
}
