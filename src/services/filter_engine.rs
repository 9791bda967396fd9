// src/services/filter_engine.rs
// DOCUMENTATION: Attribute filters
// PURPOSE: Narrow a café list by open-now and amenity predicates

use crate::models::{Cafe, FilterSet};

/// Filter engine
pub struct FilterEngine;

impl FilterEngine {
    /// Keep cafés that satisfy every enabled predicate, in input order
    pub fn apply_filters(cafes: &[Cafe], filters: &FilterSet) -> Vec<Cafe> {
        if filters.is_empty() {
            return cafes.to_vec();
        }

        cafes
            .iter()
            .filter(|cafe| Self::matches(cafe, filters))
            .cloned()
            .collect()
    }

    /// Open-now requires a known open state; unknown is excluded
    pub fn matches(cafe: &Cafe, filters: &FilterSet) -> bool {
        (!filters.open_now || cafe.is_open == Some(true))
            && (!filters.wifi || cafe.amenities.wifi)
            && (!filters.outdoor || cafe.amenities.outdoor_seating)
            && (!filters.takeaway || cafe.amenities.takeaway)
    }
}
