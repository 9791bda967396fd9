// src/services/poi_search_client.rs
// DOCUMENTATION: Overpass API client
// PURPOSE: Fetch café POIs around a point and turn them into sorted Cafe records

use crate::config::Config;
use crate::errors::CafeError;
use crate::models::{Cafe, GeoPoint, RawPoiElement};
use crate::services::enricher::Enricher;
use crate::services::geo_math;
use crate::services::tag_normalizer::TagNormalizer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Overpass API client
/// DOCUMENTATION: One POST per search, no retries. The optional seed pins
/// the enrichment generator; without it every fetch draws fresh values
#[derive(Clone)]
pub struct PoiSearchClient {
    /// HTTP client for making requests
    client: Client,
    /// Interpreter endpoint
    endpoint: String,
    /// `[timeout:N]` placed in every query
    query_timeout_secs: u64,
    /// Fixed enrichment seed, if any
    seed: Option<u64>,
}

/// Response from the Overpass interpreter
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<RawPoiElement>,
    /// Set when the server aborted the query (e.g. its own timeout)
    #[serde(default)]
    pub remark: Option<String>,
}

impl PoiSearchClient {
    /// Create client from application configuration
    pub fn new(config: &Config) -> Result<Self, CafeError> {
        let client = Self::with_endpoint(
            &config.overpass_base_url,
            &config.user_agent,
            Duration::from_secs(config.http_timeout_secs),
            config.overpass_query_timeout_secs,
        )?;
        Ok(client.with_seed(config.enrichment_seed))
    }

    /// Create client against an explicit interpreter endpoint
    pub fn with_endpoint(
        endpoint: &str,
        user_agent: &str,
        timeout: Duration,
        query_timeout_secs: u64,
    ) -> Result<Self, CafeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CafeError::ServiceError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            query_timeout_secs,
            seed: None,
        })
    }

    /// Pin (or unpin) the enrichment generator
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build the Overpass QL query
    /// DOCUMENTATION: Five node selections sharing one around-filter:
    /// - amenity=cafe
    /// - amenity=restaurant with a coffee cuisine
    /// - shop=coffee
    /// - amenity=fast_food with a coffee cuisine
    /// - amenity=bar with a coffee bar tag
    pub fn build_query(&self, center: GeoPoint, radius_m: u32) -> String {
        let around = format!("(around:{},{},{})", radius_m, center.lat(), center.lng());
        format!(
            "[out:json][timeout:{timeout}];\n(\n  node[\"amenity\"=\"cafe\"]{a};\n  node[\"amenity\"=\"restaurant\"][\"cuisine\"~\"coffee\"]{a};\n  node[\"shop\"=\"coffee\"]{a};\n  node[\"amenity\"=\"fast_food\"][\"cuisine\"~\"coffee\"]{a};\n  node[\"amenity\"=\"bar\"][\"bar\"~\"coffee\"]{a};\n);\nout body;",
            timeout = self.query_timeout_secs,
            a = around
        )
    }

    /// Find cafés within `radius_m` meters, nearest first
    ///
    /// # Returns
    /// Possibly empty list, ascending by distance (ties keep response order)
    ///
    /// # Errors
    /// * `InvalidInput` - radius of zero
    /// * `ServiceError` - transport failure, non-2xx status or malformed payload
    pub async fn find_nearby(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<Cafe>, CafeError> {
        let elements = self.fetch_elements(center, radius_m).await?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::build_cafes(center, elements, &mut rng)
    }

    /// Issue the query and return the raw elements
    pub async fn fetch_elements(
        &self,
        center: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<RawPoiElement>, CafeError> {
        if radius_m == 0 {
            return Err(CafeError::InvalidInput(
                "radius must be a positive number of meters".to_string(),
            ));
        }

        let query = self.build_query(center, radius_m);

        log::debug!(
            "Overpass café search: lat={}, lng={}, radius={}",
            center.lat(),
            center.lng(),
            radius_m
        );

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Overpass request failed: {}", e);
                CafeError::ServiceError(format!("Café search request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Overpass API error {}: {}", status, body);
            return Err(CafeError::ServiceError(format!(
                "Overpass API failed: {}",
                status
            )));
        }

        let payload: OverpassResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Overpass response: {}", e);
            CafeError::ServiceError(format!("Café search parse error: {}", e))
        })?;

        if let Some(remark) = payload.remark.as_deref() {
            if remark.contains("runtime error") {
                log::error!("Overpass aborted the query: {}", remark);
                return Err(CafeError::ServiceError(remark.to_string()));
            }
            log::warn!("Overpass remark: {}", remark);
        }

        log::info!("Overpass returned {} elements", payload.elements.len());
        Ok(payload.elements)
    }

    /// Normalize, enrich and sort raw elements
    /// DOCUMENTATION: Distances are measured from `center` and rounded to
    /// whole meters. Sorting is stable, so equal distances keep input order
    pub fn build_cafes<R: Rng + ?Sized>(
        center: GeoPoint,
        elements: Vec<RawPoiElement>,
        rng: &mut R,
    ) -> Result<Vec<Cafe>, CafeError> {
        let mut cafes = Vec::with_capacity(elements.len());

        for element in elements {
            let position = GeoPoint::new(element.lat, element.lon).map_err(|e| {
                CafeError::ServiceError(format!("Element {} has bad coordinates: {}", element.id, e))
            })?;
            let distance = geo_math::distance_meters(center, position).round() as u32;

            let normalized = TagNormalizer::normalize(&element);
            cafes.push(Enricher::enrich(normalized, distance, rng));
        }

        cafes.sort_by_key(|cafe| cafe.distance);
        Ok(cafes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> PoiSearchClient {
        PoiSearchClient::with_endpoint(
            "http://127.0.0.1:9/api/interpreter",
            "cafe-finder-test",
            Duration::from_secs(1),
            25,
        )
        .unwrap()
    }

    /// Element `meters` due north of `center`
    fn element_north_of(center: GeoPoint, id: i64, meters: f64) -> RawPoiElement {
        let degrees = meters / (geo_math::EARTH_RADIUS_M * std::f64::consts::PI / 180.0);
        RawPoiElement {
            id,
            lat: center.lat() + degrees,
            lon: center.lng(),
            tags: HashMap::from([("name".to_string(), format!("Cafe {}", id))]),
        }
    }

    #[test]
    fn test_query_contains_all_categories_and_bounds() {
        let center = GeoPoint::new(48.8566, 2.3522).unwrap();
        let query = client().build_query(center, 2000);

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains(r#"node["amenity"="cafe"](around:2000,48.8566,2.3522);"#));
        assert!(query.contains(r#"node["amenity"="restaurant"]["cuisine"~"coffee"](around:2000,48.8566,2.3522);"#));
        assert!(query.contains(r#"node["shop"="coffee"](around:2000,48.8566,2.3522);"#));
        assert!(query.contains(r#"node["amenity"="fast_food"]["cuisine"~"coffee"](around:2000,48.8566,2.3522);"#));
        assert!(query.contains(r#"node["amenity"="bar"]["bar"~"coffee"](around:2000,48.8566,2.3522);"#));
        assert!(query.trim_end().ends_with("out body;"));
        assert_eq!(query.matches("around:").count(), 5);
    }

    #[test]
    fn test_build_cafes_sorts_by_distance() {
        let center = GeoPoint::new(48.8566, 2.3522).unwrap();
        let elements = vec![
            element_north_of(center, 1, 50.0),
            element_north_of(center, 2, 10.0),
            element_north_of(center, 3, 30.0),
        ];

        let cafes =
            PoiSearchClient::build_cafes(center, elements, &mut StdRng::seed_from_u64(1)).unwrap();

        let distances: Vec<u32> = cafes.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![10, 30, 50]);
        assert_eq!(cafes[0].id, 2);
    }

    #[test]
    fn test_build_cafes_ties_keep_input_order() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let elements = vec![
            element_north_of(center, 30, 100.0),
            element_north_of(center, 10, 100.0),
            element_north_of(center, 20, 5.0),
        ];

        let cafes =
            PoiSearchClient::build_cafes(center, elements, &mut StdRng::seed_from_u64(1)).unwrap();
        let ids: Vec<i64> = cafes.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![20, 30, 10]);
    }

    #[test]
    fn test_build_cafes_rejects_bad_coordinates() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let bad = RawPoiElement {
            id: 1,
            lat: 123.0,
            lon: 0.0,
            tags: HashMap::new(),
        };

        let result = PoiSearchClient::build_cafes(center, vec![bad], &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(CafeError::ServiceError(_))));
    }

    #[tokio::test]
    async fn test_zero_radius_is_rejected() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let result = client().find_nearby(center, 0).await;
        assert!(matches!(result, Err(CafeError::InvalidInput(_))));
    }
}
