// src/services/geocoding_client.rs
// DOCUMENTATION: Nominatim geocoding client
// PURPOSE: Resolve place names to coordinates and coordinates to display labels

use crate::config::Config;
use crate::errors::CafeError;
use crate::models::{GeoPoint, PlaceLabel, ResolvedLocation};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Nominatim geocoding client
/// DOCUMENTATION: Holds no per-request state. Clones share the HTTP
/// connection pool and the request pacer
#[derive(Clone)]
pub struct GeocodingClient {
    /// HTTP client for making requests
    client: Client,
    /// Nominatim base URL (no trailing slash)
    base_url: String,
    /// Paces requests to the provider's usage policy
    limiter: Arc<DefaultDirectRateLimiter>,
}

/// One candidate from `/search`
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string
    pub lat: String,
    /// Longitude as a decimal string
    pub lon: String,
    pub display_name: String,
    pub address: Option<BTreeMap<String, String>>,
}

/// Response from `/reverse`
/// DOCUMENTATION: Nominatim answers 200 with an `error` field when nothing is found
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    pub display_name: Option<String>,
    pub address: Option<BTreeMap<String, String>>,
    pub error: Option<String>,
}

impl GeocodingClient {
    /// Create client from application configuration
    pub fn new(config: &Config) -> Result<Self, CafeError> {
        Self::with_base_url(
            &config.nominatim_base_url,
            &config.user_agent,
            Duration::from_secs(config.http_timeout_secs),
            config.geocoder_requests_per_second,
        )
    }

    /// Create client against an explicit endpoint
    /// DOCUMENTATION: `requests_per_second` of 0 is treated as 1
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self, CafeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CafeError::ServiceError(format!("HTTP client setup failed: {}", e)))?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
        })
    }

    /// Resolve a free-text query to its best match
    ///
    /// # Errors
    /// * `InvalidInput` - query is empty or whitespace
    /// * `NotFound` - the geocoder returned no candidates
    /// * `ServiceError` - transport failure, non-2xx status or malformed payload
    pub async fn forward_geocode(&self, query: &str) -> Result<ResolvedLocation, CafeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CafeError::InvalidInput(
                "location query must not be empty".to_string(),
            ));
        }

        let url = format!("{}/search", self.base_url);
        let params = [
            ("format", "json"),
            ("q", query),
            ("limit", "1"),
            ("addressdetails", "1"),
        ];

        log::debug!("Nominatim forward geocode: q={}", query);

        self.limiter.until_ready().await;
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Nominatim search request failed: {}", e);
                CafeError::ServiceError(format!("Geocoding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Nominatim search error {}", status);
            return Err(CafeError::ServiceError(format!(
                "Geocoding failed: {}",
                status
            )));
        }

        let candidates: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            log::error!("Failed to parse Nominatim search response: {}", e);
            CafeError::ServiceError(format!("Geocoding parse error: {}", e))
        })?;

        let best = candidates.into_iter().next().ok_or_else(|| {
            log::info!("Nominatim found no match for {:?}", query);
            CafeError::NotFound(query.to_string())
        })?;

        let point = Self::parse_point(&best.lat, &best.lon)?;
        log::info!("Geocoded {:?} to {}", query, point.label());

        Ok(ResolvedLocation::new(point, best.display_name, best.address))
    }

    /// Look up a display label for a coordinate
    ///
    /// # Errors
    /// * `ServiceError` - transport failure, non-2xx status, malformed payload
    ///   or a provider-side "unable to geocode"
    pub async fn reverse_geocode(&self, point: GeoPoint) -> Result<PlaceLabel, CafeError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = point.lat().to_string();
        let lon = point.lng().to_string();
        let params = [
            ("format", "json"),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("addressdetails", "1"),
        ];

        log::debug!("Nominatim reverse geocode: lat={}, lon={}", lat, lon);

        self.limiter.until_ready().await;
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Nominatim reverse request failed: {}", e);
                CafeError::ServiceError(format!("Reverse geocoding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Nominatim reverse error {}", status);
            return Err(CafeError::ServiceError(format!(
                "Reverse geocoding failed: {}",
                status
            )));
        }

        let body: NominatimReverse = response.json().await.map_err(|e| {
            CafeError::ServiceError(format!("Reverse geocoding parse error: {}", e))
        })?;

        match (body.display_name, body.error) {
            (Some(display_name), None) => Ok(PlaceLabel {
                display_name,
                address: body.address,
            }),
            (_, Some(error)) => Err(CafeError::ServiceError(format!(
                "Reverse geocoding failed: {}",
                error
            ))),
            (None, None) => Err(CafeError::ServiceError(
                "Reverse geocoding returned no display name".to_string(),
            )),
        }
    }

    /// Nominatim sends coordinates as decimal strings
    fn parse_point(lat: &str, lon: &str) -> Result<GeoPoint, CafeError> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CafeError::ServiceError(format!("Invalid latitude: {:?}", lat)))?;
        let lng: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CafeError::ServiceError(format!("Invalid longitude: {:?}", lon)))?;

        GeoPoint::new(lat, lng).map_err(|e| CafeError::ServiceError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = GeocodingClient::parse_point("48.8588897", "2.3200410").unwrap();
        assert_eq!(point.lat(), 48.8588897);
        assert_eq!(point.lng(), 2.3200410);

        assert!(matches!(
            GeocodingClient::parse_point("north", "2.32"),
            Err(CafeError::ServiceError(_))
        ));
        assert!(matches!(
            GeocodingClient::parse_point("95.0", "2.32"),
            Err(CafeError::ServiceError(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_any_request() {
        // Port 9 (discard) is never contacted because validation fails first
        let client = GeocodingClient::with_base_url(
            "http://127.0.0.1:9",
            "cafe-finder-test",
            Duration::from_secs(1),
            1,
        )
        .unwrap();

        let result = client.forward_geocode("   ").await;
        assert!(matches!(result, Err(CafeError::InvalidInput(_))));
    }
}
