// src/services/cafe_search_service.rs
// DOCUMENTATION: Business logic for café searches
// PURPOSE: Chain geocoding, POI fetch, filtering and name search per UI session

use crate::config::Config;
use crate::errors::CafeError;
use crate::models::{
    to_feature_collection, FilterSet, GeoPoint, ResolvedLocation, SearchResponse,
};
use crate::services::filter_engine::FilterEngine;
use crate::services::geocoding_client::GeocodingClient;
use crate::services::local_search::LocalSearchEngine;
use crate::services::poi_search_client::PoiSearchClient;
use crate::services::search_sessions::{SearchSessions, SearchTicket, SessionSnapshot};
use geojson::FeatureCollection;
use std::sync::Arc;

/// Café search service
/// DOCUMENTATION: The clients are stateless; the only shared state is the
/// session store, which remembers each session's latest full fetch so that
/// refinements and name searches don't hit the network
pub struct CafeSearchService {
    geocoder: GeocodingClient,
    poi_client: PoiSearchClient,
    sessions: Arc<SearchSessions>,
    default_radius_m: u32,
    max_radius_m: u32,
}

impl CafeSearchService {
    pub fn new(
        geocoder: GeocodingClient,
        poi_client: PoiSearchClient,
        sessions: Arc<SearchSessions>,
        default_radius_m: u32,
        max_radius_m: u32,
    ) -> Self {
        Self {
            geocoder,
            poi_client,
            sessions,
            default_radius_m,
            max_radius_m,
        }
    }

    /// Build clients from configuration
    pub fn from_config(config: &Config, sessions: Arc<SearchSessions>) -> Result<Self, CafeError> {
        Ok(Self::new(
            GeocodingClient::new(config)?,
            PoiSearchClient::new(config)?,
            sessions,
            config.default_radius_m,
            config.max_radius_m,
        ))
    }

    /// Default when absent; must lie in 1..=max
    pub fn resolve_radius(&self, radius: Option<u32>) -> Result<u32, CafeError> {
        let radius = radius.unwrap_or(self.default_radius_m);
        if radius == 0 || radius > self.max_radius_m {
            return Err(CafeError::ValidationError(format!(
                "radius must be between 1 and {} meters",
                self.max_radius_m
            )));
        }
        Ok(radius)
    }

    /// Search cafés around a place name
    /// DOCUMENTATION: Geocoding failures (including no match) end the search
    /// before any café lookup is made
    pub async fn search_by_query(
        &self,
        session: &str,
        query: &str,
        radius: Option<u32>,
        filters: FilterSet,
    ) -> Result<SearchResponse, CafeError> {
        let radius = self.resolve_radius(radius)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(CafeError::InvalidInput(
                "location query must not be empty".to_string(),
            ));
        }

        let ticket = self.sessions.begin(session).await;
        let location = self.geocoder.forward_geocode(query).await?;
        let center = location.point()?;

        self.fetch_and_store(ticket, location, center, radius, filters)
            .await
    }

    /// Search cafés around a device position
    /// DOCUMENTATION: A failed reverse geocode never aborts the search; the
    /// location is labelled with its coordinates instead
    pub async fn search_by_position(
        &self,
        session: &str,
        center: GeoPoint,
        radius: Option<u32>,
        filters: FilterSet,
    ) -> Result<SearchResponse, CafeError> {
        let radius = self.resolve_radius(radius)?;
        let ticket = self.sessions.begin(session).await;

        let location = match self.geocoder.reverse_geocode(center).await {
            Ok(label) => ResolvedLocation::new(center, label.display_name, label.address),
            Err(e) => {
                log::warn!(
                    "Reverse geocoding failed for {}, using coordinates: {}",
                    center.label(),
                    e
                );
                ResolvedLocation::from_coordinates(center)
            }
        };

        self.fetch_and_store(ticket, location, center, radius, filters)
            .await
    }

    async fn fetch_and_store(
        &self,
        ticket: SearchTicket,
        location: ResolvedLocation,
        center: GeoPoint,
        radius: u32,
        filters: FilterSet,
    ) -> Result<SearchResponse, CafeError> {
        // A newer search already started; skip the café lookup entirely
        if !self.sessions.is_current(&ticket).await {
            return Err(CafeError::Superseded);
        }

        let cafes = self.poi_client.find_nearby(center, radius).await?;
        let unfiltered_total = cafes.len();
        let filtered = FilterEngine::apply_filters(&cafes, &filters);

        log::info!(
            "Session {}: {} cafés near {:?} ({} after filters)",
            ticket.session(),
            unfiltered_total,
            location.display_name,
            filtered.len()
        );

        let snapshot = SessionSnapshot {
            location: location.clone(),
            cafes,
            radius,
        };
        if !self.sessions.complete(&ticket, snapshot).await {
            return Err(CafeError::Superseded);
        }

        Ok(SearchResponse::new(location, filtered, unfiltered_total, radius))
    }

    async fn snapshot(&self, session: &str) -> Result<SessionSnapshot, CafeError> {
        self.sessions.get(session).await.ok_or_else(|| {
            CafeError::InvalidInput("search for a location first".to_string())
        })
    }

    /// Re-apply attribute filters to the session's last fetch
    pub async fn refine(&self, session: &str, filters: FilterSet) -> Result<SearchResponse, CafeError> {
        let snapshot = self.snapshot(session).await?;
        let filtered = FilterEngine::apply_filters(&snapshot.cafes, &filters);

        Ok(SearchResponse::new(
            snapshot.location,
            filtered,
            snapshot.cafes.len(),
            snapshot.radius,
        ))
    }

    /// Name search over the session's full, unfiltered fetch
    pub async fn search_by_name(&self, session: &str, term: &str) -> Result<SearchResponse, CafeError> {
        let snapshot = self.snapshot(session).await?;
        let found = LocalSearchEngine::filter_by_name(&snapshot.cafes, term);

        if found.is_empty() {
            log::info!("Session {}: no cafés match {:?}", session, term.trim());
        }

        Ok(SearchResponse::new(
            snapshot.location,
            found,
            snapshot.cafes.len(),
            snapshot.radius,
        ))
    }

    /// Filtered café list of the session as GeoJSON
    pub async fn map_features(
        &self,
        session: &str,
        filters: FilterSet,
    ) -> Result<FeatureCollection, CafeError> {
        let snapshot = self.snapshot(session).await?;
        let filtered = FilterEngine::apply_filters(&snapshot.cafes, &filters);
        Ok(to_feature_collection(&filtered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::cafe;
    use std::time::Duration;

    /// Service whose clients point at a closed port; only offline paths are exercised
    fn offline_service(sessions: Arc<SearchSessions>) -> CafeSearchService {
        let geocoder = GeocodingClient::with_base_url(
            "http://127.0.0.1:9",
            "cafe-finder-test",
            Duration::from_secs(1),
            1,
        )
        .unwrap();
        let poi_client = PoiSearchClient::with_endpoint(
            "http://127.0.0.1:9/api/interpreter",
            "cafe-finder-test",
            Duration::from_secs(1),
            25,
        )
        .unwrap();
        CafeSearchService::new(geocoder, poi_client, sessions, 2000, 10_000)
    }

    async fn seeded_session(sessions: &SearchSessions, session: &str) {
        let mut wifi = cafe(1, "Blue Bottle Coffee", 50);
        wifi.amenities.wifi = true;
        let mut open = cafe(2, "Night Owl", 900);
        open.is_open = Some(true);
        let plain = cafe(3, "Corner Espresso", 1800);

        let ticket = sessions.begin(session).await;
        let point = GeoPoint::new(48.8566, 2.3522).unwrap();
        sessions
            .complete(
                &ticket,
                SessionSnapshot {
                    location: ResolvedLocation::new(point, "Paris".to_string(), None),
                    cafes: vec![wifi, open, plain],
                    radius: 2000,
                },
            )
            .await;
    }

    #[test]
    fn test_resolve_radius() {
        let service = offline_service(Arc::new(SearchSessions::new(60)));
        assert_eq!(service.resolve_radius(None).unwrap(), 2000);
        assert_eq!(service.resolve_radius(Some(500)).unwrap(), 500);
        assert!(matches!(
            service.resolve_radius(Some(0)),
            Err(CafeError::ValidationError(_))
        ));
        assert!(matches!(
            service.resolve_radius(Some(10_001)),
            Err(CafeError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_query_is_invalid_input() {
        let service = offline_service(Arc::new(SearchSessions::new(60)));
        let result = service
            .search_by_query("s1", "  ", None, FilterSet::default())
            .await;
        assert!(matches!(result, Err(CafeError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_refine_and_name_search_need_a_prior_search() {
        let service = offline_service(Arc::new(SearchSessions::new(60)));

        assert!(matches!(
            service.refine("nobody", FilterSet::default()).await,
            Err(CafeError::InvalidInput(_))
        ));
        assert!(matches!(
            service.search_by_name("nobody", "blue").await,
            Err(CafeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_refine_filters_full_set_without_network() {
        let sessions = Arc::new(SearchSessions::new(60));
        seeded_session(&sessions, "s1").await;
        let service = offline_service(sessions);

        let wifi_only = FilterSet {
            wifi: true,
            ..FilterSet::default()
        };
        let response = service.refine("s1", wifi_only).await.unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.unfiltered_total, 3);
        assert_eq!(response.cafes[0].name, "Blue Bottle Coffee");

        // Filters replace each other; they never narrow the stored set
        let open_only = FilterSet {
            open_now: true,
            ..FilterSet::default()
        };
        let response = service.refine("s1", open_only).await.unwrap();
        assert_eq!(response.cafes[0].name, "Night Owl");
    }

    #[tokio::test]
    async fn test_name_search_uses_unfiltered_set() {
        let sessions = Arc::new(SearchSessions::new(60));
        seeded_session(&sessions, "s1").await;
        let service = offline_service(sessions);

        let response = service.search_by_name("s1", "ESPRESSO").await.unwrap();
        // "Espresso" is a fixture specialty of every café; order stays by distance
        let distances: Vec<u32> = response.cafes.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![50, 900, 1800]);

        let response = service.search_by_name("s1", "zzz").await.unwrap();
        assert!(response.cafes.is_empty());
        assert_eq!(response.unfiltered_total, 3);
    }

    #[tokio::test]
    async fn test_map_features_follow_filters() {
        let sessions = Arc::new(SearchSessions::new(60));
        seeded_session(&sessions, "s1").await;
        let service = offline_service(sessions);

        let collection = service
            .map_features(
                "s1",
                FilterSet {
                    open_now: true,
                    ..FilterSet::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[tokio::test]
    async fn test_position_search_survives_reverse_geocode_failure() {
        // Both endpoints are unreachable: the reverse lookup failure is absorbed,
        // the café lookup failure is surfaced
        let service = offline_service(Arc::new(SearchSessions::new(60)));
        let center = GeoPoint::new(41.3874, 2.1686).unwrap();

        let result = service
            .search_by_position("s1", center, Some(1000), FilterSet::default())
            .await;
        assert!(matches!(result, Err(CafeError::ServiceError(_))));
    }
}
