// src/handlers/cafes.rs
// DOCUMENTATION: HTTP handlers for café searches
// PURPOSE: Parse requests, call the search service, return responses

use crate::errors::CafeError;
use crate::models::{
    GeolocationOptions, LocationSearchRequest, MapQuery, NameSearchQuery, NearbySearchRequest,
    RefineRequest,
};
use crate::services::CafeSearchService;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

fn validate<T: Validate>(req: &T) -> Result<(), CafeError> {
    req.validate()
        .map_err(|e| CafeError::ValidationError(e.to_string()))
}

/// POST /cafes/search
/// Geocode a place name and list cafés around it
pub async fn search_cafes(
    service: web::Data<CafeSearchService>,
    req: web::Json<LocationSearchRequest>,
) -> Result<impl Responder, CafeError> {
    validate(&*req)?;

    let result = service
        .search_by_query(&req.session, &req.query, req.radius, req.filters)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /cafes/nearby
/// List cafés around a device position (or surface the provider's error)
pub async fn search_nearby(
    service: web::Data<CafeSearchService>,
    req: web::Json<NearbySearchRequest>,
) -> Result<impl Responder, CafeError> {
    validate(&*req)?;

    let center = req.point()?;
    let result = service
        .search_by_position(&req.session, center, req.radius, req.filters)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /cafes/refine
/// Re-filter the session's last fetch
pub async fn refine_cafes(
    service: web::Data<CafeSearchService>,
    req: web::Json<RefineRequest>,
) -> Result<impl Responder, CafeError> {
    validate(&*req)?;

    let result = service.refine(&req.session, req.filters).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /cafes/by-name
/// Name search within the session's last fetch
pub async fn search_by_name(
    service: web::Data<CafeSearchService>,
    query: web::Query<NameSearchQuery>,
) -> Result<impl Responder, CafeError> {
    validate(&*query)?;

    let result = service.search_by_name(&query.session, &query.term).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /cafes/map
/// GeoJSON FeatureCollection of the session's filtered cafés
pub async fn cafes_map(
    service: web::Data<CafeSearchService>,
    query: web::Query<MapQuery>,
) -> Result<impl Responder, CafeError> {
    validate(&*query)?;

    let collection = service
        .map_features(&query.session, query.filters())
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(collection))
}

/// GET /geolocation/options
/// Settings clients should pass to their geolocation provider
pub async fn geolocation_options() -> impl Responder {
    HttpResponse::Ok().json(GeolocationOptions::recommended())
}

/// Configuration for café routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/geolocation/options", web::get().to(geolocation_options))
        .service(
            web::scope("/cafes")
                .route("/search", web::post().to(search_cafes))
                .route("/nearby", web::post().to(search_nearby))
                .route("/refine", web::post().to(refine_cafes))
                .route("/by-name", web::get().to(search_by_name))
                .route("/map", web::get().to(cafes_map)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GeocodingClient, PoiSearchClient, SearchSessions};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn offline_service() -> web::Data<CafeSearchService> {
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
        web::Data::new(CafeSearchService::new(
            geocoder,
            poi_client,
            Arc::new(SearchSessions::new(60)),
            2000,
            10_000,
        ))
    }

    #[actix_web::test]
    async fn test_empty_query_is_bad_request() {
        let app = test::init_service(App::new().app_data(offline_service()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/cafes/search")
            .set_json(json!({"session": "s1", "query": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_geolocation_error_is_surfaced() {
        let app = test::init_service(App::new().app_data(offline_service()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/cafes/nearby")
            .set_json(json!({"session": "s1", "error": {"code": 3}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "GEOLOCATION_ERROR");
        assert_eq!(body["error"]["reason"], "timeout");
    }

    #[actix_web::test]
    async fn test_name_search_without_location_is_bad_request() {
        let app = test::init_service(App::new().app_data(offline_service()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/cafes/by-name?session=s1&term=blue")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_geolocation_options() {
        let app = test::init_service(App::new().app_data(offline_service()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/geolocation/options")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({"enableHighAccuracy": true, "timeoutMs": 10000, "maximumAgeMs": 300000})
        );
    }
}
