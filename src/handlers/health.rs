// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and session store usage

use crate::services::SearchSessions;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(sessions: web::Data<Arc<SearchSessions>>) -> impl Responder {
    let stats = sessions.stats().await;
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "cafe-finder",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": stats
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_reports_service() {
        let sessions = Arc::new(SearchSessions::new(60));
        sessions.begin("s1").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(sessions))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cafe-finder");
        assert_eq!(body["sessions"]["active_sessions"], 1);
    }
}
