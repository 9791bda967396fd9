// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the café discovery pipeline

use crate::models::GeolocationFailure;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure the pipeline can surface to a caller.
/// Each variant maps to an HTTP status code and a JSON error body
#[derive(Error, Debug)]
pub enum CafeError {
    /// Empty or otherwise unusable caller input (e.g. blank query)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The geocoder found zero matches
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Non-success response or malformed payload from an external service
    #[error("External service error: {0}")]
    ServiceError(String),

    /// Failure reported by the client's geolocation provider
    #[error("Geolocation error: {0}")]
    Geolocation(GeolocationFailure),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A newer search started for the same session before this one finished
    #[error("Search superseded by a newer request")]
    Superseded,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CafeError {
    fn code(&self) -> &'static str {
        match self {
            CafeError::InvalidInput(_) => "INVALID_INPUT",
            CafeError::NotFound(_) => "NOT_FOUND",
            CafeError::ServiceError(_) => "SERVICE_ERROR",
            CafeError::Geolocation(_) => "GEOLOCATION_ERROR",
            CafeError::ValidationError(_) => "VALIDATION_ERROR",
            CafeError::Superseded => "SUPERSEDED",
            CafeError::StorageError(_) => "STORAGE_ERROR",
        }
    }
}

/// Convert CafeError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for CafeError {
    fn error_response(&self) -> HttpResponse {
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if let CafeError::Geolocation(failure) = self {
            error["reason"] = json!(failure.reason());
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": error }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            CafeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CafeError::NotFound(_) => StatusCode::NOT_FOUND,
            CafeError::ServiceError(_) => StatusCode::BAD_GATEWAY,
            CafeError::Geolocation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CafeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CafeError::Superseded => StatusCode::CONFLICT,
            CafeError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
