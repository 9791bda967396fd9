// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Nominatim instance used for forward and reverse geocoding
    pub nominatim_base_url: String,

    /// Overpass interpreter endpoint used for café lookups
    pub overpass_base_url: String,

    /// User-Agent sent to every external service
    pub user_agent: String,

    /// Hard network-level timeout in seconds
    pub http_timeout_secs: u64,

    /// Server-side processing bound embedded in every Overpass query
    pub overpass_query_timeout_secs: u64,

    /// Geocoder pacing (Nominatim allows one request per second)
    pub geocoder_requests_per_second: u32,

    /// Radius used when a request doesn't carry one
    pub default_radius_m: u32,

    /// Largest radius a request may ask for
    pub max_radius_m: u32,

    /// JSON file backing the favorites store
    pub favorites_path: String,

    /// How long an idle search session is kept in memory
    pub session_ttl_secs: u64,

    /// Pins the enrichment generator when set (demo and test deployments)
    pub enrichment_seed: Option<u64>,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: var_or("SERVER_ADDRESS", "127.0.0.1"),
            server_port: parse_or("SERVER_PORT", 8003),
            environment: var_or("ENVIRONMENT", "development"),
            log_level: var_or("LOG_LEVEL", "info"),
            nominatim_base_url: var_or(
                "NOMINATIM_BASE_URL",
                "https://nominatim.openstreetmap.org",
            ),
            overpass_base_url: var_or(
                "OVERPASS_BASE_URL",
                "https://overpass-api.de/api/interpreter",
            ),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| format!("cafe-finder/{}", env!("CARGO_PKG_VERSION"))),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 30),
            overpass_query_timeout_secs: parse_or("OVERPASS_QUERY_TIMEOUT_SECS", 25),
            geocoder_requests_per_second: parse_or("GEOCODER_REQUESTS_PER_SECOND", 1),
            default_radius_m: parse_or("DEFAULT_RADIUS_M", 2000),
            max_radius_m: parse_or("MAX_RADIUS_M", 10_000),
            favorites_path: var_or("FAVORITES_PATH", "favorites.json"),
            session_ttl_secs: parse_or("SESSION_TTL_SECS", 3600),
            enrichment_seed: env::var("ENRICHMENT_SEED")
                .ok()
                .and_then(|value| value.trim().parse().ok()),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.nominatim_base_url.is_empty() {
            return Err("NOMINATIM_BASE_URL is required".to_string());
        }

        if self.overpass_base_url.is_empty() {
            return Err("OVERPASS_BASE_URL is required".to_string());
        }

        if self.http_timeout_secs == 0 || self.overpass_query_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS and OVERPASS_QUERY_TIMEOUT_SECS must be positive".to_string());
        }

        if self.default_radius_m == 0 || self.default_radius_m > self.max_radius_m {
            return Err(format!(
                "DEFAULT_RADIUS_M must be between 1 and {}",
                self.max_radius_m
            ));
        }

        if self.overpass_query_timeout_secs >= self.http_timeout_secs {
            log::warn!(
                "OVERPASS_QUERY_TIMEOUT_SECS ({}) is not below HTTP_TIMEOUT_SECS ({}) - slow queries will surface as network timeouts",
                self.overpass_query_timeout_secs,
                self.http_timeout_secs
            );
        }

        if self.enrichment_seed.is_some() {
            log::warn!("ENRICHMENT_SEED is set - enrichment fields will repeat across fetches");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8003,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            nominatim_base_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_base_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: format!("cafe-finder/{}", env!("CARGO_PKG_VERSION")),
            http_timeout_secs: 30,
            overpass_query_timeout_secs: 25,
            geocoder_requests_per_second: 1,
            default_radius_m: 2000,
            max_radius_m: 10_000,
            favorites_path: "favorites.json".to_string(),
            session_ttl_secs: 3600,
            enrichment_seed: None,
        }
    }
}
