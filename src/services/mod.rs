// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cafe_search_service;
pub mod enricher;
pub mod favorites;
pub mod filter_engine;
pub mod geo_math;
pub mod geocoding_client;
pub mod local_search;
pub mod poi_search_client;
pub mod search_sessions;
pub mod tag_normalizer;

pub use cafe_search_service::*;
pub use enricher::*;
pub use favorites::*;
pub use filter_engine::*;
pub use geo_math::*;
pub use geocoding_client::*;
pub use local_search::*;
pub use poi_search_client::*;
pub use search_sessions::*;
pub use tag_normalizer::*;
