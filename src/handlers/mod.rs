// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod cafes;
pub mod favorites;
pub mod health;

pub use cafes::config as cafes_config;
pub use favorites::config as favorites_config;
pub use health::config as health_config;
