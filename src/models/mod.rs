// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod cafe;
pub mod location;
pub mod search;

pub use cafe::*;
pub use location::*;
pub use search::*;
