//! Per-listing amenity analysis.
//!
//! Combines a geocode provider, an amenity provider, and the category catalog
//! into a pipeline that emits one profile per listing, degrading gracefully
//! on provider failures, plus a strictly sequential batch runner.

pub mod pipeline;
pub mod score;
pub mod types;

pub use pipeline::Analyzer;
pub use score::ScoringPolicy;
pub use types::{AmenityProfile, BatchReport, BatchStats, CategoryResult, ListingRecord};
