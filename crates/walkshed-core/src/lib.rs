//! Shared configuration for the walkshed amenity analyzer.
//!
//! Provides the env-derived application config and the amenity category
//! catalog (built-in defaults plus optional YAML overrides) consumed by the
//! geo clients and the batch analyzer.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, AmenityCategory, Catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
