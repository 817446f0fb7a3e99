use std::path::PathBuf;

/// Runtime configuration assembled from `WALKSHED_*` environment variables.
///
/// Built by [`crate::config::load_app_config`]; every field has a default so
/// the analyzer runs against the public OSM services out of the box.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Nominatim-style geocoding service.
    pub geocoder_base_url: String,
    /// Base URL of the Overpass interpreter service.
    pub overpass_base_url: String,
    /// User-Agent sent with every provider request. Nominatim's usage policy
    /// requires an identifying agent.
    pub user_agent: String,
    /// Per-request timeout for both providers.
    pub request_timeout_secs: u64,
    /// Minimum delay before each geocoding request.
    pub geocode_delay_ms: u64,
    /// Minimum delay before each amenity query.
    pub query_delay_ms: u64,
    /// Default search radius for categories that do not override it.
    pub analysis_radius_meters: u32,
    /// Optional YAML file overriding the built-in category catalog.
    pub categories_path: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}
