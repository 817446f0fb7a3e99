use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so tests can drive it with a pure `HashMap` lookup instead of
/// `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let geocoder_base_url = or_default(
        "WALKSHED_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let overpass_base_url = or_default("WALKSHED_OVERPASS_BASE_URL", "https://overpass-api.de");
    let user_agent = or_default("WALKSHED_USER_AGENT", "walkshed/0.1 (amenity-analysis)");
    let log_level = or_default("WALKSHED_LOG_LEVEL", "info");
    let categories_path = lookup("WALKSHED_CATEGORIES_PATH").ok().map(PathBuf::from);

    let request_timeout_secs = parse_u64("WALKSHED_REQUEST_TIMEOUT_SECS", "25")?;
    let geocode_delay_ms = parse_u64("WALKSHED_GEOCODE_DELAY_MS", "1000")?;
    let query_delay_ms = parse_u64("WALKSHED_QUERY_DELAY_MS", "500")?;
    let analysis_radius_meters = parse_u32("WALKSHED_ANALYSIS_RADIUS_METERS", "1000")?;

    if analysis_radius_meters == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "WALKSHED_ANALYSIS_RADIUS_METERS".to_string(),
            reason: "radius must be positive".to_string(),
        });
    }

    Ok(AppConfig {
        geocoder_base_url,
        overpass_base_url,
        user_agent,
        request_timeout_secs,
        geocode_delay_ms,
        query_delay_ms,
        analysis_radius_meters,
        categories_path,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.overpass_base_url, "https://overpass-api.de");
        assert_eq!(cfg.user_agent, "walkshed/0.1 (amenity-analysis)");
        assert_eq!(cfg.request_timeout_secs, 25);
        assert_eq!(cfg.geocode_delay_ms, 1000);
        assert_eq!(cfg.query_delay_ms, 500);
        assert_eq!(cfg.analysis_radius_meters, 1000);
        assert!(cfg.categories_path.is_none());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn build_app_config_geocoder_base_url_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_GEOCODER_BASE_URL", "http://localhost:8080");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocoder_base_url, "http://localhost:8080");
    }

    #[test]
    fn build_app_config_user_agent_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }

    #[test]
    fn build_app_config_request_timeout_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_request_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WALKSHED_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(WALKSHED_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_geocode_delay_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_GEOCODE_DELAY_MS", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocode_delay_ms, 0);
    }

    #[test]
    fn build_app_config_query_delay_invalid() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_QUERY_DELAY_MS", "half a second");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WALKSHED_QUERY_DELAY_MS"),
            "expected InvalidEnvVar(WALKSHED_QUERY_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_radius_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_ANALYSIS_RADIUS_METERS", "1500");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.analysis_radius_meters, 1500);
    }

    #[test]
    fn build_app_config_radius_rejects_zero() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_ANALYSIS_RADIUS_METERS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WALKSHED_ANALYSIS_RADIUS_METERS"),
            "expected InvalidEnvVar(WALKSHED_ANALYSIS_RADIUS_METERS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_radius_rejects_negative() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_ANALYSIS_RADIUS_METERS", "-5");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WALKSHED_ANALYSIS_RADIUS_METERS"),
            "expected InvalidEnvVar(WALKSHED_ANALYSIS_RADIUS_METERS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_categories_path_set() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_CATEGORIES_PATH", "./config/categories.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.categories_path,
            Some(PathBuf::from("./config/categories.yaml"))
        );
    }

    #[test]
    fn build_app_config_log_level_override() {
        let mut map = HashMap::new();
        map.insert("WALKSHED_LOG_LEVEL", "debug");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "debug");
    }
}
