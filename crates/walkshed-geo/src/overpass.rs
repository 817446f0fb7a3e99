//! HTTP client for Overpass API interpreter endpoints.
//!
//! Issues one OverpassQL query per amenity category, OR-ing the category's
//! tag values into a single regex match so a category costs one round-trip
//! regardless of how many tags it covers. Nodes carry coordinates directly;
//! ways are asked for their center point.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::coord::Coordinate;
use crate::error::GeoError;
use crate::http::retry_after_secs;
use crate::pace::Pacer;
use crate::provider::{AmenityPoint, AmenityProvider};

const DEFAULT_BASE_URL: &str = "https://overpass-api.de/";
/// Server-side query timeout baked into the OverpassQL header.
const SERVER_TIMEOUT_SECS: u32 = 20;

/// Client for an Overpass `api/interpreter` endpoint.
///
/// Use [`OverpassClient::new`] for the public instance or
/// [`OverpassClient::with_base_url`] to point at a mock server in tests.
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
    pacer: Pacer,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassTags {
    name: Option<String>,
}

impl OverpassClient {
    /// Creates a client pointed at the public Overpass instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64, pacer: Pacer) -> Result<Self, GeoError> {
        Self::with_base_url(user_agent, timeout_secs, pacer, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`GeoError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        pacer: Pacer,
        base_url: &str,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let interpreter_url = Url::parse(&normalised)
            .and_then(|base| base.join("api/interpreter"))
            .map_err(|e| GeoError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            interpreter_url,
            pacer,
        })
    }
}

/// Render the OverpassQL query for one category.
fn build_query(center: Coordinate, tags: &[String], radius_meters: u32) -> String {
    let pattern = tags.join("|");
    let around = format!(
        "(around:{},{},{})",
        radius_meters, center.latitude, center.longitude
    );
    format!(
        "[out:json][timeout:{SERVER_TIMEOUT_SECS}];\n(\n  node[\"amenity\"~\"{pattern}\"]{around};\n  way[\"amenity\"~\"{pattern}\"]{around};\n);\nout center;"
    )
}

/// Extract a point from one response element. Elements without usable
/// coordinates are dropped rather than failing the whole category.
fn element_point(element: OverpassElement) -> Option<AmenityPoint> {
    let (latitude, longitude) = match (element.lat, element.lon, element.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };
    let coordinate = Coordinate::checked(latitude, longitude).ok()?;
    Some(AmenityPoint {
        coordinate,
        name: element.tags.name,
        rating: None,
    })
}

#[async_trait::async_trait]
impl AmenityProvider for OverpassClient {
    async fn search(
        &self,
        center: Coordinate,
        tags: &[String],
        radius_meters: u32,
    ) -> Result<Vec<AmenityPoint>, GeoError> {
        self.pacer.wait().await;

        let query = build_query(center, tags, radius_meters);
        let response = self
            .client
            .post(self.interpreter_url.clone())
            .body(query)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoError::RateLimited {
                provider: "overpass".to_owned(),
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.interpreter_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
                context: format!("overpass search(tags={})", tags.join("|")),
                source: e,
            })?;

        Ok(parsed.elements.into_iter().filter_map(element_point).collect())
    }
}
