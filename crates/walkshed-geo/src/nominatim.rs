//! HTTP client for Nominatim-style geocoding endpoints.
//!
//! Wraps `reqwest` with typed error handling and the pacing policy the public
//! Nominatim instance requires. Responses carry `lat`/`lon` as JSON strings;
//! parsing and range checks happen here so the rest of the system only ever
//! sees valid [`Coordinate`]s.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::coord::Coordinate;
use crate::error::GeoError;
use crate::http::retry_after_secs;
use crate::pace::Pacer;
use crate::provider::GeocodeProvider;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Client for a Nominatim `/search` endpoint.
///
/// Use [`NominatimClient::new`] for the public instance or
/// [`NominatimClient::with_base_url`] to point at a mock server in tests.
pub struct NominatimClient {
    client: Client,
    search_url: Url,
    pacer: Pacer,
}

/// One place in a Nominatim search response.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimClient {
    /// Creates a client pointed at the public Nominatim instance.
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

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join("search") appends rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeoError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_url,
            pacer,
        })
    }

    /// Builds the full search URL for a query.
    fn build_search_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("format", "json");
            pairs.append_pair("limit", "1");
        }
        url
    }

    /// Sends one paced search request and parses the place list.
    async fn fetch_places(&self, query: &str) -> Result<Vec<NominatimPlace>, GeoError> {
        self.pacer.wait().await;

        let url = self.build_search_url(query);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoError::RateLimited {
                provider: "nominatim".to_owned(),
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
            context: format!("nominatim search(q={query})"),
            source: e,
        })
    }
}

/// Parse one of Nominatim's string-typed coordinate fields.
fn parse_coordinate_field(raw: &str, field: &str) -> Result<f64, GeoError> {
    raw.parse::<f64>().map_err(|_| {
        GeoError::Malformed(format!("nominatim {field} '{raw}' is not a number"))
    })
}

#[async_trait::async_trait]
impl GeocodeProvider for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeoError> {
        let places = self.fetch_places(query).await?;
        let Some(place) = places.first() else {
            return Err(GeoError::NoResult {
                query: query.to_owned(),
            });
        };

        let latitude = parse_coordinate_field(&place.lat, "lat")?;
        let longitude = parse_coordinate_field(&place.lon, "lon")?;
        Coordinate::checked(latitude, longitude)
    }
}
