use thiserror::Error;

/// Errors returned by the geocoding and amenity providers.
///
/// At the batch layer every variant is a soft failure: a failed geocode
/// degrades the listing, a failed amenity query degrades one category.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// HTTP 429; the provider asked us to back off.
    #[error("rate limited by {provider} (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A provider field did not hold the expected kind of value.
    #[error("malformed provider payload: {0}")]
    Malformed(String),

    /// The geocoder resolved nothing for the query.
    #[error("no geocoding result for query: {query}")]
    NoResult { query: String },

    /// A provider returned a coordinate outside the WGS-84 ranges.
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
