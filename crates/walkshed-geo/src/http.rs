//! Small HTTP helpers shared by the live provider clients.

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Parse a `Retry-After` header as whole seconds. Absent or unparseable
/// headers (including the HTTP-date form) report zero.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
