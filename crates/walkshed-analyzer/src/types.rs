use chrono::{DateTime, Utc};
use walkshed_geo::Coordinate;

/// One listing to analyze.
#[derive(Debug, Clone)]
pub struct ListingRecord {
    /// Free-text street address. May be empty.
    pub address: String,
    /// Coarser fallback location (neighborhood or city). May be empty.
    pub location_hint: String,
}

/// Aggregated result for one (listing, category) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryResult {
    pub count: u32,
    /// Distance to the closest matching point, when any matched.
    pub nearest_distance_meters: Option<f64>,
    /// Mean provider rating, when the scoring policy uses ratings.
    pub average_rating: Option<f64>,
    /// Composite score, when the scoring policy computes one.
    pub category_score: Option<f64>,
}

/// Per-listing amenity profile.
///
/// One is emitted for every input listing, including listings whose
/// geocoding failed, and always carries a result for every catalog category,
/// so the output shape is identical across a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityProfile {
    /// Resolved coordinate; `None` when geocoding failed.
    pub coordinate: Option<Coordinate>,
    /// Category results in catalog order.
    pub categories: Vec<(String, CategoryResult)>,
    /// Sum of all category counts.
    pub total_count: u32,
    /// Policy-level overall score, when the policy computes one.
    pub overall_score: Option<f64>,
    pub analyzed_at: DateTime<Utc>,
    /// The run's default search radius, echoed for downstream consumers.
    pub analysis_radius_meters: u32,
}

impl AmenityProfile {
    /// Look up one category's result by key.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&CategoryResult> {
        self.categories
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, result)| result)
    }
}

/// Counters accumulated across one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Listings analyzed and emitted.
    pub listings: u32,
    pub geocoded: u32,
    pub geocode_failures: u32,
    /// Per-category query failures; each degrades one category of one listing.
    pub query_failures: u32,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub stats: BatchStats,
    /// True when a stop request ended the batch before the last listing.
    pub interrupted: bool,
}
