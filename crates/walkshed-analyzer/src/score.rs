//! Scoring policies applied to the points found for one category.

use walkshed_geo::{haversine_meters, AmenityPoint, Coordinate};

use crate::types::CategoryResult;

/// Weight of the raw point count in the composite score.
const COUNT_WEIGHT: f64 = 0.3;
/// Weight of the mean rating in the composite score.
const RATING_WEIGHT: f64 = 0.7;

/// How category results are derived from the points a provider returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Count the points and keep the distance to the closest one.
    Detailed,
    /// Count the points and blend count with mean rating into a 0.3/0.7
    /// composite, plus an overall mean across categories.
    RatedComposite,
}

impl ScoringPolicy {
    /// Aggregate one category's points into a result.
    #[must_use]
    pub fn score_category(self, center: Coordinate, points: &[AmenityPoint]) -> CategoryResult {
        if points.is_empty() {
            return self.empty_category();
        }
        let count = u32::try_from(points.len()).unwrap_or(u32::MAX);
        match self {
            Self::Detailed => {
                let nearest = points
                    .iter()
                    .map(|point| haversine_meters(center, point.coordinate))
                    .fold(f64::INFINITY, f64::min);
                CategoryResult {
                    count,
                    nearest_distance_meters: Some(nearest),
                    ..CategoryResult::default()
                }
            }
            Self::RatedComposite => {
                // Unrated points drag the mean down rather than being skipped.
                let mean = points
                    .iter()
                    .map(|point| point.rating.unwrap_or(0.0))
                    .sum::<f64>()
                    / f64::from(count);
                let score = f64::from(count) * COUNT_WEIGHT + mean * RATING_WEIGHT;
                CategoryResult {
                    count,
                    nearest_distance_meters: None,
                    average_rating: Some(round_2(mean)),
                    category_score: Some(round_2(score)),
                }
            }
        }
    }

    /// The result recorded when a category has no points, including when the
    /// query for it failed or geocoding failed outright.
    #[must_use]
    pub fn empty_category(self) -> CategoryResult {
        match self {
            Self::Detailed => CategoryResult::default(),
            Self::RatedComposite => CategoryResult {
                average_rating: Some(0.0),
                category_score: Some(0.0),
                ..CategoryResult::default()
            },
        }
    }

    /// Listing-level score across all category results, for policies that
    /// define one.
    #[must_use]
    pub fn overall_score<'a>(
        self,
        results: impl IntoIterator<Item = &'a CategoryResult>,
    ) -> Option<f64> {
        match self {
            Self::Detailed => None,
            Self::RatedComposite => {
                let mut total = 0.0;
                let mut considered = 0u32;
                for result in results {
                    total += result.category_score.unwrap_or(0.0);
                    considered += 1;
                }
                if considered == 0 {
                    None
                } else {
                    Some(round_2(total / f64::from(considered)))
                }
            }
        }
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
