//! Deterministic offline provider.
//!
//! Stands in for both live services when no network should be touched.
//! Coordinates and point sets are derived from a hash of the query text, so
//! rerunning a batch produces bit-identical output. Supplies ratings so the
//! rated scoring policy is exercisable offline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::coord::{Coordinate, EARTH_RADIUS_METERS};
use crate::error::GeoError;
use crate::provider::{AmenityPoint, AmenityProvider, GeocodeProvider};

/// Demo-area anchor; offline geocodes land in a small box around it.
const BASE: Coordinate = Coordinate {
    latitude: 40.7589,
    longitude: -74.0278,
};
/// Max geocode jitter around the anchor, in degrees.
const JITTER_DEGREES: f64 = 0.02;
const MAX_POINTS_PER_CATEGORY: u32 = 5;

/// Offline implementation of both provider traits.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Stable seed derived from query text.
fn seed_from(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[async_trait::async_trait]
impl GeocodeProvider for OfflineProvider {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeoError> {
        if query.trim().is_empty() {
            return Err(GeoError::NoResult {
                query: query.to_owned(),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed_from(query));
        Ok(Coordinate {
            latitude: BASE.latitude + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
            longitude: BASE.longitude + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
        })
    }
}

#[async_trait::async_trait]
impl AmenityProvider for OfflineProvider {
    async fn search(
        &self,
        center: Coordinate,
        tags: &[String],
        radius_meters: u32,
    ) -> Result<Vec<AmenityPoint>, GeoError> {
        let key = format!(
            "{}|{:.6}|{:.6}|{}",
            tags.join("|"),
            center.latitude,
            center.longitude,
            radius_meters
        );
        let mut rng = StdRng::seed_from_u64(seed_from(&key));

        let label = tags.first().map_or("amenity", String::as_str);
        let count = rng.random_range(0..=MAX_POINTS_PER_CATEGORY);

        let points = (0..count)
            .map(|n| {
                // Place the point at a seeded distance and bearing, keeping it
                // inside the search radius whatever the radius is.
                let distance = f64::from(radius_meters) * rng.random_range(0.025..0.95);
                let bearing = rng.random_range(0.0..std::f64::consts::TAU);
                let delta_lat = (distance * bearing.cos() / EARTH_RADIUS_METERS).to_degrees();
                let delta_lon = (distance * bearing.sin()
                    / (EARTH_RADIUS_METERS * center.latitude.to_radians().cos()))
                .to_degrees();

                let rating = (rng.random_range(3.0..=5.0_f64) * 10.0).round() / 10.0;

                AmenityPoint {
                    coordinate: Coordinate {
                        latitude: center.latitude + delta_lat,
                        longitude: center.longitude + delta_lon,
                    },
                    name: Some(format!("{label} {}", n + 1)),
                    rating: Some(rating),
                }
            })
            .collect();

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::haversine_meters;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[tokio::test]
    async fn geocode_is_deterministic() {
        let provider = OfflineProvider::new();
        let first = provider.geocode("150 River St, Hoboken, NJ").await.unwrap();
        let second = provider.geocode("150 River St, Hoboken, NJ").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn geocode_differs_across_queries() {
        let provider = OfflineProvider::new();
        let a = provider.geocode("150 River St, Hoboken, NJ").await.unwrap();
        let b = provider.geocode("1 Main St, Jersey City, NJ").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn geocode_stays_near_the_anchor() {
        let provider = OfflineProvider::new();
        let coordinate = provider.geocode("somewhere").await.unwrap();
        assert!((coordinate.latitude - BASE.latitude).abs() <= JITTER_DEGREES);
        assert!((coordinate.longitude - BASE.longitude).abs() <= JITTER_DEGREES);
    }

    #[tokio::test]
    async fn geocode_rejects_blank_query() {
        let provider = OfflineProvider::new();
        let result = provider.geocode("  ").await;
        assert!(matches!(result, Err(GeoError::NoResult { .. })));
    }

    #[tokio::test]
    async fn search_is_deterministic() {
        let provider = OfflineProvider::new();
        let center = provider.geocode("150 River St").await.unwrap();
        let first = provider
            .search(center, &tags(&["school", "kindergarten"]), 1000)
            .await
            .unwrap();
        let second = provider
            .search(center, &tags(&["school", "kindergarten"]), 1000)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn search_points_stay_inside_radius() {
        let provider = OfflineProvider::new();
        let center = provider.geocode("150 River St").await.unwrap();
        for key in ["park", "cafe", "bank", "pharmacy", "library"] {
            let points = provider.search(center, &tags(&[key]), 1000).await.unwrap();
            assert!(points.len() <= MAX_POINTS_PER_CATEGORY as usize);
            for point in &points {
                let d = haversine_meters(center, point.coordinate);
                assert!(d <= 1000.0, "{key} point at {d} m");
            }
        }
    }

    #[tokio::test]
    async fn search_ratings_are_plausible() {
        let provider = OfflineProvider::new();
        let center = provider.geocode("150 River St").await.unwrap();
        let points = provider
            .search(center, &tags(&["restaurant"]), 1000)
            .await
            .unwrap();
        for point in &points {
            let rating = point.rating.unwrap();
            assert!((3.0..=5.0).contains(&rating), "rating {rating}");
        }
    }

    #[tokio::test]
    async fn search_names_points_after_the_first_tag() {
        let provider = OfflineProvider::new();
        let center = provider.geocode("150 River St").await.unwrap();
        let points = provider
            .search(center, &tags(&["bar", "pub"]), 1000)
            .await
            .unwrap();
        for point in &points {
            assert!(point.name.as_deref().unwrap().starts_with("bar "));
        }
    }
}
