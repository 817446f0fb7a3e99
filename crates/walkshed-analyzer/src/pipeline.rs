//! Listing analysis pipeline.
//!
//! Listings are processed strictly one at a time, and every failure short of
//! an output error is soft: a listing that cannot be geocoded, or a category
//! whose query fails, degrades to empty results while the batch keeps going.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use walkshed_core::Catalog;
use walkshed_geo::{resolve, AmenityProvider, GeocodeProvider};

use crate::score::ScoringPolicy;
use crate::types::{AmenityProfile, BatchReport, BatchStats, ListingRecord};

/// Runs the geocode-then-query-then-score pipeline for listings.
pub struct Analyzer {
    geocoder: Arc<dyn GeocodeProvider>,
    amenities: Arc<dyn AmenityProvider>,
    catalog: Catalog,
    policy: ScoringPolicy,
    analysis_radius_meters: u32,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn GeocodeProvider>,
        amenities: Arc<dyn AmenityProvider>,
        catalog: Catalog,
        policy: ScoringPolicy,
        analysis_radius_meters: u32,
    ) -> Self {
        Self {
            geocoder,
            amenities,
            catalog,
            policy,
            analysis_radius_meters,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Analyze one listing, producing a profile with a result for every
    /// catalog category.
    ///
    /// Never fails: geocoding errors yield a profile without a coordinate and
    /// with every category empty, and a failed category query degrades just
    /// that category. Both outcomes are tallied in `stats`.
    pub async fn analyze_listing(
        &self,
        listing: &ListingRecord,
        stats: &mut BatchStats,
    ) -> AmenityProfile {
        self.analyze_listing_at(listing, Utc::now(), stats).await
    }

    async fn analyze_listing_at(
        &self,
        listing: &ListingRecord,
        analyzed_at: DateTime<Utc>,
        stats: &mut BatchStats,
    ) -> AmenityProfile {
        let coordinate = match resolve(
            self.geocoder.as_ref(),
            &listing.address,
            &listing.location_hint,
        )
        .await
        {
            Ok(coordinate) => {
                stats.geocoded += 1;
                Some(coordinate)
            }
            Err(error) => {
                stats.geocode_failures += 1;
                tracing::warn!(
                    address = %listing.address,
                    error = %error,
                    "geocoding failed, emitting empty profile"
                );
                None
            }
        };

        let mut categories = Vec::with_capacity(self.catalog.len());
        for category in &self.catalog {
            let result = match coordinate {
                Some(center) => {
                    match self
                        .amenities
                        .search(center, &category.tags, category.radius_meters)
                        .await
                    {
                        Ok(points) => self.policy.score_category(center, &points),
                        Err(error) => {
                            stats.query_failures += 1;
                            tracing::warn!(
                                category = %category.key,
                                error = %error,
                                "amenity query failed, recording empty category"
                            );
                            self.policy.empty_category()
                        }
                    }
                }
                None => self.policy.empty_category(),
            };
            categories.push((category.key.clone(), result));
        }

        let total_count = categories.iter().map(|(_, result)| result.count).sum();
        let overall_score = self
            .policy
            .overall_score(categories.iter().map(|(_, result)| result));

        AmenityProfile {
            coordinate,
            categories,
            total_count,
            overall_score,
            analyzed_at,
            analysis_radius_meters: self.analysis_radius_meters,
        }
    }

    /// Analyze `listings` in order, handing each profile to `emit`.
    ///
    /// The stop flag is checked between listings, so a stop request ends the
    /// batch at the next listing boundary with everything emitted so far
    /// intact. `emit` errors are hard failures and abort the batch.
    ///
    /// # Errors
    ///
    /// Returns the first error `emit` produces.
    pub async fn run_batch<F, E>(
        &self,
        listings: &[ListingRecord],
        stop: &AtomicBool,
        mut emit: F,
    ) -> Result<BatchReport, E>
    where
        F: FnMut(usize, AmenityProfile) -> Result<(), E>,
    {
        let mut stats = BatchStats::default();
        let mut interrupted = false;

        for (index, listing) in listings.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                tracing::info!(completed = index, "stop requested, ending batch early");
                interrupted = true;
                break;
            }

            tracing::info!(
                listing = index + 1,
                total = listings.len(),
                address = %listing.address,
                "analyzing listing"
            );
            let profile = self.analyze_listing(listing, &mut stats).await;
            stats.listings += 1;
            emit(index, profile)?;
        }

        Ok(BatchReport { stats, interrupted })
    }
}
