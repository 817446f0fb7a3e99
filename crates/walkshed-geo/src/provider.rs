//! Provider trait seams for geocoding and amenity search.
//!
//! The live Nominatim/Overpass clients, the deterministic offline provider,
//! and test stubs all implement these, so the analyzer never knows which one
//! it is talking to.

use async_trait::async_trait;

use crate::coord::Coordinate;
use crate::error::GeoError;

/// A single point of interest returned by an amenity provider.
///
/// Transient: consumed immediately by the scoring layer, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityPoint {
    pub coordinate: Coordinate,
    /// Display name, when the provider supplies one.
    pub name: Option<String>,
    /// Provider rating, when the provider supplies one (OSM does not).
    pub rating: Option<f64>,
}

/// Resolves free text to a coordinate.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Look up `query` and return the best matching coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::NoResult`] when nothing matches, or another
    /// [`GeoError`] variant on transport/payload failures.
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeoError>;
}

/// Finds points of interest near a coordinate.
#[async_trait]
pub trait AmenityProvider: Send + Sync {
    /// Find points matching any of `tags` within `radius_meters` of `center`.
    ///
    /// One call covers a whole category: the tag alternatives are OR'd into
    /// a single provider query.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] on transport or payload failures. An empty match
    /// set is `Ok(vec![])`, not an error.
    async fn search(
        &self,
        center: Coordinate,
        tags: &[String],
        radius_meters: u32,
    ) -> Result<Vec<AmenityPoint>, GeoError>;
}

/// Resolve a listing to a coordinate, falling back to the location hint.
///
/// A blank `address` substitutes `location_hint` as the query text. If the
/// first lookup fails and the query text differed from the hint, the hint is
/// tried once before giving up. The provider is never asked the same
/// question twice.
///
/// # Errors
///
/// Returns the final [`GeoError`] once the fallback is exhausted. Callers
/// treat this as a per-listing soft failure.
pub async fn resolve(
    provider: &dyn GeocodeProvider,
    address: &str,
    location_hint: &str,
) -> Result<Coordinate, GeoError> {
    let primary = if address.trim().is_empty() {
        location_hint
    } else {
        address
    };

    match provider.geocode(primary).await {
        Ok(coordinate) => Ok(coordinate),
        Err(err) => {
            if primary == location_hint || location_hint.trim().is_empty() {
                return Err(err);
            }
            tracing::warn!(query = primary, error = %err, "geocoding failed, retrying with location hint");
            provider.geocode(location_hint).await
        }
    }
}
