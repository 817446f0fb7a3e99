//! WGS-84 coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the WGS-84 ranges.
    ///
    /// Provider payloads go through this so out-of-range (or NaN) values are
    /// caught at the parse boundary rather than surfacing as bogus distances.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] when `latitude` is outside
    /// `[-90, 90]` or `longitude` is outside `[-180, 180]`.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Haversine formula on a spherical Earth. The square-root argument is
/// clamped to `[0, 1]` so floating-point drift near identical or antipodal
/// points cannot push it out of the domain of the inverse trig.
#[must_use]
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}
