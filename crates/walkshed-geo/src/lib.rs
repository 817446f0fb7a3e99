//! Geocoding, amenity search, and distance primitives for walkshed.
//!
//! Exposes the provider trait seams plus the live Nominatim and Overpass
//! clients and a deterministic offline provider. All outbound calls are
//! paced; failures surface as [`GeoError`] for the analyzer to degrade on.

pub mod coord;
pub mod error;
pub mod nominatim;
pub mod offline;
pub mod overpass;
pub mod pace;
pub mod provider;

mod http;

pub use coord::{haversine_meters, Coordinate, EARTH_RADIUS_METERS};
pub use error::GeoError;
pub use nominatim::NominatimClient;
pub use offline::OfflineProvider;
pub use overpass::OverpassClient;
pub use pace::Pacer;
pub use provider::{resolve, AmenityPoint, AmenityProvider, GeocodeProvider};
