//! Place directory client and autocomplete.
//!
//! Provides the city's known places, fetched from the backend at startup
//! (or the disk cache) and refetched once a day old. Used to suggest names as the
//! rider types and to validate origin/destination before any route request.

mod cache;
mod client;
mod directory;
mod error;

pub use cache::{CachedDirectory, DEFAULT_MAX_AGE, PlaceCache, PlaceCacheConfig};
pub use client::{PlaceClient, PlaceClientConfig, PlaceDto};
pub use directory::{DirectoryStatus, PlaceDirectory, PlaceIndex, search_names};
pub use error::PlaceError;
