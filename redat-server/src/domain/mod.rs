//! Domain types for the fare map.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them (the map synchronizers, the page controllers) can trust
//! their validity.

mod coords;
mod error;
mod place;
mod route;

pub use coords::{Bounds, LatLng, LngLat, Region};
pub use error::DomainError;
pub use place::{KnownPlace, Place};
pub use route::{Price, Route, RouteLeg, Station};
