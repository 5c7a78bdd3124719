//! Route request client.
//!
//! Asks the backend for the cheapest multi-leg taxi route between two
//! places. The backend owns fares and path finding; this module only
//! fetches and validates the answer.
//!
//! Key characteristics of the route endpoint:
//! - `GET` with plain place names in `from` / `to`
//! - Failures the rider should see come back as `{ "error": "…" }`,
//!   sometimes with a 200 status

mod client;
mod error;
mod types;

pub use client::{RouteClient, RouteClientConfig, RouteProvider};
pub use error::{GENERIC_ROUTE_ERROR, RouteError};
pub use types::{ConversionError, LegDto, LocationDto, RouteOutcome, RouteResponse, StationDto};
