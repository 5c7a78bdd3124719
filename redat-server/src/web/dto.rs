//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::controller::{LegRow, MapReady};
use crate::map::SceneCommand;
use crate::places::DirectoryStatus;

/// Autocomplete query.
#[derive(Debug, Deserialize)]
pub struct PlaceSearchRequest {
    /// Text typed so far
    #[serde(default)]
    pub q: String,

    /// Maximum results; every match when absent
    pub limit: Option<usize>,

    /// Which input the suggestions are for ("from" or "to"); only used by
    /// the HTML fragment
    pub field: Option<String>,
}

/// Autocomplete results.
#[derive(Debug, Serialize)]
pub struct PlaceSearchResponse {
    pub places: Vec<String>,
}

/// Search form submission.
#[derive(Debug, Default, Deserialize)]
pub struct SearchSubmitRequest {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// A station in a route response.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    /// `[lng, lat]`, as the backend sends it
    pub location: [f64; 2],
}

/// A drawn route, for scripted clients.
#[derive(Debug, Serialize)]
pub struct RouteApiResponse {
    pub from: String,
    pub to: String,
    pub total_price: f64,
    /// "N Birr"
    pub total: String,
    pub summary: String,
    pub stations: Vec<StationResult>,
    pub legs: Vec<LegRow>,
    /// Engine calls that draw the route, in replay order
    pub scene: Vec<SceneCommand>,
}

impl RouteApiResponse {
    pub fn from_ready(ready: MapReady) -> Self {
        let stations = ready
            .route
            .stations()
            .iter()
            .map(|s| StationResult {
                name: s.name.clone(),
                location: [s.location.lng(), s.location.lat()],
            })
            .collect();

        Self {
            from: ready.from,
            to: ready.to,
            total_price: ready.route.total_price().amount(),
            total: ready.view.total,
            summary: ready.view.summary,
            stations,
            legs: ready.view.legs,
            scene: ready.scene,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub directory: DirectoryStatus,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
