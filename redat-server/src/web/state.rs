//! Application state for the web layer.

use std::sync::Arc;

use crate::map::MapConfig;
use crate::places::PlaceDirectory;
use crate::routing::RouteClient;

/// Shared application state.
///
/// The directory is the only part that changes after startup; it guards
/// itself.
#[derive(Clone)]
pub struct AppState {
    /// Known places, for autocomplete and validation
    pub directory: PlaceDirectory,

    /// Route endpoint client
    pub routes: Arc<RouteClient>,

    /// Map defaults for every map view
    pub map: Arc<MapConfig>,
}

impl AppState {
    pub fn new(directory: PlaceDirectory, routes: RouteClient, map: MapConfig) -> Self {
        Self {
            directory,
            routes: Arc::new(routes),
            map: Arc::new(map),
        }
    }
}
