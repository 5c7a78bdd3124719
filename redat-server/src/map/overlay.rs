//! Turn-by-turn route overlay.

use tracing::debug;

use crate::domain::Route;

use super::config::MapConfig;
use super::engine::{ControlId, MapEngine, MapError, RouteControlSpec};
use super::lifecycle::MapHandle;

/// Keeps at most one route overlay control on a map, drawn through the
/// current route's stations.
///
/// The overlay is decoration: fares shown to the rider always come from the
/// [`Route`], never from whatever path the routing control computes.
#[derive(Debug, Default)]
pub struct OverlaySync {
    installed: Option<(MapHandle, ControlId)>,
}

impl OverlaySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Replace the overlay on `handle` with one through `route`'s stations.
    ///
    /// The previous control is removed first. Routes with fewer than two
    /// stations get no overlay. Returns whether one was installed.
    pub fn sync<E: MapEngine>(
        &mut self,
        handle: MapHandle,
        engine: &mut E,
        config: &MapConfig,
        route: &Route,
    ) -> Result<bool, MapError> {
        self.clear(handle, engine)?;

        if route.station_count() < 2 {
            debug!(
                generation = handle.generation(),
                stations = route.station_count(),
                "no overlay for fewer than two stations"
            );
            return Ok(false);
        }

        let spec = RouteControlSpec {
            waypoints: route
                .waypoints()
                .into_iter()
                .map(|p| p.to_lat_lng())
                .collect(),
            style: config.overlay.clone(),
        };
        let control = engine.add_route_control(handle.native(), &spec)?;
        self.installed = Some((handle, control));

        debug!(
            generation = handle.generation(),
            waypoints = spec.waypoints.len(),
            "overlay installed"
        );
        Ok(true)
    }

    /// Remove the installed control, if it belongs to `handle`.
    ///
    /// A control left over from an older handle is simply forgotten; its map
    /// has already been torn down.
    pub fn clear<E: MapEngine>(
        &mut self,
        handle: MapHandle,
        engine: &mut E,
    ) -> Result<bool, MapError> {
        match self.installed.take() {
            Some((owner, control)) if owner == handle => {
                engine.remove_route_control(handle.native(), control)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
