//! Station markers and viewport fitting.

use tracing::debug;

use crate::domain::{Bounds, Route};

use super::config::MapConfig;
use super::engine::{FitOptions, MapEngine, MapError, MarkerId, MarkerSpec};
use super::lifecycle::MapHandle;

/// What one marker sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerReport {
    pub removed: usize,
    pub added: usize,
    /// Whether the viewport was fitted (false for an empty route).
    pub fitted: bool,
}

/// Keeps a map's markers equal to the stations of the current route.
///
/// Reconciliation is clear-and-rebuild: every sync removes all markers this
/// synchronizer added on the handle, then adds one per station. Routes have
/// a handful of stations, so diffing would buy nothing.
#[derive(Debug, Default)]
pub struct MarkerSync {
    owner: Option<MapHandle>,
    markers: Vec<MarkerId>,
}

impl MarkerSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently tracked.
    pub fn count(&self) -> usize {
        self.markers.len()
    }

    /// Replace the markers on `handle` with one per station of `route`, then
    /// fit the viewport to them.
    ///
    /// Old markers are always removed, even when `route` is empty. The fit
    /// is skipped when there is nothing to fit to.
    pub fn sync<E: MapEngine>(
        &mut self,
        handle: MapHandle,
        engine: &mut E,
        config: &MapConfig,
        route: &Route,
    ) -> Result<MarkerReport, MapError> {
        let removed = self.clear(handle, engine)?;

        let mut bounds = Bounds::empty();
        for station in route.stations() {
            let position = station.location.to_lat_lng();
            let spec = MarkerSpec {
                position,
                popup: station.name.clone(),
                icon: config.marker_icon.clone(),
            };
            let id = engine.add_marker(handle.native(), &spec)?;
            self.markers.push(id);
            bounds.extend(position);
        }

        let fitted = match bounds.region() {
            Some(region) => {
                // The container may have been resized since the map was created.
                engine.invalidate_size(handle.native())?;
                engine.fit_bounds(
                    handle.native(),
                    &region,
                    &FitOptions {
                        padding: config.fit_padding,
                        max_zoom: config.max_fit_zoom,
                    },
                )?;
                true
            }
            None => false,
        };

        debug!(
            generation = handle.generation(),
            removed,
            added = self.markers.len(),
            fitted,
            "markers synced"
        );

        Ok(MarkerReport {
            removed,
            added: self.markers.len(),
            fitted,
        })
    }

    /// Remove every marker tracked for `handle`.
    ///
    /// Markers tracked for a different (older) handle are forgotten rather
    /// than removed: their map is gone and took them with it. Every removal
    /// is attempted even if one fails; the first failure is returned.
    pub fn clear<E: MapEngine>(
        &mut self,
        handle: MapHandle,
        engine: &mut E,
    ) -> Result<usize, MapError> {
        let markers = std::mem::take(&mut self.markers);

        if self.owner != Some(handle) {
            self.owner = Some(handle);
            return Ok(0);
        }

        let mut first_error = None;
        let count = markers.len();
        for id in markers {
            if let Err(e) = engine.remove_marker(handle.native(), id) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }
}
