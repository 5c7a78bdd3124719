//! Map lifecycle: create, wait for ready, draw, destroy.
//!
//! ```text
//! Uninitialized --mount--> Creating --ready--> Ready --destroy--> Destroyed
//!                              |                                     |
//!                              +--------------destroy----------------+
//! Destroyed --mount--> Creating (new handle, new generation)
//! ```
//!
//! Drawing is only allowed in `Ready`. Everything that touches the map goes
//! through [`MapLifecycle::with_ready`] or [`MapLifecycle::sync_route`], which
//! are no-ops in any other state. That covers a route arriving before the
//! engine has laid the map out, and one arriving after the view was torn
//! down.

use tracing::{debug, info, warn};

use crate::domain::Route;

use super::config::MapConfig;
use super::engine::{MapEngine, MapError, MapOptions, NativeMapId, ReadySignal, TileLayer};
use super::markers::{MarkerReport, MarkerSync};
use super::overlay::OverlaySync;

/// An opaque reference to one live map instance.
///
/// Each mount gets a new generation, so a handle from a previous mount
/// never compares equal to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHandle {
    generation: u64,
    native: NativeMapId,
}

impl MapHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn native(&self) -> NativeMapId {
        self.native
    }
}

/// Where the lifecycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// No container yet.
    Uninitialized,
    /// Map created, waiting for the engine's ready signal.
    Creating,
    /// Safe to draw.
    Ready,
    /// Torn down; may be mounted again.
    Destroyed,
}

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Creating(MapHandle),
    Ready(MapHandle),
    Destroyed,
}

/// A mount waiting for the engine to report ready.
#[derive(Debug)]
pub struct PendingReady {
    generation: u64,
    signal: ReadySignal,
}

impl PendingReady {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What [`MapLifecycle::sync_route`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub markers: MarkerReport,
    pub overlay: bool,
}

/// Owns one map view: its engine, its current handle, and the markers and
/// overlay drawn on it.
///
/// Dropping the lifecycle destroys the map if it is still mounted.
pub struct MapLifecycle<E: MapEngine> {
    engine: E,
    config: MapConfig,
    phase: Phase,
    generations: u64,
    markers: MarkerSync,
    overlay: OverlaySync,
}

impl<E: MapEngine> MapLifecycle<E> {
    pub fn new(engine: E, config: MapConfig) -> Self {
        Self {
            engine,
            config,
            phase: Phase::Uninitialized,
            generations: 0,
            markers: MarkerSync::new(),
            overlay: OverlaySync::new(),
        }
    }

    pub fn state(&self) -> MapState {
        match self.phase {
            Phase::Uninitialized => MapState::Uninitialized,
            Phase::Creating(_) => MapState::Creating,
            Phase::Ready(_) => MapState::Ready,
            Phase::Destroyed => MapState::Destroyed,
        }
    }

    /// The current handle, while one is mounted (creating or ready).
    pub fn handle(&self) -> Option<MapHandle> {
        match self.phase {
            Phase::Creating(h) | Phase::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Create a map in `container` with the default view and base tiles.
    ///
    /// Allowed from `Uninitialized` and `Destroyed`. The map isn't drawable
    /// until the returned signal is passed to [`MapLifecycle::await_ready`]
    /// (or its generation to [`MapLifecycle::ready`]).
    pub fn mount(&mut self, container: &str) -> Result<PendingReady, MapError> {
        if container.trim().is_empty() {
            return Err(MapError::InvalidContainer);
        }
        if !matches!(self.phase, Phase::Uninitialized | Phase::Destroyed) {
            return Err(MapError::AlreadyMounted);
        }

        let options = MapOptions {
            center: self.config.center,
            zoom: self.config.zoom,
        };
        let (native, signal) = self.engine.create_map(container, &options)?;

        let tiles = TileLayer {
            url: self.config.tile_url.clone(),
            attribution: self.config.attribution.clone(),
        };
        if let Err(e) = self.engine.add_tile_layer(native, &tiles) {
            // Don't leave a half-built map behind.
            if let Err(remove_err) = self.engine.remove_map(native) {
                warn!(error = %remove_err, "failed to remove map after tile layer failure");
            }
            return Err(e);
        }

        self.generations += 1;
        let handle = MapHandle {
            generation: self.generations,
            native,
        };
        self.phase = Phase::Creating(handle);
        info!(generation = handle.generation, container, "map created");

        Ok(PendingReady {
            generation: handle.generation,
            signal,
        })
    }

    /// Deliver the engine's ready signal for `generation`.
    ///
    /// Only the current `Creating` handle can become ready; signals for older
    /// mounts are ignored. Returns whether the map is now ready.
    pub fn ready(&mut self, generation: u64) -> bool {
        match self.phase {
            Phase::Creating(handle) if handle.generation == generation => {
                self.phase = Phase::Ready(handle);
                debug!(generation, "map ready");
                true
            }
            Phase::Ready(handle) if handle.generation == generation => true,
            _ => {
                debug!(generation, state = ?self.state(), "ignoring stale ready signal");
                false
            }
        }
    }

    /// Wait for the engine's ready signal, then deliver it.
    pub async fn await_ready(&mut self, pending: PendingReady) -> bool {
        if !pending.signal.wait().await {
            debug!(generation = pending.generation, "map dropped before ready");
            return false;
        }
        self.ready(pending.generation)
    }

    /// Run `f` against the live map, only if it is ready.
    ///
    /// Returns `None` (and does nothing) in any other state.
    pub fn with_ready<R>(&mut self, f: impl FnOnce(MapHandle, &mut E) -> R) -> Option<R> {
        match self.phase {
            Phase::Ready(handle) => Some(f(handle, &mut self.engine)),
            _ => {
                debug!(state = ?self.state(), "map not ready; skipping");
                None
            }
        }
    }

    /// Draw `route`: markers, viewport fit, then overlay.
    ///
    /// Returns `Ok(None)` without touching anything unless the map is ready.
    pub fn sync_route(&mut self, route: &Route) -> Result<Option<SyncReport>, MapError> {
        let Phase::Ready(handle) = self.phase else {
            debug!(state = ?self.state(), "map not ready; route not drawn");
            return Ok(None);
        };

        let markers = self
            .markers
            .sync(handle, &mut self.engine, &self.config, route)?;
        let overlay = self
            .overlay
            .sync(handle, &mut self.engine, &self.config, route)?;

        Ok(Some(SyncReport { markers, overlay }))
    }

    /// Tear the map down.
    ///
    /// Removes markers and the overlay, then the map itself. Runs at most
    /// once per mount: later calls (and calls before any mount) return
    /// `false` and do nothing. Engine failures during teardown are logged;
    /// the lifecycle ends up `Destroyed` either way.
    pub fn destroy(&mut self) -> bool {
        let handle = match self.phase {
            Phase::Creating(h) | Phase::Ready(h) => h,
            _ => {
                debug!(state = ?self.state(), "destroy: nothing mounted");
                return false;
            }
        };
        self.phase = Phase::Destroyed;

        if let Err(e) = self.overlay.clear(handle, &mut self.engine) {
            warn!(generation = handle.generation, error = %e, "failed to remove overlay");
        }
        if let Err(e) = self.markers.clear(handle, &mut self.engine) {
            warn!(generation = handle.generation, error = %e, "failed to remove markers");
        }
        if let Err(e) = self.engine.remove_map(handle.native) {
            warn!(generation = handle.generation, error = %e, "failed to remove map");
        }

        info!(generation = handle.generation, "map destroyed");
        true
    }
}

impl<E: MapEngine> Drop for MapLifecycle<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}
