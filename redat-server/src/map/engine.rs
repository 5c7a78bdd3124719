//! The seam between the synchronizers and whatever actually draws the map.
//!
//! `MapEngine` mirrors the handful of operations the fare map needs from a
//! Leaflet-style library. Implementations own the native objects; callers
//! only ever hold the opaque ids handed back.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::domain::{LatLng, Region};

use super::config::{MarkerIcon, OverlayStyle};

/// Engine-side id of one map instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NativeMapId(pub u64);

/// Engine-side id of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerId(pub u64);

/// Engine-side id of one route overlay control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ControlId(pub u64);

/// Initial view for a new map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    /// Popup text (the station name).
    pub popup: String,
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub padding: [u32; 2],
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteControlSpec {
    /// Stops to route through, in order.
    pub waypoints: Vec<LatLng>,
    pub style: OverlayStyle,
}

/// Fires once the engine has laid out and painted a new map.
///
/// Until then the container may have no size, and fitting bounds against it
/// silently produces the wrong viewport.
#[derive(Debug)]
pub struct ReadySignal(oneshot::Receiver<()>);

impl ReadySignal {
    /// A signal paired with the sender the engine fires.
    pub fn channel() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self(rx))
    }

    /// Wait for the engine.
    ///
    /// Returns `false` if the engine dropped the map before it became ready.
    pub async fn wait(self) -> bool {
        self.0.await.is_ok()
    }
}

/// Errors from map engines and the lifecycle around them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map container id must not be empty")]
    InvalidContainer,

    #[error("a map is already mounted")]
    AlreadyMounted,

    #[error("no live map {0:?}")]
    UnknownMap(NativeMapId),

    #[error("no marker {0:?} on this map")]
    UnknownMarker(MarkerId),

    #[error("no route control {0:?} on this map")]
    UnknownControl(ControlId),

    #[error("map engine error: {0}")]
    Engine(String),
}

/// A Leaflet-style map library.
pub trait MapEngine {
    /// Create a map in `container`. The returned signal fires when the map
    /// is ready to be drawn on.
    fn create_map(
        &mut self,
        container: &str,
        options: &MapOptions,
    ) -> Result<(NativeMapId, ReadySignal), MapError>;

    fn add_tile_layer(&mut self, map: NativeMapId, layer: &TileLayer) -> Result<(), MapError>;

    fn add_marker(&mut self, map: NativeMapId, spec: &MarkerSpec) -> Result<MarkerId, MapError>;

    fn remove_marker(&mut self, map: NativeMapId, marker: MarkerId) -> Result<(), MapError>;

    /// Recompute the container's pixel size.
    fn invalidate_size(&mut self, map: NativeMapId) -> Result<(), MapError>;

    fn fit_bounds(
        &mut self,
        map: NativeMapId,
        region: &Region,
        options: &FitOptions,
    ) -> Result<(), MapError>;

    fn add_route_control(
        &mut self,
        map: NativeMapId,
        spec: &RouteControlSpec,
    ) -> Result<ControlId, MapError>;

    fn remove_route_control(&mut self, map: NativeMapId, control: ControlId)
    -> Result<(), MapError>;

    /// Tear the map down, releasing its listeners and DOM nodes.
    fn remove_map(&mut self, map: NativeMapId) -> Result<(), MapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_signal_fires() {
        let (tx, signal) = ReadySignal::channel();
        tx.send(()).unwrap();
        assert!(signal.wait().await);
    }

    #[tokio::test]
    async fn dropped_sender_is_not_ready() {
        let (tx, signal) = ReadySignal::channel();
        drop(tx);
        assert!(!signal.wait().await);
    }
}
