//! Route-to-map rendering.
//!
//! Turns a [`Route`](crate::domain::Route) into a drawn map: one marker per
//! station, a viewport fitted to them, and a path overlay through them.
//!
//! - [`MapLifecycle`] owns the map instance and gates all drawing on the
//!   engine's ready signal
//! - [`MarkerSync`] and [`OverlaySync`] reconcile what is drawn with the
//!   current route (clear, then rebuild)
//! - [`MapEngine`] is the seam to the drawing library; [`SceneEngine`]
//!   records the calls for the browser to replay

mod config;
mod engine;
mod lifecycle;
mod markers;
mod overlay;
mod scene;

pub use config::{MapConfig, MarkerIcon, OverlayStyle};
pub use engine::{
    ControlId, FitOptions, MapEngine, MapError, MapOptions, MarkerId, MarkerSpec, NativeMapId,
    ReadySignal, RouteControlSpec, TileLayer,
};
pub use lifecycle::{MapHandle, MapLifecycle, MapState, PendingReady, SyncReport};
pub use markers::{MarkerReport, MarkerSync};
pub use overlay::OverlaySync;
pub use scene::{SceneCommand, SceneEngine};
