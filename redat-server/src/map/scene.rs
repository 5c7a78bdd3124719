//! Recording map engine.
//!
//! The server can't draw a Leaflet map itself. `SceneEngine` keeps the state
//! a real map would have (live maps, their markers and controls, the last
//! viewport fit) and journals every call as a [`SceneCommand`]. The map page
//! embeds the journal and `static/map.js` replays it against Leaflet in the
//! browser, so what the rider sees is exactly what the synchronizers did.
//!
//! The engine is strict: removing something that isn't there is an error,
//! which makes double-removal bugs show up in tests.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::trace;

use crate::domain::{LatLng, Region};

use super::config::{MarkerIcon, OverlayStyle};
use super::engine::{
    ControlId, FitOptions, MapEngine, MapError, MapOptions, MarkerId, MarkerSpec, NativeMapId,
    ReadySignal, RouteControlSpec, TileLayer,
};

/// One engine call, in the form the browser replays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneCommand {
    CreateMap {
        container: String,
        center: LatLng,
        zoom: u8,
    },
    AddTileLayer {
        url: String,
        attribution: String,
    },
    AddMarker {
        id: MarkerId,
        position: LatLng,
        popup: String,
        icon: MarkerIcon,
    },
    RemoveMarker {
        id: MarkerId,
    },
    InvalidateSize,
    FitBounds {
        bounds: Region,
        padding: [u32; 2],
        max_zoom: u8,
    },
    AddRouteControl {
        id: ControlId,
        waypoints: Vec<LatLng>,
        style: OverlayStyle,
    },
    RemoveRouteControl {
        id: ControlId,
    },
    RemoveMap,
}

/// State of one live map.
#[derive(Debug, Default)]
struct SceneMap {
    tile_layers: usize,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    controls: BTreeMap<ControlId, RouteControlSpec>,
    viewport: Option<Region>,
}

/// A [`MapEngine`] that records instead of drawing.
#[derive(Debug, Default)]
pub struct SceneEngine {
    next_id: u64,
    maps: HashMap<NativeMapId, SceneMap>,
    /// Kept after a map is removed so the page can still render it.
    journals: HashMap<NativeMapId, Vec<SceneCommand>>,
    removed: Vec<NativeMapId>,
}

impl SceneEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn live(&mut self, map: NativeMapId) -> Result<&mut SceneMap, MapError> {
        self.maps.get_mut(&map).ok_or(MapError::UnknownMap(map))
    }

    fn record(&mut self, map: NativeMapId, command: SceneCommand) {
        trace!(map = map.0, ?command, "scene");
        self.journals.entry(map).or_default().push(command);
    }

    /// Every call made against `map`, in order.
    pub fn journal(&self, map: NativeMapId) -> &[SceneCommand] {
        self.journals.get(&map).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `map` exists and hasn't been removed.
    pub fn is_live(&self, map: NativeMapId) -> bool {
        self.maps.contains_key(&map)
    }

    pub fn live_map_count(&self) -> usize {
        self.maps.len()
    }

    /// Maps removed so far, in removal order.
    pub fn removed_maps(&self) -> &[NativeMapId] {
        &self.removed
    }

    /// Markers currently on `map`, in creation order.
    pub fn markers(&self, map: NativeMapId) -> Vec<&MarkerSpec> {
        self.maps
            .get(&map)
            .map(|m| m.markers.values().collect())
            .unwrap_or_default()
    }

    /// Route controls currently on `map`.
    pub fn controls(&self, map: NativeMapId) -> Vec<&RouteControlSpec> {
        self.maps
            .get(&map)
            .map(|m| m.controls.values().collect())
            .unwrap_or_default()
    }

    pub fn tile_layer_count(&self, map: NativeMapId) -> usize {
        self.maps.get(&map).map_or(0, |m| m.tile_layers)
    }

    /// The region of the most recent viewport fit.
    pub fn viewport(&self, map: NativeMapId) -> Option<Region> {
        self.maps.get(&map).and_then(|m| m.viewport)
    }

    /// How many times the viewport has been fitted on `map`.
    pub fn fit_count(&self, map: NativeMapId) -> usize {
        self.journal(map)
            .iter()
            .filter(|c| matches!(c, SceneCommand::FitBounds { .. }))
            .count()
    }
}

impl MapEngine for SceneEngine {
    fn create_map(
        &mut self,
        container: &str,
        options: &MapOptions,
    ) -> Result<(NativeMapId, ReadySignal), MapError> {
        let map = NativeMapId(self.next());
        self.maps.insert(map, SceneMap::default());
        self.record(
            map,
            SceneCommand::CreateMap {
                container: container.to_string(),
                center: options.center,
                zoom: options.zoom,
            },
        );

        // Nothing to lay out server-side; the map is ready as soon as it exists.
        let (tx, signal) = ReadySignal::channel();
        let _ = tx.send(());
        Ok((map, signal))
    }

    fn add_tile_layer(&mut self, map: NativeMapId, layer: &TileLayer) -> Result<(), MapError> {
        self.live(map)?.tile_layers += 1;
        self.record(
            map,
            SceneCommand::AddTileLayer {
                url: layer.url.clone(),
                attribution: layer.attribution.clone(),
            },
        );
        Ok(())
    }

    fn add_marker(&mut self, map: NativeMapId, spec: &MarkerSpec) -> Result<MarkerId, MapError> {
        self.live(map)?;
        let id = MarkerId(self.next());
        self.live(map)?.markers.insert(id, spec.clone());
        self.record(
            map,
            SceneCommand::AddMarker {
                id,
                position: spec.position,
                popup: spec.popup.clone(),
                icon: spec.icon.clone(),
            },
        );
        Ok(id)
    }

    fn remove_marker(&mut self, map: NativeMapId, marker: MarkerId) -> Result<(), MapError> {
        self.live(map)?
            .markers
            .remove(&marker)
            .ok_or(MapError::UnknownMarker(marker))?;
        self.record(map, SceneCommand::RemoveMarker { id: marker });
        Ok(())
    }

    fn invalidate_size(&mut self, map: NativeMapId) -> Result<(), MapError> {
        self.live(map)?;
        self.record(map, SceneCommand::InvalidateSize);
        Ok(())
    }

    fn fit_bounds(
        &mut self,
        map: NativeMapId,
        region: &Region,
        options: &FitOptions,
    ) -> Result<(), MapError> {
        self.live(map)?.viewport = Some(*region);
        self.record(
            map,
            SceneCommand::FitBounds {
                bounds: *region,
                padding: options.padding,
                max_zoom: options.max_zoom,
            },
        );
        Ok(())
    }

    fn add_route_control(
        &mut self,
        map: NativeMapId,
        spec: &RouteControlSpec,
    ) -> Result<ControlId, MapError> {
        self.live(map)?;
        let id = ControlId(self.next());
        self.live(map)?.controls.insert(id, spec.clone());
        self.record(
            map,
            SceneCommand::AddRouteControl {
                id,
                waypoints: spec.waypoints.clone(),
                style: spec.style.clone(),
            },
        );
        Ok(id)
    }

    fn remove_route_control(
        &mut self,
        map: NativeMapId,
        control: ControlId,
    ) -> Result<(), MapError> {
        self.live(map)?
            .controls
            .remove(&control)
            .ok_or(MapError::UnknownControl(control))?;
        self.record(map, SceneCommand::RemoveRouteControl { id: control });
        Ok(())
    }

    fn remove_map(&mut self, map: NativeMapId) -> Result<(), MapError> {
        self.maps.remove(&map).ok_or(MapError::UnknownMap(map))?;
        self.removed.push(map);
        self.record(map, SceneCommand::RemoveMap);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> MapOptions {
        MapOptions {
            center: LatLng::from_const(9.0222, 38.7468),
            zoom: 13,
        }
    }

    fn marker(lat: f64, lng: f64, name: &str) -> MarkerSpec {
        MarkerSpec {
            position: LatLng::from_const(lat, lng),
            popup: name.to_string(),
            icon: MarkerIcon::default(),
        }
    }

    #[tokio::test]
    async fn create_map_is_ready_immediately() {
        let mut engine = SceneEngine::new();
        let (map, signal) = engine.create_map("map-container", &options()).unwrap();

        assert!(signal.wait().await);
        assert!(engine.is_live(map));
        assert_eq!(engine.live_map_count(), 1);
    }

    #[test]
    fn markers_come_and_go() {
        let mut engine = SceneEngine::new();
        let (map, _) = engine.create_map("map-container", &options()).unwrap();

        let a = engine.add_marker(map, &marker(9.01, 38.74, "A")).unwrap();
        let b = engine.add_marker(map, &marker(9.03, 38.75, "B")).unwrap();
        assert_eq!(engine.markers(map).len(), 2);

        engine.remove_marker(map, a).unwrap();
        assert_eq!(engine.markers(map).len(), 1);
        assert_eq!(engine.markers(map)[0].popup, "B");

        // Second removal is caught.
        assert_eq!(engine.remove_marker(map, a), Err(MapError::UnknownMarker(a)));
        engine.remove_marker(map, b).unwrap();
        assert!(engine.markers(map).is_empty());
    }

    #[test]
    fn removed_map_rejects_calls() {
        let mut engine = SceneEngine::new();
        let (map, _) = engine.create_map("map-container", &options()).unwrap();

        engine.remove_map(map).unwrap();
        assert!(!engine.is_live(map));
        assert_eq!(engine.removed_maps(), &[map]);

        assert_eq!(engine.remove_map(map), Err(MapError::UnknownMap(map)));
        assert_eq!(
            engine.add_marker(map, &marker(9.0, 38.7, "late")),
            Err(MapError::UnknownMap(map))
        );
        assert_eq!(engine.invalidate_size(map), Err(MapError::UnknownMap(map)));
    }

    #[test]
    fn journal_survives_removal() {
        let mut engine = SceneEngine::new();
        let (map, _) = engine.create_map("map-container", &options()).unwrap();
        engine
            .add_tile_layer(
                map,
                &TileLayer {
                    url: "https://tiles.test/{z}/{x}/{y}.png".into(),
                    attribution: "test".into(),
                },
            )
            .unwrap();
        engine.remove_map(map).unwrap();

        let journal = engine.journal(map);
        assert_eq!(journal.len(), 3);
        assert!(matches!(journal[0], SceneCommand::CreateMap { .. }));
        assert!(matches!(journal[1], SceneCommand::AddTileLayer { .. }));
        assert_eq!(journal[2], SceneCommand::RemoveMap);
    }

    #[test]
    fn commands_serialize_for_replay() {
        let command = SceneCommand::FitBounds {
            bounds: Region {
                south_west: LatLng::from_const(9.01, 38.74),
                north_east: LatLng::from_const(9.03, 38.75),
            },
            padding: [50, 50],
            max_zoom: 15,
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "fit_bounds",
                "bounds": [[9.01, 38.74], [9.03, 38.75]],
                "padding": [50, 50],
                "max_zoom": 15
            })
        );

        let json = serde_json::to_value(SceneCommand::RemoveMarker { id: MarkerId(7) }).unwrap();
        assert_eq!(json, serde_json::json!({"op": "remove_marker", "id": 7}));
    }
}
