//! The map view: validate the query, fetch the route, draw it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{Route, RouteLeg};
use crate::map::{MapConfig, MapLifecycle, SceneCommand, SceneEngine};
use crate::places::PlaceIndex;
use crate::routing::{GENERIC_ROUTE_ERROR, RouteProvider};

use super::search::INVALID_SELECTION;

/// Shown when the page is opened without both names.
pub const MISSING_PARAMS: &str = "Missing from or to parameters";

/// DOM id of the map container on the page.
pub const MAP_CONTAINER: &str = "map-container";

/// `/map?from=..&to=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl MapQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Both names, if both are present and non-blank.
    fn names(&self) -> Option<(&str, &str)> {
        Some((present(&self.from)?, present(&self.to)?))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// One fare row: "Mexico Square → Piassa : 25 Birr".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegRow {
    pub from: String,
    pub to: String,
    pub price: String,
}

impl LegRow {
    fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            from: leg.from.clone(),
            to: leg.to.clone(),
            price: format!("{} Birr", leg.price),
        }
    }

    pub fn label(&self) -> String {
        format!("{} → {} : {}", self.from, self.to, self.price)
    }
}

/// What the page shows beside the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    /// "N Birr"
    pub total: String,
    /// Station names joined with " → ".
    pub summary: String,
    pub legs: Vec<LegRow>,
}

impl RouteView {
    pub fn new(route: &Route) -> Self {
        Self {
            total: format!("{} Birr", route.total_price()),
            summary: route.summary(),
            legs: route.legs().iter().map(LegRow::from_leg).collect(),
        }
    }

    pub fn has_legs(&self) -> bool {
        !self.legs.is_empty()
    }
}

/// A drawn route, ready to render.
#[derive(Debug, Clone)]
pub struct MapReady {
    pub from: String,
    pub to: String,
    pub route: Route,
    pub view: RouteView,
    /// Engine calls for the browser to replay, in order.
    pub scene: Vec<SceneCommand>,
}

/// Outcome of loading the map view.
#[derive(Debug, Clone)]
pub enum MapPage {
    /// Nothing was drawn; show `message` instead of the map.
    Error { message: String },
    Ready(Box<MapReady>),
}

impl MapPage {
    fn error(message: impl Into<String>) -> Self {
        MapPage::Error {
            message: message.into(),
        }
    }
}

/// Run the map view for `query`.
///
/// Blank or missing names and names not in the directory fail before any
/// request is made. Otherwise the route is fetched exactly once; on success
/// a map is mounted, drawn, snapshotted and torn down again. On failure no
/// map is mounted.
pub async fn load_map_view<P: RouteProvider>(
    query: &MapQuery,
    index: &PlaceIndex,
    provider: &P,
    config: MapConfig,
) -> MapPage {
    let Some((from, to)) = query.names() else {
        return MapPage::error(MISSING_PARAMS);
    };

    let (Some(origin), Some(destination)) = (index.resolve(from), index.resolve(to)) else {
        info!(from, to, "map view for unknown place");
        return MapPage::error(INVALID_SELECTION);
    };

    let route = match provider.fetch_route(&origin, &destination).await {
        Ok(route) => route,
        Err(e) => {
            warn!(from, to, error = %e, "route fetch failed");
            return MapPage::error(e.user_message());
        }
    };

    let scene = match draw(&route, config).await {
        Some(scene) => scene,
        None => return MapPage::error(GENERIC_ROUTE_ERROR),
    };

    info!(
        from,
        to,
        station_count = route.station_count(),
        total = route.total_price().amount(),
        "route drawn"
    );

    MapPage::Ready(Box::new(MapReady {
        from: from.to_string(),
        to: to.to_string(),
        view: RouteView::new(&route),
        route,
        scene,
    }))
}

/// Mount a map, draw `route` on it, and return the commands that drew it.
async fn draw(route: &Route, config: MapConfig) -> Option<Vec<SceneCommand>> {
    let mut map = MapLifecycle::new(SceneEngine::new(), config);

    let pending = match map.mount(MAP_CONTAINER) {
        Ok(pending) => pending,
        Err(e) => {
            warn!(error = %e, "failed to mount map");
            return None;
        }
    };
    if !map.await_ready(pending).await {
        warn!("map never became ready");
        return None;
    }

    let handle = map.handle()?;
    if let Err(e) = map.sync_route(route) {
        warn!(error = %e, "failed to draw route");
        map.destroy();
        return None;
    }

    // Snapshot before teardown so the page replays the drawn state.
    let scene = map.engine().journal(handle.native()).to_vec();
    map.destroy();
    Some(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KnownPlace, LngLat, Place, Price, Station};
    use crate::routing::RouteError;
    use std::sync::Mutex;

    /// Answers every request the same way and counts requests.
    struct StubProvider {
        answer: fn() -> Result<Route, RouteError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn new(answer: fn() -> Result<Route, RouteError>) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RouteProvider for StubProvider {
        async fn fetch_route(
            &self,
            from: &KnownPlace,
            to: &KnownPlace,
        ) -> Result<Route, RouteError> {
            self.calls
                .lock()
                .unwrap()
                .push((from.name().to_string(), to.name().to_string()));
            (self.answer)()
        }
    }

    fn place(name: &str, lng: f64, lat: f64) -> Place {
        Place {
            name: name.to_string(),
            location: LngLat::new(lng, lat).unwrap(),
            stations: vec![],
            connected_to: None,
        }
    }

    fn index() -> PlaceIndex {
        PlaceIndex::new([
            place("Mexico Square", 38.7468, 9.0105),
            place("Piassa", 38.7525, 9.0330),
        ])
    }

    fn two_stations() -> Result<Route, RouteError> {
        Ok(Route::new(
            vec![
                Station::new("Mexico Square", LngLat::new(38.7468, 9.0105).unwrap()),
                Station::new("Piassa", LngLat::new(38.7525, 9.0330).unwrap()),
            ],
            vec![RouteLeg {
                from: "Mexico Square".into(),
                to: "Piassa".into(),
                price: Price::new(25.0).unwrap(),
            }],
            Price::new(25.0).unwrap(),
        )
        .unwrap())
    }

    fn no_route() -> Result<Route, RouteError> {
        Err(RouteError::Validation("No route found".into()))
    }

    fn server_down() -> Result<Route, RouteError> {
        Err(RouteError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        })
    }

    fn error_message(page: MapPage) -> String {
        match page {
            MapPage::Error { message } => message,
            MapPage::Ready(_) => panic!("expected an error page"),
        }
    }

    #[tokio::test]
    async fn missing_to_fails_without_fetching() {
        let provider = StubProvider::new(two_stations);
        let query = MapQuery {
            from: Some("Mexico Square".into()),
            to: None,
        };

        let page = load_map_view(&query, &index(), &provider, MapConfig::default()).await;

        assert_eq!(error_message(page), "Missing from or to parameters");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_name_counts_as_missing() {
        let provider = StubProvider::new(two_stations);
        let page = load_map_view(
            &MapQuery::new("  ", "Piassa"),
            &index(),
            &provider,
            MapConfig::default(),
        )
        .await;

        assert_eq!(error_message(page), MISSING_PARAMS);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_place_fails_without_fetching() {
        let provider = StubProvider::new(two_stations);
        let page = load_map_view(
            &MapQuery::new("Mexico Square", "Bole"),
            &index(),
            &provider,
            MapConfig::default(),
        )
        .await;

        assert_eq!(error_message(page), INVALID_SELECTION);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn backend_message_is_shown_verbatim() {
        let provider = StubProvider::new(no_route);
        let page = load_map_view(
            &MapQuery::new("Mexico Square", "Piassa"),
            &index(),
            &provider,
            MapConfig::default(),
        )
        .await;

        assert_eq!(error_message(page), "No route found");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn other_failures_get_generic_message() {
        let provider = StubProvider::new(server_down);
        let page = load_map_view(
            &MapQuery::new("Mexico Square", "Piassa"),
            &index(),
            &provider,
            MapConfig::default(),
        )
        .await;

        assert_eq!(error_message(page), "Error fetching route data");
    }

    #[tokio::test]
    async fn two_station_route_is_drawn_and_priced() {
        let provider = StubProvider::new(two_stations);
        let page = load_map_view(
            &MapQuery::new("mexico square", "Piassa"),
            &index(),
            &provider,
            MapConfig::default(),
        )
        .await;

        // Canonical names go to the backend; the typed text stays on the page.
        assert_eq!(provider.calls(), vec![("Mexico Square".to_string(), "Piassa".to_string())]);

        let MapPage::Ready(ready) = page else {
            panic!("expected a drawn route");
        };
        assert_eq!(ready.from, "mexico square");
        assert_eq!(ready.view.total, "25 Birr");
        assert_eq!(ready.view.summary, "Mexico Square → Piassa");
        assert_eq!(ready.view.legs.len(), 1);
        assert_eq!(ready.view.legs[0].label(), "Mexico Square → Piassa : 25 Birr");

        let markers = ready
            .scene
            .iter()
            .filter(|c| matches!(c, SceneCommand::AddMarker { .. }))
            .count();
        assert_eq!(markers, 2);

        let fit = ready
            .scene
            .iter()
            .find_map(|c| match c {
                SceneCommand::FitBounds { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .unwrap();
        assert_eq!(fit.south_west.lat(), 9.0105);
        assert_eq!(fit.north_east.lat(), 9.0330);

        assert!(
            ready
                .scene
                .iter()
                .any(|c| matches!(c, SceneCommand::AddRouteControl { .. }))
        );
        // The snapshot is taken before teardown.
        assert!(!ready.scene.contains(&SceneCommand::RemoveMap));
    }

    #[test]
    fn route_view_without_legs() {
        let route = Route::new(
            vec![Station::new("Piassa", LngLat::new(38.7525, 9.0330).unwrap())],
            vec![],
            Price::zero(),
        )
        .unwrap();

        let view = RouteView::new(&route);
        assert_eq!(view.total, "0 Birr");
        assert_eq!(view.summary, "Piassa");
        assert!(!view.has_legs());
    }

    #[test]
    fn fractional_prices_keep_their_decimals() {
        let row = LegRow::from_leg(&RouteLeg {
            from: "Piassa".into(),
            to: "Arat Kilo".into(),
            price: Price::new(12.5).unwrap(),
        });
        assert_eq!(row.label(), "Piassa → Arat Kilo : 12.5 Birr");
    }
}
