use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use redat_server::config::AppConfig;
use redat_server::map::MapConfig;
use redat_server::places::{PlaceCache, PlaceClient, PlaceDirectory};
use redat_server::routing::RouteClient;
use redat_server::web::{AppState, create_router};

/// How often the refresh task checks whether the places are stale.
const PLACE_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("redat_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let place_client =
        PlaceClient::new(config.places.clone()).expect("Failed to create place client");
    let mut directory = PlaceDirectory::empty(place_client);
    if let Some(cache_config) = config.places_cache.clone() {
        directory = directory.with_cache(PlaceCache::new(cache_config));
    }

    // Keep serving without places rather than not at all; the search page
    // says so and /health shows the error.
    info!(url = %config.places.base_url, "loading place directory");
    match directory.load().await {
        Ok(count) => info!(places = count, "place directory loaded"),
        Err(e) => warn!(error = %e, "place directory unavailable; starting empty"),
    }

    // Refetch once the places reach their max age. A restart from an old
    // cache or a failed startup load is picked up on the next check.
    let directory_refresh = directory.clone();
    tokio::spawn(async move {
        let max_age = directory_refresh.max_age();
        let mut interval = tokio::time::interval(PLACE_CHECK_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if !directory_refresh.is_stale(max_age).await {
                continue;
            }
            match directory_refresh.refresh().await {
                Ok(count) => info!(places = count, "refreshed place directory"),
                Err(e) => warn!(error = %e, "failed to refresh place directory"),
            }
        }
    });

    let routes = RouteClient::new(config.routes.clone()).expect("Failed to create route client");
    let state = AppState::new(directory, routes, MapConfig::default());
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listening socket");
    info!(addr = %config.bind_addr, route_url = %config.routes.route_url, "Redat listening");

    axum::serve(listener, app).await.expect("Server error");
}
