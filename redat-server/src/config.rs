//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::places::{PlaceCacheConfig, PlaceClientConfig};
use crate::routing::RouteClientConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    BadAddr { var: &'static str, value: String },

    #[error("{var} is not a whole number of seconds: {value}")]
    BadTimeout { var: &'static str, value: String },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: String,
    pub places: PlaceClientConfig,
    pub routes: RouteClientConfig,
    /// Disk cache for the place directory; `None` disables it
    pub places_cache: Option<PlaceCacheConfig>,
}

impl AppConfig {
    /// Read `REDAT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind = var("REDAT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::BadAddr {
            var: "REDAT_BIND_ADDR",
            value: bind.clone(),
        })?;

        let timeout_secs = match var("REDAT_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::BadTimeout {
                var: "REDAT_HTTP_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let places = match var("REDAT_PLACES_URL") {
            Some(url) => PlaceClientConfig::new(url),
            None => PlaceClientConfig::default(),
        }
        .with_timeout(timeout_secs);

        let mut routes = match var("REDAT_ROUTE_URL") {
            Some(url) => RouteClientConfig::new(url),
            None => RouteClientConfig::default(),
        }
        .with_timeout(timeout_secs);
        // Not trimmed: the suffix usually starts with a space.
        if let Some(suffix) = lookup("REDAT_ROUTE_NAME_SUFFIX").filter(|s| !s.is_empty()) {
            routes = routes.with_name_suffix(suffix);
        }

        Ok(Self {
            bind_addr,
            static_dir: var("REDAT_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            places,
            routes,
            places_cache: var("REDAT_PLACES_CACHE")
                .map(|path| PlaceCacheConfig::new(PathBuf::from(path))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.places.base_url, "http://localhost:8080");
        assert_eq!(
            config.routes.route_url,
            "https://redat-backend-production.up.railway.app/route-map"
        );
        assert!(config.routes.name_suffix.is_none());
        assert_eq!(config.routes.timeout_secs, 30);
        assert!(config.places_cache.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("REDAT_BIND_ADDR", "0.0.0.0:8000"),
            ("REDAT_PLACES_URL", "http://places.test"),
            ("REDAT_ROUTE_URL", "http://routes.test/route-map"),
            ("REDAT_ROUTE_NAME_SUFFIX", " Station"),
            ("REDAT_STATIC_DIR", "/srv/static"),
            ("REDAT_PLACES_CACHE", "/var/cache/places.json"),
            ("REDAT_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.places.base_url, "http://places.test");
        assert_eq!(config.places.timeout_secs, 5);
        assert_eq!(config.routes.route_url, "http://routes.test/route-map");
        assert_eq!(config.routes.name_suffix.as_deref(), Some(" Station"));
        assert_eq!(config.static_dir, "/srv/static");
        assert_eq!(config.places_cache.unwrap().path, PathBuf::from("/var/cache/places.json"));
    }

    #[test]
    fn blank_values_fall_back() {
        let config = config(&[("REDAT_BIND_ADDR", " "), ("REDAT_PLACES_CACHE", "")]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.places_cache.is_none());
    }

    #[test]
    fn bad_values_are_errors() {
        let err = config(&[("REDAT_BIND_ADDR", "localhost")]).unwrap_err();
        assert_eq!(err.to_string(), "REDAT_BIND_ADDR is not a valid socket address: localhost");

        let err = config(&[("REDAT_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::BadTimeout { .. }));
    }
}
