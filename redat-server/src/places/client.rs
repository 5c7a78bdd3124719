//! Place directory API client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PlaceError;

/// Default base URL for the place directory backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Wrapper for the places response.
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub places: BTreeMap<String, PlaceDto>,
}

/// Wire form of a place.
///
/// The location is kept raw here; it is validated when the directory is
/// built so one bad entry doesn't sink the whole load.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDto {
    /// Usually absent: the map key is the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `[lng, lat]`
    pub location: [f64; 2],
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default, alias = "connected")]
    pub connected_to: Option<Vec<String>>,
}

/// Configuration for the place directory client.
#[derive(Debug, Clone)]
pub struct PlaceClientConfig {
    /// Base URL; the directory lives at `{base_url}/places`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlaceClientConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for PlaceClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the place directory endpoint.
#[derive(Debug, Clone)]
pub struct PlaceClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaceClient {
    /// Create a new place directory client.
    pub fn new(config: PlaceClientConfig) -> Result<Self, PlaceError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the whole directory.
    pub async fn fetch_all(&self) -> Result<BTreeMap<String, PlaceDto>, PlaceError> {
        let url = format!("{}/places", self.base_url);
        debug!(%url, "fetching place directory");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlaceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let response: PlacesResponse =
            serde_json::from_str(&body).map_err(|e| PlaceError::Json {
                message: e.to_string(),
            })?;

        Ok(response.places)
    }
}
