//! Route endpoint HTTP client.
//!
//! One GET per request, no retries and no caching: every map view fetches
//! its route afresh.

use std::future::Future;

use tracing::debug;

use crate::domain::{KnownPlace, Route};

use super::error::RouteError;
use super::types::{RouteOutcome, RouteResponse};

/// Default route endpoint.
const DEFAULT_ROUTE_URL: &str = "https://redat-backend-production.up.railway.app/route-map";

/// Something that can answer "how do I get from A to B".
///
/// Implemented by [`RouteClient`]; tests substitute an in-memory provider.
/// Taking [`KnownPlace`]s means callers must have validated both names
/// against the place directory first.
pub trait RouteProvider {
    fn fetch_route(
        &self,
        from: &KnownPlace,
        to: &KnownPlace,
    ) -> impl Future<Output = Result<Route, RouteError>> + Send;
}

/// Configuration for the route client.
#[derive(Debug, Clone)]
pub struct RouteClientConfig {
    /// Full URL of the route endpoint
    pub route_url: String,
    /// Appended to both names before sending, for backends that key
    /// stations as e.g. "Piassa Station"
    pub name_suffix: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RouteClientConfig {
    pub fn new(route_url: impl Into<String>) -> Self {
        Self {
            route_url: route_url.into(),
            name_suffix: None,
            timeout_secs: 30,
        }
    }

    /// Set a suffix to append to place names.
    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = Some(suffix.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RouteClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_URL)
    }
}

/// Client for the backend route endpoint.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    route_url: String,
    name_suffix: Option<String>,
}

impl RouteClient {
    pub fn new(config: RouteClientConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            route_url: config.route_url,
            name_suffix: config.name_suffix,
        })
    }

    fn wire_name(&self, place: &KnownPlace) -> String {
        match &self.name_suffix {
            Some(suffix) => format!("{}{}", place.name(), suffix),
            None => place.name().to_string(),
        }
    }

    /// Fetch the route between two validated places.
    pub async fn fetch(&self, from: &KnownPlace, to: &KnownPlace) -> Result<Route, RouteError> {
        let from_name = self.wire_name(from);
        let to_name = self.wire_name(to);
        debug!(from = %from_name, to = %to_name, "requesting route");

        let response = self
            .http
            .get(&self.route_url)
            .query(&[("from", from_name.as_str()), ("to", to_name.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // A structured `{ error }` is the rider's message whatever the status.
        let parsed = serde_json::from_str::<RouteResponse>(&body);

        if !status.is_success() {
            if let Ok(RouteResponse {
                error: Some(message),
                ..
            }) = parsed
                && !message.is_empty()
            {
                return Err(RouteError::Validation(message));
            }
            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let parsed = parsed.map_err(|e| RouteError::Parse {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        match parsed.into_outcome() {
            Ok(RouteOutcome::Found(route)) => Ok(route),
            Ok(RouteOutcome::Rejected(message)) => Err(RouteError::Validation(message)),
            Err(e) => Err(RouteError::Parse {
                message: e.to_string(),
                body: None,
            }),
        }
    }
}

impl RouteProvider for RouteClient {
    async fn fetch_route(&self, from: &KnownPlace, to: &KnownPlace) -> Result<Route, RouteError> {
        self.fetch(from, to).await
    }
}
