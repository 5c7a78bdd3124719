//! Route endpoint wire types.
//!
//! The endpoint answers with either a route document or `{ "error": "…" }`.
//! Both shapes are read into one struct so the error field can be checked
//! first, the way the backend intends it.

use serde::Deserialize;

use crate::domain::{DomainError, LngLat, Price, Route, RouteLeg, Station};

/// Raw route endpoint response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Backend-reported semantic failure (e.g. "No route found").
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub route: Option<Vec<StationDto>>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

#[derive(Debug, Deserialize)]
pub struct StationDto {
    pub name: String,
    pub location: LocationDto,
}

/// GeoJSON-style point.
#[derive(Debug, Deserialize)]
pub struct LocationDto {
    /// `[lng, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub struct LegDto {
    pub from: String,
    pub to: String,
    pub price: f64,
}

/// What a response amounts to once the error field has been looked at.
#[derive(Debug)]
pub enum RouteOutcome {
    /// A valid route.
    Found(Route),
    /// The backend's own message, to be shown as-is.
    Rejected(String),
}

/// Why a response body could not be turned into a route.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("response has neither `route` nor `error`")]
    MissingRoute,

    #[error("response has no `total_price`")]
    MissingTotalPrice,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RouteResponse {
    /// Interpret the response.
    ///
    /// A non-empty `error` wins over anything else in the body.
    pub fn into_outcome(self) -> Result<RouteOutcome, ConversionError> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return Ok(RouteOutcome::Rejected(message));
        }

        let stations = self
            .route
            .ok_or(ConversionError::MissingRoute)?
            .into_iter()
            .map(|s| {
                let [lng, lat] = s.location.coordinates;
                Ok(Station::new(s.name, LngLat::new(lng, lat)?))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let legs = self
            .legs
            .into_iter()
            .map(|l| {
                Ok(RouteLeg {
                    from: l.from,
                    to: l.to,
                    price: Price::new(l.price)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let total_price = Price::new(self.total_price.ok_or(ConversionError::MissingTotalPrice)?)?;

        Ok(RouteOutcome::Found(Route::new(stations, legs, total_price)?))
    }
}
