//! Route types.
//!
//! A `Route` is the backend's answer for one origin/destination pair: an
//! ordered list of stations with a priced leg between each consecutive pair.
//! It is built fresh from each response and never mutated afterwards.

use std::fmt;

use super::{DomainError, LngLat};

/// A fare in Birr.
///
/// Non-negative and finite by construction. Displays the way riders expect
/// to read it: whole amounts without a decimal point.
///
/// ```
/// use redat_server::domain::Price;
///
/// assert_eq!(Price::new(25.0).unwrap().to_string(), "25");
/// assert_eq!(Price::new(12.5).unwrap().to_string(), "12.5");
/// assert!(Price::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::InvalidPrice(amount));
        }
        Ok(Self(amount))
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, geolocated stop on a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub location: LngLat,
}

impl Station {
    pub fn new(name: impl Into<String>, location: LngLat) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// One priced segment between two consecutive stations.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub price: Price,
}

/// A complete route from origin to destination.
///
/// # Invariants
///
/// - At least one station (except [`Route::empty`])
/// - `legs.len() == stations.len() - 1`
/// - `legs[i]` runs from `stations[i]` to `stations[i + 1]`
///
/// The total price is the backend's figure and is carried unchanged; it is
/// not re-summed here.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stations: Vec<Station>,
    legs: Vec<RouteLeg>,
    total_price: Price,
}

impl Route {
    /// Constructs a route, validating the station/leg structure.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are no stations, the leg count is wrong, or a
    /// leg's endpoints don't match the stations either side of it.
    pub fn new(
        stations: Vec<Station>,
        legs: Vec<RouteLeg>,
        total_price: Price,
    ) -> Result<Self, DomainError> {
        if stations.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        if legs.len() != stations.len() - 1 {
            return Err(DomainError::LegCountMismatch {
                stations: stations.len(),
                legs: legs.len(),
            });
        }

        for (index, (leg, pair)) in legs.iter().zip(stations.windows(2)).enumerate() {
            if leg.from != pair[0].name || leg.to != pair[1].name {
                return Err(DomainError::LegMismatch {
                    index,
                    from: leg.from.clone(),
                    to: leg.to.clone(),
                    expected_from: pair[0].name.clone(),
                    expected_to: pair[1].name.clone(),
                });
            }
        }

        Ok(Self {
            stations,
            legs,
            total_price,
        })
    }

    /// A route with no stations.
    ///
    /// The backend never produces one; it exists so map synchronization can
    /// be driven with nothing to draw.
    pub fn empty() -> Self {
        Self {
            stations: Vec::new(),
            legs: Vec::new(),
            total_price: Price::zero(),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    pub fn total_price(&self) -> Price {
        self.total_price
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station coordinates in route order.
    pub fn waypoints(&self) -> Vec<LngLat> {
        self.stations.iter().map(|s| s.location).collect()
    }

    /// Station names joined with arrows, e.g. "Mexico Square → Piassa".
    pub fn summary(&self) -> String {
        self.stations
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any chain of distinct stations with matching legs is accepted,
        /// and legs always number one fewer than stations.
        #[test]
        fn chained_legs_always_valid(
            coords in proptest::collection::vec((-180.0f64..=180.0, -90.0f64..=90.0), 1..12),
            price in 0.0f64..500.0,
        ) {
            let stations: Vec<Station> = coords
                .iter()
                .enumerate()
                .map(|(i, (lng, lat))| {
                    Station::new(format!("S{i}"), LngLat::new(*lng, *lat).unwrap())
                })
                .collect();
            let legs: Vec<RouteLeg> = stations
                .windows(2)
                .map(|w| RouteLeg {
                    from: w[0].name.clone(),
                    to: w[1].name.clone(),
                    price: Price::new(price).unwrap(),
                })
                .collect();

            let route = Route::new(stations, legs, Price::new(price).unwrap()).unwrap();
            prop_assert_eq!(route.legs().len(), route.station_count() - 1);
            prop_assert_eq!(route.waypoints().len(), route.station_count());
        }
    }
}
