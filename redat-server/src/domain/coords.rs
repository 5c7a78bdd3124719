//! Coordinate types.
//!
//! The backend and the place directory speak GeoJSON order
//! (`[longitude, latitude]`) while the map speaks `(latitude, longitude)`.
//! The two orders get distinct types so they cannot be swapped silently.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A position in GeoJSON axis order: `[lng, lat]`.
///
/// Valid by construction: both axes are finite and in range.
///
/// # Examples
///
/// ```
/// use redat_server::domain::LngLat;
///
/// let piassa = LngLat::new(38.7525, 9.0330).unwrap();
/// assert_eq!(piassa.lat(), 9.0330);
///
/// // Latitude out of range
/// assert!(LngLat::new(38.75, 91.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    lng: f64,
    lat: f64,
}

impl LngLat {
    /// Create a position, checking both axes.
    pub fn new(lng: f64, lat: f64) -> Result<Self, DomainError> {
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinate {
                axis: "longitude",
                value: lng,
            });
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::InvalidCoordinate {
                axis: "latitude",
                value: lat,
            });
        }
        Ok(Self { lng, lat })
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// The same position in map axis order.
    pub fn to_lat_lng(self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

impl TryFrom<[f64; 2]> for LngLat {
    type Error = DomainError;

    fn try_from([lng, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lng, lat)
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

impl fmt::Debug for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LngLat({}, {})", self.lng, self.lat)
    }
}

/// A position in map axis order: `(lat, lng)`.
///
/// Only obtainable from a validated [`LngLat`] or a fixed constant, so it is
/// always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Build from constants known to be in range (e.g. the default map center).
    pub const fn from_const(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

/// A lat/lng bounding box.
///
/// Starts empty, which is *not* a valid region; it becomes valid once the
/// first point is added.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    corners: Option<(LatLng, LatLng)>,
}

impl Bounds {
    /// An empty (invalid) region.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grow the region to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.corners = Some(match self.corners {
            None => (point, point),
            Some((sw, ne)) => (
                LatLng::from_const(sw.lat.min(point.lat), sw.lng.min(point.lng)),
                LatLng::from_const(ne.lat.max(point.lat), ne.lng.max(point.lng)),
            ),
        });
    }

    /// Whether at least one point has been added.
    pub fn is_valid(&self) -> bool {
        self.corners.is_some()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.corners.map(|(sw, _)| sw)
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.corners.map(|(_, ne)| ne)
    }

    /// The covered region, or `None` while nothing has been added.
    ///
    /// This is the only way to get a [`Region`], so an empty box can never
    /// reach a viewport fit.
    pub fn region(&self) -> Option<Region> {
        self.corners.map(|(south_west, north_east)| Region {
            south_west,
            north_east,
        })
    }
}

/// A non-empty lat/lng box.
///
/// Serializes as `[[south, west], [north, east]]`, as Leaflet's `fitBounds`
/// takes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[[f64; 2]; 2]")]
pub struct Region {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl From<Region> for [[f64; 2]; 2] {
    fn from(r: Region) -> Self {
        [r.south_west.into(), r.north_east.into()]
    }
}

impl FromIterator<LatLng> for Bounds {
    fn from_iter<I: IntoIterator<Item = LatLng>>(iter: I) -> Self {
        let mut bounds = Bounds::empty();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}
