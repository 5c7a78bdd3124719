//! Places in the city directory.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::LngLat;

/// A named location in the place directory.
///
/// Keyed by its display name, which is unique within one directory load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub location: LngLat,
    /// Taxi stations serving this place.
    pub stations: Vec<String>,
    /// Places reachable from here, when the backend knows them.
    pub connected_to: Option<Vec<String>>,
}

/// A place name confirmed to exist in the directory.
///
/// Only [`PlaceDirectory::resolve`](crate::places::PlaceDirectory::resolve)
/// hands these out, so anything holding a `KnownPlace` has been validated
/// (case-insensitive exact match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownPlace {
    name: String,
    typed: String,
}

impl KnownPlace {
    pub(crate) fn new(name: impl Into<String>, typed: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typed: typed.into(),
        }
    }

    /// The directory's spelling of the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The text as the rider entered it.
    pub fn typed(&self) -> &str {
        &self.typed
    }
}

impl fmt::Display for KnownPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
