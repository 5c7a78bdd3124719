//! The last good directory load, kept on disk.
//!
//! A restart serves the saved places straight away, stamped with the time
//! they were really fetched, instead of waiting on the backend. A snapshot
//! older than `max_age` is still served, but the directory refreshes it
//! immediately.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Place;

use super::directory::PlaceIndex;
use super::error::PlaceError;

/// How long a load stays fresh: 24 hours.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDirectory {
    loaded_at: DateTime<Utc>,
    places: Vec<Place>,
}

/// Where the snapshot lives and when it goes stale.
#[derive(Debug, Clone)]
pub struct PlaceCacheConfig {
    pub path: PathBuf,
    pub max_age: Duration,
}

impl PlaceCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

/// A directory read back from disk.
#[derive(Debug, Clone)]
pub struct CachedDirectory {
    /// When the backend answered, not when the file was read.
    pub loaded_at: DateTime<Utc>,
    pub index: PlaceIndex,
}

impl CachedDirectory {
    /// Whether the load is at least `max_age` old at `now`.
    pub fn is_stale_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        is_older_than(self.loaded_at, max_age, now)
    }
}

/// `loaded_at` is at least `max_age` before `now`.
pub(crate) fn is_older_than(
    loaded_at: DateTime<Utc>,
    max_age: Duration,
    now: DateTime<Utc>,
) -> bool {
    let age = now.signed_duration_since(loaded_at);
    // Out of range only for absurd ages; those are stale.
    match chrono::Duration::from_std(max_age) {
        Ok(max_age) => age >= max_age,
        Err(_) => true,
    }
}

#[derive(Debug, Clone)]
pub struct PlaceCache {
    config: PlaceCacheConfig,
}

impl PlaceCache {
    pub fn new(config: PlaceCacheConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn max_age(&self) -> Duration {
        self.config.max_age
    }

    /// The saved directory, stale or not.
    ///
    /// `None` when there is no file or it can't be parsed. Coordinates are
    /// validated on the way in, so a hand-edited file with a bad location is
    /// rejected whole.
    pub fn read(&self) -> Option<CachedDirectory> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let stored: StoredDirectory = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                let path = self.config.path.display();
                debug!(%path, error = %e, "ignoring unreadable place cache");
                return None;
            }
        };

        Some(CachedDirectory {
            loaded_at: stored.loaded_at,
            index: PlaceIndex::new(stored.places),
        })
    }

    /// Save `index` as loaded at `loaded_at`, creating parent directories.
    pub fn write(&self, index: &PlaceIndex, loaded_at: DateTime<Utc>) -> Result<(), PlaceError> {
        let stored = StoredDirectory {
            loaded_at,
            places: index.places().cloned().collect(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| PlaceError::Cache {
                message: format!("failed to create cache directory: {e}"),
            })?;
        }

        let json = serde_json::to_vec(&stored).map_err(|e| PlaceError::Cache {
            message: format!("failed to serialize place cache: {e}"),
        })?;

        // Write then rename so a crash never leaves half a file behind.
        let tmp = self.config.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, &self.config.path))
            .map_err(|e| PlaceError::Cache {
                message: format!("failed to write place cache: {e}"),
            })
    }
}
