//! Place lookup and autocomplete.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{KnownPlace, LngLat, Place};

use super::cache::{DEFAULT_MAX_AGE, PlaceCache, is_older_than};
use super::client::{PlaceClient, PlaceDto};
use super::error::PlaceError;

/// An immutable snapshot of the directory, keyed by display name.
///
/// Answers autocomplete and validation queries synchronously; the page
/// controllers work against one of these rather than the live directory.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    places: BTreeMap<String, Place>,
}

impl PlaceIndex {
    pub fn new(places: impl IntoIterator<Item = Place>) -> Self {
        Self {
            places: places.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    /// Every name containing `query`, ignoring case, in directory order.
    ///
    /// An empty (or all-whitespace) query matches nothing, so no suggestion
    /// list is shown for an empty field.
    pub fn search(&self, query: &str) -> Vec<String> {
        search_names(query, self.places.keys().map(String::as_str))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Confirm `input` names a place (case-insensitive exact match).
    pub fn resolve(&self, input: &str) -> Option<KnownPlace> {
        let wanted = input.to_lowercase();
        self.places
            .keys()
            .find(|name| name.to_lowercase() == wanted)
            .map(|name| KnownPlace::new(name.clone(), input))
    }

    pub fn get(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    /// All places, in name order.
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// The matching rule behind autocomplete: case-insensitive substring.
pub fn search_names<'a>(query: &str, names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect()
}

/// Load state, reported by the health endpoint and the search page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryStatus {
    pub places: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    index: Arc<PlaceIndex>,
    status: DirectoryStatus,
}

/// Thread-safe place directory.
///
/// Loaded once at startup and refreshed in the background; request handlers
/// only ever take a snapshot via [`PlaceDirectory::index`].
#[derive(Clone)]
pub struct PlaceDirectory {
    inner: Arc<RwLock<Inner>>,
    client: PlaceClient,
    cache: Option<PlaceCache>,
}

impl PlaceDirectory {
    /// Create a directory by fetching from the API.
    ///
    /// This will fail if the API is unreachable.
    pub async fn fetch(client: PlaceClient) -> Result<Self, PlaceError> {
        let directory = Self::empty(client);
        directory.refresh().await?;
        Ok(directory)
    }

    /// Create an empty directory. Every search and validation misses until a
    /// refresh succeeds.
    pub fn empty(client: PlaceClient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            client,
            cache: None,
        }
    }

    /// Create a directory pre-populated with `places`.
    pub fn with_places(client: PlaceClient, places: impl IntoIterator<Item = Place>) -> Self {
        let index = PlaceIndex::new(places);
        let status = DirectoryStatus {
            places: index.len(),
            loaded_at: Some(Utc::now()),
            last_error: None,
        };
        Self {
            inner: Arc::new(RwLock::new(Inner {
                index: Arc::new(index),
                status,
            })),
            client,
            cache: None,
        }
    }

    /// Back the directory with a disk cache.
    pub fn with_cache(mut self, cache: PlaceCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Initial load: the disk cache if there is one, else the API.
    ///
    /// A cached load keeps the time it was originally fetched. If that is
    /// older than the cache's max age the API is tried straight away; should
    /// that fail, the stale places are kept and the error is recorded.
    pub async fn load(&self) -> Result<usize, PlaceError> {
        let Some(cache) = &self.cache else {
            return self.refresh().await;
        };
        let Some(cached) = cache.read() else {
            return self.refresh().await;
        };

        let stale = cached.is_stale_at(cache.max_age(), Utc::now());
        let loaded_at = cached.loaded_at;
        let count = self.install(cached.index, loaded_at).await;
        info!(places = count, %loaded_at, stale, "loaded place directory from disk cache");
        if !stale {
            return Ok(count);
        }

        match self.refresh().await {
            Ok(count) => Ok(count),
            Err(e) => {
                warn!(error = %e, %loaded_at, "refresh failed; serving stale cached places");
                Ok(count)
            }
        }
    }

    /// Refresh from the API.
    ///
    /// On success, replaces the current directory. On failure, the existing
    /// directory is preserved and the error is recorded and returned.
    pub async fn refresh(&self) -> Result<usize, PlaceError> {
        let places = match self.client.fetch_all().await {
            Ok(places) => places,
            Err(e) => {
                self.inner.write().await.status.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let index = build_index(places);
        let loaded_at = Utc::now();
        if let Some(cache) = &self.cache
            && let Err(e) = cache.write(&index, loaded_at)
        {
            warn!(error = %e, path = %cache.path().display(), "failed to write place cache");
        }

        Ok(self.install(index, loaded_at).await)
    }

    async fn install(&self, index: PlaceIndex, loaded_at: DateTime<Utc>) -> usize {
        let count = index.len();
        let mut guard = self.inner.write().await;
        guard.index = Arc::new(index);
        guard.status = DirectoryStatus {
            places: count,
            loaded_at: Some(loaded_at),
            last_error: None,
        };
        count
    }

    /// Whether the current places are at least `max_age` old. A directory
    /// that has never loaded is always stale.
    pub async fn is_stale(&self, max_age: Duration) -> bool {
        match self.inner.read().await.status.loaded_at {
            Some(loaded_at) => is_older_than(loaded_at, max_age, Utc::now()),
            None => true,
        }
    }

    /// How old places may get before the refresh task replaces them.
    pub fn max_age(&self) -> Duration {
        self.cache
            .as_ref()
            .map_or(DEFAULT_MAX_AGE, PlaceCache::max_age)
    }

    /// The current snapshot.
    pub async fn index(&self) -> Arc<PlaceIndex> {
        Arc::clone(&self.inner.read().await.index)
    }

    pub async fn search(&self, query: &str) -> Vec<String> {
        self.index().await.search(query)
    }

    pub async fn resolve(&self, input: &str) -> Option<KnownPlace> {
        self.index().await.resolve(input)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.index.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.index.is_empty()
    }

    pub async fn status(&self) -> DirectoryStatus {
        self.inner.read().await.status.clone()
    }
}

/// Build the index from wire DTOs, dropping entries with bad coordinates.
fn build_index(places: BTreeMap<String, PlaceDto>) -> PlaceIndex {
    PlaceIndex::new(places.into_iter().filter_map(|(key, dto)| {
        let [lng, lat] = dto.location;
        match LngLat::new(lng, lat) {
            Ok(location) => Some(Place {
                name: key,
                location,
                stations: dto.stations,
                connected_to: dto.connected_to,
            }),
            Err(e) => {
                warn!(place = %key, error = %e, "dropping place with invalid location");
                None
            }
        }
    }))
}
