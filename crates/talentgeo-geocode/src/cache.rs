//! Durable zip → coordinate cache.
//!
//! A flat JSON map on disk, loaded wholesale at startup and overwritten
//! wholesale on flush. The persisted format is an implementation detail —
//! nothing external reads it — so the whole map is rewritten rather than
//! merged (last writer wins).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use talentgeo_core::Coordinate;

use crate::client::GeocodedPlace;
use crate::error::CacheError;

/// One cached resolution outcome.
///
/// `coordinate: None` is a *confirmed-invalid* zip: the source definitively
/// said the zip is unassigned, and that answer is worth remembering so the
/// same dead zip is never fetched twice. Entries are overwritten wholesale
/// on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CacheEntry {
    #[must_use]
    pub fn found(place: &GeocodedPlace) -> Self {
        Self {
            coordinate: Some(place.coordinate),
            place: Some(place.place.clone()),
            region: Some(place.region.clone()),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            coordinate: None,
            place: None,
            region: None,
        }
    }

    /// Whether this is a cached negative (confirmed-invalid zip).
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.coordinate.is_none()
    }
}

/// In-memory map over a durable JSON store.
///
/// `get` is three-valued through its `Option<&CacheEntry>` return: `None`
/// means the zip was never attempted, `Some(entry)` with a coordinate is a
/// hit, and `Some(entry)` with `coordinate: None` is a confirmed-invalid
/// zip that must not be re-fetched.
#[derive(Debug)]
pub struct GeoCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl GeoCache {
    /// An empty cache that will persist to `path` on flush.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: HashMap::new(),
        }
    }

    /// Populate a cache from the durable store at `path`.
    ///
    /// A missing or corrupt store is tolerated: the process starts with an
    /// empty cache and re-geocodes as needed. Startup never fails on cache
    /// state.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "geocode cache is corrupt; starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "geocode cache unreadable; starting empty"
                );
                HashMap::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "geocode cache loaded");
        Self { path, entries }
    }

    #[must_use]
    pub fn get(&self, zip: &str) -> Option<&CacheEntry> {
        self.entries.get(zip)
    }

    pub fn put(&mut self, zip: String, entry: CacheEntry) {
        self.entries.insert(zip, entry);
    }

    /// Overwrite the durable store with the current map.
    ///
    /// The map is serialized to a snapshot string first, written to a
    /// sibling temp file, then renamed over the target — a flush can never
    /// leave a half-written store behind, and `put`s landing after the
    /// snapshot simply ride the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] on serialization or filesystem failure.
    pub fn flush(&self) -> Result<(), CacheError> {
        let snapshot = serde_json::to_string_pretty(&self.entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, snapshot).map_err(|e| CacheError::Io {
            path: tmp_path.display().to_string(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| CacheError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;

        tracing::info!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "geocode cache flushed"
        );
        Ok(())
    }

    /// Drop every entry, in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the durable store exists but cannot
    /// be removed.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                path: self.path.display().to_string(),
                source: e,
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of cached negatives (confirmed-invalid zips).
    #[must_use]
    pub fn negative_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_negative()).count()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
