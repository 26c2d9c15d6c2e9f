//! Zip coordinate resolution cascade.
//!
//! Stages are tried in order and short-circuit on the first answer:
//! cache (including cached negatives), then the remote source. The
//! approximate-region fallback is a separate, explicitly invoked path —
//! it is never silently substituted for a cached or remote coordinate,
//! because callers need to know when they are ranking against a centroid
//! that may be tens of miles off.

use std::time::Duration;

use talentgeo_core::{normalize_zip, Coordinate, ZipRegionTable};

use crate::cache::{CacheEntry, GeoCache};
use crate::client::GeocodeClient;
use crate::error::{CacheError, GeocodeError};

/// A zip resolved to a coordinate, with whatever place metadata the
/// cache or remote source had.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedZip {
    pub zip: String,
    pub coordinate: Coordinate,
    pub place: Option<String>,
    pub region: Option<String>,
}

/// Per-zip outcome of a batch resolution.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The input as given (pre-normalization).
    pub input: String,
    /// `Ok(Some)` resolved, `Ok(None)` unresolvable or confirmed invalid,
    /// `Err` transient failure (retryable on a later run).
    pub result: Result<Option<ResolvedZip>, GeocodeError>,
}

/// Cache-first resolver over the remote geocoding source.
///
/// Owns the cache map for the process lifetime; lookups and writes go
/// through `&mut self`, which is the single-writer discipline the cache
/// requires. Batch callers flush the cache explicitly — resolution never
/// writes the durable store per call.
pub struct ZipResolver {
    client: GeocodeClient,
    cache: GeoCache,
    regions: ZipRegionTable,
    batch_delay: Duration,
}

impl ZipResolver {
    #[must_use]
    pub fn new(
        client: GeocodeClient,
        cache: GeoCache,
        regions: ZipRegionTable,
        batch_delay_ms: u64,
    ) -> Self {
        Self {
            client,
            cache,
            regions,
            batch_delay: Duration::from_millis(batch_delay_ms),
        }
    }

    /// Resolve a single zip: cache, then remote. No inter-request delay —
    /// that only applies inside [`ZipResolver::resolve_batch`].
    ///
    /// Returns `Ok(None)` for input that does not normalize (fewer than
    /// three digits — cache and network are not touched) and for
    /// confirmed-invalid zips (which are cached so the dead zip is never
    /// fetched again).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on transient failure (network, timeout,
    /// unexpected status, malformed payload). Transient failures are NOT
    /// cached; the next call retries the remote source.
    pub async fn resolve(&mut self, input: &str) -> Result<Option<ResolvedZip>, GeocodeError> {
        let (result, _made_remote_call) = self.resolve_tracking_remote(input).await;
        result
    }

    /// Resolve many zips sequentially, sleeping the configured delay
    /// between consecutive *remote* calls. Cache hits and unresolvable
    /// inputs cost nothing and trigger no delay.
    ///
    /// Transient failures are recorded per zip and do not abort the batch.
    /// The caller is responsible for flushing the cache afterwards.
    pub async fn resolve_batch(&mut self, inputs: &[String]) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(inputs.len());
        let mut any_remote_call = false;

        for input in inputs {
            // Sleep only when this zip will actually go to the remote
            // source and an earlier one already has.
            let needs_remote = normalize_zip(input)
                .is_some_and(|zip| self.cache.get(&zip).is_none());
            if needs_remote && any_remote_call {
                tokio::time::sleep(self.batch_delay).await;
            }

            let (result, made_remote_call) = self.resolve_tracking_remote(input).await;
            any_remote_call = any_remote_call || made_remote_call;
            outcomes.push(BatchOutcome {
                input: input.clone(),
                result,
            });
        }

        outcomes
    }

    /// Offline approximate fallback: 3-digit prefix against the static
    /// region table. Accuracy is regional, not street-level; callers opt
    /// into this path deliberately.
    #[must_use]
    pub fn resolve_approximate(&self, input: &str) -> Option<Coordinate> {
        self.regions.lookup_zip(input)
    }

    /// Offline-only resolution: cached coordinate if present, else the
    /// approximate region centroid. Never touches the network — the
    /// per-row loop of an exhaustive scan must not generate remote
    /// traffic.
    #[must_use]
    pub fn resolve_offline(&self, input: &str) -> Option<Coordinate> {
        let zip = normalize_zip(input)?;
        match self.cache.get(&zip) {
            // Cached negative: confirmed-invalid, do not fall through to
            // the region table for a zip known not to exist.
            Some(entry) => entry.coordinate,
            None => self.regions.lookup_zip(&zip),
        }
    }

    async fn resolve_tracking_remote(
        &mut self,
        input: &str,
    ) -> (Result<Option<ResolvedZip>, GeocodeError>, bool) {
        let Some(zip) = normalize_zip(input) else {
            tracing::debug!(input, "zip does not normalize; unresolvable");
            return (Ok(None), false);
        };

        if let Some(entry) = self.cache.get(&zip) {
            tracing::debug!(zip, negative = entry.is_negative(), "geocode cache hit");
            return (Ok(resolved_from_entry(&zip, entry)), false);
        }

        match self.client.lookup(&zip).await {
            Ok(place) => {
                tracing::debug!(zip, place = %place.place, region = %place.region, "geocoded remotely");
                let entry = CacheEntry::found(&place);
                let resolved = resolved_from_entry(&zip, &entry);
                self.cache.put(zip, entry);
                (Ok(resolved), true)
            }
            Err(e) if e.is_definitive_not_found() => {
                tracing::debug!(zip, "zip confirmed unassigned; caching negative");
                self.cache.put(zip, CacheEntry::not_found());
                (Ok(None), true)
            }
            Err(e) => {
                tracing::warn!(zip, error = %e, "transient geocode failure; not cached");
                (Err(e), true)
            }
        }
    }

    /// Flush the cache to its durable store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] on serialization or filesystem failure.
    pub fn flush_cache(&self) -> Result<(), CacheError> {
        self.cache.flush()
    }

    #[must_use]
    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }
}

fn resolved_from_entry(zip: &str, entry: &CacheEntry) -> Option<ResolvedZip> {
    entry.coordinate.map(|coordinate| ResolvedZip {
        zip: zip.to_owned(),
        coordinate,
        place: entry.place.clone(),
        region: entry.region.clone(),
    })
}
