//! Approximate zip-prefix region table.
//!
//! A hand-authored, versionable data asset mapping 3-digit zip prefixes to
//! coarse regional centroids (`config/zip_regions.yaml`). Used as the
//! offline fallback when a zip has never been geocoded: a prefix centroid
//! is accurate to tens of miles, which is good enough to rank candidates
//! when no better coordinate exists and the caller has opted into the
//! low-fidelity path.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{zip::zip_prefix, ConfigError, Coordinate};

/// One contiguous, inclusive range of 3-digit zip prefixes sharing a
/// centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipRegion {
    pub prefix_start: u16,
    pub prefix_end: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZipRegionsFile {
    pub regions: Vec<ZipRegion>,
}

/// Validated, lookup-ready region table.
///
/// Invariants (enforced on construction): every bound is a 3-digit value,
/// `prefix_start <= prefix_end`, ranges are in ascending order and do not
/// overlap. A prefix may fall in no range — that is a fallback miss, not
/// an error.
#[derive(Debug, Clone)]
pub struct ZipRegionTable {
    regions: Vec<ZipRegion>,
}

impl ZipRegionTable {
    /// Build a table from raw regions, enforcing the range invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on out-of-bound, inverted,
    /// unordered, or overlapping ranges.
    pub fn from_regions(regions: Vec<ZipRegion>) -> Result<Self, ConfigError> {
        validate_regions(&regions)?;
        Ok(Self { regions })
    }

    /// Centroid for a 3-digit prefix, or `None` on a fallback miss.
    #[must_use]
    pub fn lookup_prefix(&self, prefix: u16) -> Option<Coordinate> {
        // Ranges are sorted and disjoint, so the first range ending at or
        // after `prefix` is the only possible hit.
        let idx = self.regions.partition_point(|r| r.prefix_end < prefix);
        let region = self.regions.get(idx)?;
        if region.prefix_start <= prefix {
            Coordinate::new(region.latitude, region.longitude)
        } else {
            None
        }
    }

    /// Centroid for a free-form zip (normalized internally).
    #[must_use]
    pub fn lookup_zip(&self, zip: &str) -> Option<Coordinate> {
        self.lookup_prefix(zip_prefix(zip)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Load and validate the zip region table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// range validation.
pub fn load_zip_regions(path: &Path) -> Result<ZipRegionTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RegionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ZipRegionsFile = serde_yaml::from_str(&content)?;
    ZipRegionTable::from_regions(file.regions)
}

fn validate_regions(regions: &[ZipRegion]) -> Result<(), ConfigError> {
    let mut prev_end: Option<u16> = None;

    for region in regions {
        if region.prefix_start > 999 || region.prefix_end > 999 {
            return Err(ConfigError::Validation(format!(
                "region {}-{} exceeds the 3-digit prefix space",
                region.prefix_start, region.prefix_end
            )));
        }
        if region.prefix_start > region.prefix_end {
            return Err(ConfigError::Validation(format!(
                "region {}-{} has start after end",
                region.prefix_start, region.prefix_end
            )));
        }
        if let Some(end) = prev_end {
            if region.prefix_start <= end {
                return Err(ConfigError::Validation(format!(
                    "region {}-{} overlaps or is out of order with previous range ending at {}",
                    region.prefix_start, region.prefix_end, end
                )));
            }
        }
        if Coordinate::new(region.latitude, region.longitude).is_none() {
            return Err(ConfigError::Validation(format!(
                "region {}-{} has an out-of-range centroid ({}, {})",
                region.prefix_start, region.prefix_end, region.latitude, region.longitude
            )));
        }
        prev_end = Some(region.prefix_end);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u16, end: u16, lat: f64, lng: f64) -> ZipRegion {
        ZipRegion {
            prefix_start: start,
            prefix_end: end,
            latitude: lat,
            longitude: lng,
            label: None,
        }
    }

    fn sample_table() -> ZipRegionTable {
        ZipRegionTable::from_regions(vec![
            region(100, 149, 42.9, -75.5),
            region(430, 459, 40.4, -82.8),
            region(900, 961, 37.2, -119.3),
        ])
        .expect("valid table")
    }

    #[test]
    fn lookup_hits_inside_each_range() {
        let table = sample_table();
        let ohio = table.lookup_prefix(442).expect("442 is in 430-459");
        assert!((ohio.latitude - 40.4).abs() < f64::EPSILON);

        assert!(table.lookup_prefix(100).is_some());
        assert!(table.lookup_prefix(149).is_some());
        assert!(table.lookup_prefix(961).is_some());
    }

    #[test]
    fn lookup_misses_between_and_outside_ranges() {
        let table = sample_table();
        assert!(table.lookup_prefix(99).is_none());
        assert!(table.lookup_prefix(150).is_none());
        assert!(table.lookup_prefix(429).is_none());
        assert!(table.lookup_prefix(999).is_none());
    }

    #[test]
    fn lookup_zip_normalizes_before_prefixing() {
        let table = sample_table();
        assert!(table.lookup_zip("44289-8800").is_some());
        assert!(table.lookup_zip("not a zip").is_none());
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let err = ZipRegionTable::from_regions(vec![
            region(100, 149, 42.9, -75.5),
            region(140, 160, 41.0, -75.0),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("overlaps"));
    }

    #[test]
    fn rejects_out_of_order_ranges() {
        let err = ZipRegionTable::from_regions(vec![
            region(430, 459, 40.4, -82.8),
            region(100, 149, 42.9, -75.5),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ZipRegionTable::from_regions(vec![region(459, 430, 40.4, -82.8)]).unwrap_err();
        assert!(err.to_string().contains("start after end"));
    }

    #[test]
    fn rejects_four_digit_prefix() {
        let err = ZipRegionTable::from_regions(vec![region(100, 1000, 40.0, -80.0)]).unwrap_err();
        assert!(err.to_string().contains("3-digit"));
    }

    #[test]
    fn rejects_out_of_range_centroid() {
        let err = ZipRegionTable::from_regions(vec![region(100, 149, 95.0, -75.5)]).unwrap_err();
        assert!(err.to_string().contains("centroid"));
    }

    #[test]
    fn loads_and_validates_the_shipped_table() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("zip_regions.yaml");
        assert!(
            path.exists(),
            "zip_regions.yaml missing at {path:?} — required for this test"
        );
        let table = load_zip_regions(&path).expect("shipped table must validate");
        assert!(!table.is_empty());
        // Every state-level range the search depends on should resolve.
        assert!(table.lookup_prefix(442).is_some(), "northeast Ohio");
        assert!(table.lookup_prefix(100).is_some(), "New York City");
        assert!(table.lookup_prefix(900).is_some(), "Los Angeles");
    }
}
