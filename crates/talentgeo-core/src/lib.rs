use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod distance;
pub mod regions;
pub mod zip;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{bounding_box, distance_miles, BoundingBox, METERS_PER_MILE};
pub use regions::{load_zip_regions, ZipRegion, ZipRegionTable};
pub use zip::{normalize_zip, zip_prefix};

/// A latitude/longitude pair in decimal degrees.
///
/// Construct via [`Coordinate::new`] to get range validation; the fields stay
/// public because most call sites build coordinates from already-validated
/// database columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90, 90] / [-180, 180]
    /// and non-finite floats.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read zip regions file {path}: {source}")]
    RegionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse zip regions file: {0}")]
    RegionsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_new_accepts_valid_range() {
        let c = Coordinate::new(41.01, -81.84).expect("valid coordinate");
        assert!((c.latitude - 41.01).abs() < f64::EPSILON);
        assert!((c.longitude - (-81.84)).abs() < f64::EPSILON);
    }

    #[test]
    fn coordinate_new_rejects_out_of_range_latitude() {
        assert!(Coordinate::new(90.01, 0.0).is_none());
        assert!(Coordinate::new(-90.01, 0.0).is_none());
    }

    #[test]
    fn coordinate_new_rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, 180.01).is_none());
        assert!(Coordinate::new(0.0, -180.01).is_none());
    }

    #[test]
    fn coordinate_new_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn coordinate_serializes_as_plain_fields() {
        let c = Coordinate {
            latitude: 41.0,
            longitude: -81.0,
        };
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(json.contains("\"latitude\":41.0"));
        assert!(json.contains("\"longitude\":-81.0"));
    }
}
