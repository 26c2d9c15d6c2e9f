//! Great-circle distance and bounding-box math.
//!
//! Everything here is pure: the radius planner uses [`distance_miles`] both
//! to rank results and to refine bounding-box candidates, and uses
//! [`bounding_box`] to build the coarse rectangular pre-filter. The same
//! Haversine is applied to exact stored points and to approximate region
//! centroids; precision is whatever the upstream coordinate was.

use crate::Coordinate;

/// Mean Earth radius in miles, matching the legacy search behavior.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Approximate miles spanned by one degree of latitude.
pub const MILES_PER_LAT_DEGREE: f64 = 69.0;

/// Conversion factor for spatial predicates that take meters.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Axis-aligned rectangle used as a cheap pre-filter before exact
/// circular-distance evaluation. Corners over-include; the exact filter
/// corrects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Whether a point falls inside the rectangle (inclusive edges).
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }
}

/// Haversine great-circle distance between two coordinates, in miles.
///
/// Symmetric, exactly zero for identical inputs, and monotonic with
/// angular separation.
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    // Clamp guards the acos/asin domain against floating-point drift on
    // antipodal points.
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Rectangular bound around `center` sized to contain a `radius_miles`
/// circle.
///
/// The longitude delta widens with latitude (degrees of longitude shrink
/// toward the poles); at extreme latitudes the delta is capped at a full
/// hemisphere rather than diverging.
#[must_use]
pub fn bounding_box(center: Coordinate, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles / MILES_PER_LAT_DEGREE;
    let cos_lat = center.latitude.to_radians().cos();
    let lng_delta = if cos_lat <= f64::EPSILON {
        180.0
    } else {
        (radius_miles / (MILES_PER_LAT_DEGREE * cos_lat)).min(180.0)
    };

    BoundingBox {
        min_lat: (center.latitude - lat_delta).max(-90.0),
        max_lat: (center.latitude + lat_delta).min(90.0),
        min_lng: (center.longitude - lng_delta).max(-180.0),
        max_lng: (center.longitude + lng_delta).min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STERLING_OH: Coordinate = Coordinate {
        latitude: 41.01,
        longitude: -81.84,
    };
    const MEDINA_OH: Coordinate = Coordinate {
        latitude: 41.1434,
        longitude: -81.8632,
    };
    const NEW_YORK_NY: Coordinate = Coordinate {
        latitude: 40.7484,
        longitude: -73.9967,
    };

    #[test]
    fn distance_to_self_is_exactly_zero() {
        assert_eq!(distance_miles(STERLING_OH, STERLING_OH), 0.0);
        assert_eq!(distance_miles(NEW_YORK_NY, NEW_YORK_NY), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_miles(STERLING_OH, NEW_YORK_NY);
        let ba = distance_miles(NEW_YORK_NY, STERLING_OH);
        assert!((ab - ba).abs() < 1e-9, "d(a,b)={ab} d(b,a)={ba}");
    }

    #[test]
    fn nearby_ohio_towns_are_about_nine_miles_apart() {
        let d = distance_miles(STERLING_OH, MEDINA_OH);
        assert!((5.0..15.0).contains(&d), "got {d} miles");
    }

    #[test]
    fn sterling_to_new_york_is_about_four_hundred_miles() {
        let d = distance_miles(STERLING_OH, NEW_YORK_NY);
        assert!((380.0..480.0).contains(&d), "got {d} miles");
    }

    #[test]
    fn distance_grows_with_angular_separation() {
        let near = distance_miles(STERLING_OH, MEDINA_OH);
        let far = distance_miles(STERLING_OH, NEW_YORK_NY);
        assert!(near < far);
    }

    #[test]
    fn bounding_box_contains_the_circle() {
        let bbox = bounding_box(STERLING_OH, 50.0);
        // Medina is ~10 miles out, well inside a 50-mile box.
        assert!(bbox.contains(MEDINA_OH));
        assert!(!bbox.contains(NEW_YORK_NY));
    }

    #[test]
    fn bounding_box_lng_delta_widens_with_latitude() {
        let equator = bounding_box(
            Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
            50.0,
        );
        let high = bounding_box(
            Coordinate {
                latitude: 60.0,
                longitude: 0.0,
            },
            50.0,
        );
        let eq_width = equator.max_lng - equator.min_lng;
        let high_width = high.max_lng - high.min_lng;
        assert!(high_width > eq_width);
    }

    #[test]
    fn bounding_box_near_pole_caps_longitude() {
        let bbox = bounding_box(
            Coordinate {
                latitude: 89.999_9,
                longitude: 0.0,
            },
            10.0,
        );
        assert!((bbox.min_lng - (-180.0)).abs() < f64::EPSILON);
        assert!((bbox.max_lng - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn meters_per_mile_matches_statute_mile() {
        assert!((METERS_PER_MILE - 1609.344).abs() < f64::EPSILON);
    }
}
