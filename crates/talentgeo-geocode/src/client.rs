//! HTTP client for the zip geocoding source.
//!
//! Speaks the zippopotam-style contract: `GET {base}/us/{zip}` returns the
//! place name, state abbreviation, and latitude/longitude as decimal
//! strings; a 404 means the zip is confirmed unassigned. Everything other
//! than a clean 2xx or a 404 is treated as transient by callers.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use talentgeo_core::Coordinate;

use crate::error::GeocodeError;

const DEFAULT_BASE_URL: &str = "https://api.zippopotam.us";

/// A successfully geocoded zip: centroid plus the place metadata the
/// cache persists alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub place: String,
    pub region: String,
}

#[derive(Debug, Deserialize)]
struct ZipLookupResponse {
    places: Vec<ZipLookupPlace>,
}

#[derive(Debug, Deserialize)]
struct ZipLookupPlace {
    #[serde(rename = "place name")]
    place_name: String,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: String,
    latitude: String,
    longitude: String,
}

/// Client for the remote geocoding source.
///
/// Every request carries the configured timeout so a stalled upstream can
/// never block a search indefinitely. Use [`GeocodeClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl GeocodeClient {
    /// Creates a client pointed at the production geocoding source.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("talentgeo/0.1 (talent-search)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Geocode a normalized 5-digit zip.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] — the source confirmed the zip is
    ///   unassigned (HTTP 404). Definitive; cacheable as a negative.
    /// - [`GeocodeError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`GeocodeError::Http`] — network failure or timeout.
    /// - [`GeocodeError::Deserialize`] — body is not valid JSON.
    /// - [`GeocodeError::MalformedPayload`] — JSON parsed but the
    ///   coordinate fields are unusable.
    ///
    /// All variants except `NotFound` are transient from the resolver's
    /// point of view.
    pub async fn lookup(&self, zip: &str) -> Result<GeocodedPlace, GeocodeError> {
        let url = format!("{}/us/{}", self.base_url, zip);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GeocodeError::NotFound {
                zip: zip.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                zip: zip.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed: ZipLookupResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                zip: zip.to_owned(),
                source: e,
            })?;

        let place = parsed
            .places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::MalformedPayload {
                zip: zip.to_owned(),
                reason: "response contained no places".to_owned(),
            })?;

        let latitude = parse_decimal_field(zip, "latitude", &place.latitude)?;
        let longitude = parse_decimal_field(zip, "longitude", &place.longitude)?;
        let coordinate =
            Coordinate::new(latitude, longitude).ok_or_else(|| GeocodeError::MalformedPayload {
                zip: zip.to_owned(),
                reason: format!("coordinate ({latitude}, {longitude}) out of range"),
            })?;

        Ok(GeocodedPlace {
            coordinate,
            place: place.place_name,
            region: place.state_abbreviation,
        })
    }
}

fn parse_decimal_field(zip: &str, field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::MalformedPayload {
            zip: zip.to_owned(),
            reason: format!("{field} \"{raw}\" is not a decimal number: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client =
            GeocodeClient::with_base_url(5, "http://localhost:9/").expect("client builds");
        assert_eq!(client.base_url, "http://localhost:9");
    }

    #[test]
    fn parse_decimal_field_accepts_signed_decimals() {
        assert!((parse_decimal_field("44256", "latitude", "41.1434").unwrap() - 41.1434).abs()
            < f64::EPSILON);
        assert!(
            (parse_decimal_field("44256", "longitude", " -81.8632 ").unwrap() - (-81.8632)).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn parse_decimal_field_rejects_garbage() {
        let err = parse_decimal_field("44256", "latitude", "north-ish").unwrap_err();
        assert!(matches!(err, GeocodeError::MalformedPayload { .. }));
        assert!(err.to_string().contains("latitude"));
    }
}
