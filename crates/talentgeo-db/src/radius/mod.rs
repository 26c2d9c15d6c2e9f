//! Radius query planner.
//!
//! Three strategies answer the same question — "which active candidates sit
//! within N miles of this zip" — at different price points:
//!
//! - **Native**: `earthdistance` index-accelerated distance predicate,
//!   filtered and ordered in Postgres. Sub-linear; preferred whenever the
//!   extension is installed and spatial rows exist.
//! - **Bounding box**: SQL rectangle pre-filter, exact Haversine refine and
//!   rank in-process. Linear over the box, not the table.
//! - **Exhaustive**: every active row, coordinates recovered offline from
//!   the geocode cache or the approximate region table. Last resort for
//!   stores with no spatial column populated.
//!
//! The planner probes the store's capabilities and picks the best available
//! strategy unless the caller pins one. A pinned strategy that fails
//! surfaces its error — falling back silently would change result fidelity
//! behind the caller's back.

mod bbox;
mod exhaustive;
mod native;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use talentgeo_core::Coordinate;
use talentgeo_geocode::ZipResolver;

/// One ranked hit: candidate identity plus its distance from the center.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub id: i64,
    pub public_id: Uuid,
    pub full_name: String,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub distance_miles: f64,
}

/// How the center coordinate was obtained.
///
/// Callers ranking against an `Approximate` center are working with a
/// regional centroid that may be tens of miles off the true zip location;
/// the planner reports this rather than hiding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterSource {
    Exact,
    Approximate,
}

impl std::fmt::Display for CenterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CenterSource::Exact => write!(f, "exact"),
            CenterSource::Approximate => write!(f, "approximate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    Native,
    BoundingBox,
    Exhaustive,
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Native => write!(f, "native"),
            SearchStrategy::BoundingBox => write!(f, "bounding-box"),
            SearchStrategy::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown search strategy \"{0}\"; expected native, bounding-box, or exhaustive")]
pub struct UnknownStrategy(String);

impl std::str::FromStr for SearchStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(SearchStrategy::Native),
            "bounding-box" | "bbox" => Ok(SearchStrategy::BoundingBox),
            "exhaustive" => Ok(SearchStrategy::Exhaustive),
            other => Err(UnknownStrategy(other.to_owned())),
        }
    }
}

/// A completed radius search with the provenance callers need to judge
/// result fidelity.
#[derive(Debug)]
pub struct RadiusSearch {
    pub center_zip: String,
    pub center: Coordinate,
    pub center_source: CenterSource,
    pub strategy: SearchStrategy,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// The center zip failed every resolution stage. Distinct from an
    /// empty result set: "could not search" is not "no matches".
    #[error("center zip {zip} could not be resolved by any strategy")]
    UnresolvableCenter { zip: String },

    #[error("radius must be a positive number of miles, got {0}")]
    InvalidRadius(f64),

    /// The records store rejected or errored on the spatial query.
    /// Propagated as-is; the planner never silently retries with a
    /// different strategy.
    #[error("spatial query failed: {0}")]
    Spatial(#[from] sqlx::Error),
}

/// Pick the best strategy the records store can support right now.
///
/// Native needs the `earthdistance` extension and at least one active row
/// with coordinates; bounding-box needs only the coordinates; a store with
/// no spatial rows at all gets the exhaustive scan.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the probe queries fail.
pub async fn probe_strategy(pool: &PgPool) -> Result<SearchStrategy, sqlx::Error> {
    let spatial_rows = crate::candidates::count_candidates_with_coordinates(pool).await?;
    if spatial_rows == 0 {
        return Ok(SearchStrategy::Exhaustive);
    }

    let has_earthdistance: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'earthdistance')",
    )
    .fetch_one(pool)
    .await?;

    Ok(if has_earthdistance {
        SearchStrategy::Native
    } else {
        SearchStrategy::BoundingBox
    })
}

/// Find active candidates within `radius_miles` of `center_zip`, ascending
/// by distance (ties keep row order).
///
/// Center resolution follows the full cascade: cache, remote, then — only
/// when both yield nothing — the approximate region centroid, reported via
/// [`CenterSource::Approximate`].
///
/// # Errors
///
/// - [`SearchError::InvalidRadius`] for a non-positive or non-finite radius.
/// - [`SearchError::UnresolvableCenter`] when every resolution stage fails.
/// - [`SearchError::Spatial`] when the store rejects the query; a pinned
///   strategy is never swapped out on failure.
pub async fn find_within_radius(
    pool: &PgPool,
    resolver: &mut ZipResolver,
    center_zip: &str,
    radius_miles: f64,
    strategy: Option<SearchStrategy>,
) -> Result<RadiusSearch, SearchError> {
    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        return Err(SearchError::InvalidRadius(radius_miles));
    }

    let (center, center_source) = resolve_center(resolver, center_zip).await?;

    let strategy = match strategy {
        Some(pinned) => pinned,
        None => probe_strategy(pool).await?,
    };
    tracing::debug!(
        zip = center_zip,
        radius_miles,
        %strategy,
        %center_source,
        "running radius search"
    );

    let matches = match strategy {
        SearchStrategy::Native => native::search(pool, center, radius_miles).await?,
        SearchStrategy::BoundingBox => bbox::search(pool, center, radius_miles).await?,
        SearchStrategy::Exhaustive => exhaustive::search(pool, resolver, center, radius_miles).await?,
    };

    tracing::info!(
        zip = center_zip,
        radius_miles,
        %strategy,
        matches = matches.len(),
        "radius search complete"
    );

    Ok(RadiusSearch {
        center_zip: center_zip.to_owned(),
        center,
        center_source,
        strategy,
        matches,
    })
}

async fn resolve_center(
    resolver: &mut ZipResolver,
    zip: &str,
) -> Result<(Coordinate, CenterSource), SearchError> {
    match resolver.resolve(zip).await {
        Ok(Some(resolved)) => return Ok((resolved.coordinate, CenterSource::Exact)),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(zip, error = %e, "transient center geocode failure; trying approximate fallback");
        }
    }

    match resolver.resolve_approximate(zip) {
        Some(center) => {
            tracing::warn!(zip, "center resolved from approximate region centroid");
            Ok((center, CenterSource::Approximate))
        }
        None => Err(SearchError::UnresolvableCenter {
            zip: zip.to_owned(),
        }),
    }
}

/// Stable ascending sort by distance. Stability is the tie-break: equal
/// distances keep the caller's row order.
pub(crate) fn sort_by_distance(matches: &mut [SearchMatch]) {
    matches.sort_by(|a, b| {
        a.distance_miles
            .partial_cmp(&b.distance_miles)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
