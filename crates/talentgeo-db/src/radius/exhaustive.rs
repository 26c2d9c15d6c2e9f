//! Exhaustive fallback strategy.
//!
//! O(n) over every active row. Coordinates are recovered without touching
//! the network: a stored point wins, otherwise the row's zip goes through
//! the offline cache/region lookup. Rows with neither a stored point nor a
//! resolvable zip cannot be placed and are skipped.

use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;

use talentgeo_core::{distance_miles, Coordinate};
use talentgeo_geocode::ZipResolver;

use crate::candidates::{list_active_candidates, CandidateRow};

use super::{sort_by_distance, SearchMatch};

pub(super) async fn search(
    pool: &PgPool,
    resolver: &ZipResolver,
    center: Coordinate,
    radius_miles: f64,
) -> Result<Vec<SearchMatch>, sqlx::Error> {
    let rows = list_active_candidates(pool).await?;
    let scanned = rows.len();
    let mut skipped = 0usize;

    let mut matches: Vec<SearchMatch> = Vec::new();
    for row in rows {
        let Some(point) = locate(resolver, &row) else {
            skipped += 1;
            continue;
        };
        let distance = distance_miles(center, point);
        if distance <= radius_miles {
            matches.push(SearchMatch {
                id: row.id,
                public_id: row.public_id,
                full_name: row.full_name,
                title: row.title,
                city: row.city,
                state: row.state,
                zip: row.zip,
                distance_miles: distance,
            });
        }
    }

    sort_by_distance(&mut matches);

    tracing::debug!(
        scanned,
        skipped,
        matched = matches.len(),
        "exhaustive scan ranked offline coordinates"
    );

    Ok(matches)
}

/// Best offline coordinate for a row: stored point, else cache/region by zip.
fn locate(resolver: &ZipResolver, row: &CandidateRow) -> Option<Coordinate> {
    if let (Some(lat), Some(lng)) = (&row.latitude, &row.longitude) {
        if let Some(point) = Coordinate::new(lat.to_f64()?, lng.to_f64()?) {
            return Some(point);
        }
    }
    resolver.resolve_offline(row.zip.as_deref()?)
}
