//! Bounding-box pre-filter strategy.
//!
//! Coarse/fine two-phase filter for stores without a spatial index: a SQL
//! rectangle intersect cheaply discards the bulk of the table, then the
//! exact Haversine predicate corrects the box-corner over-inclusion and
//! ranks the survivors in-process.

use sqlx::PgPool;

use talentgeo_core::{bounding_box, distance_miles, Coordinate};

use crate::candidates::CandidatePointRow;

use super::{sort_by_distance, SearchMatch};

pub(super) async fn search(
    pool: &PgPool,
    center: Coordinate,
    radius_miles: f64,
) -> Result<Vec<SearchMatch>, sqlx::Error> {
    let bbox = bounding_box(center, radius_miles);

    let rows = sqlx::query_as::<_, CandidatePointRow>(
        "SELECT id, public_id, full_name, title, city, state, zip, \
                latitude::float8 AS latitude, longitude::float8 AS longitude \
         FROM candidates \
         WHERE is_active = TRUE \
           AND latitude IS NOT NULL \
           AND longitude IS NOT NULL \
           AND latitude::float8 BETWEEN $1 AND $2 \
           AND longitude::float8 BETWEEN $3 AND $4 \
         ORDER BY id ASC",
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lng)
    .bind(bbox.max_lng)
    .fetch_all(pool)
    .await?;

    let prefiltered = rows.len();

    let mut matches: Vec<SearchMatch> = rows
        .into_iter()
        .filter_map(|row| {
            let point = Coordinate {
                latitude: row.latitude,
                longitude: row.longitude,
            };
            let distance = distance_miles(center, point);
            (distance <= radius_miles).then(|| SearchMatch {
                id: row.id,
                public_id: row.public_id,
                full_name: row.full_name,
                title: row.title,
                city: row.city,
                state: row.state,
                zip: row.zip,
                distance_miles: distance,
            })
        })
        .collect();

    sort_by_distance(&mut matches);

    tracing::debug!(
        prefiltered,
        refined = matches.len(),
        "bounding-box pre-filter refined by exact distance"
    );

    Ok(matches)
}
