//! Native spatial-index strategy.
//!
//! Pushes the whole filter-and-rank into Postgres: an `earth_box`
//! containment check rides the GiST `ll_to_earth` index to cut the
//! candidate set, and `earth_distance` applies the exact circular predicate
//! and the ordering. The box alone over-includes at the corners, so both
//! predicates are required.

use sqlx::PgPool;

use talentgeo_core::{Coordinate, METERS_PER_MILE};

use super::SearchMatch;

#[derive(Debug, sqlx::FromRow)]
struct CandidateDistanceRow {
    id: i64,
    public_id: uuid::Uuid,
    full_name: String,
    title: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    distance_miles: f64,
}

pub(super) async fn search(
    pool: &PgPool,
    center: Coordinate,
    radius_miles: f64,
) -> Result<Vec<SearchMatch>, sqlx::Error> {
    let radius_meters = radius_miles * METERS_PER_MILE;

    let rows = sqlx::query_as::<_, CandidateDistanceRow>(
        "SELECT c.id, c.public_id, c.full_name, c.title, c.city, c.state, c.zip, \
                earth_distance(ll_to_earth($1, $2), \
                               ll_to_earth(c.latitude::float8, c.longitude::float8)) \
                    / 1609.344 AS distance_miles \
         FROM candidates c \
         WHERE c.is_active = TRUE \
           AND c.latitude IS NOT NULL \
           AND c.longitude IS NOT NULL \
           AND earth_box(ll_to_earth($1, $2), $3) @> \
               ll_to_earth(c.latitude::float8, c.longitude::float8) \
           AND earth_distance(ll_to_earth($1, $2), \
                              ll_to_earth(c.latitude::float8, c.longitude::float8)) <= $3 \
         ORDER BY distance_miles ASC, c.id ASC",
    )
    .bind(center.latitude)
    .bind(center.longitude)
    .bind(radius_meters)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SearchMatch {
            id: row.id,
            public_id: row.public_id,
            full_name: row.full_name,
            title: row.title,
            city: row.city,
            state: row.state,
            zip: row.zip,
            distance_miles: row.distance_miles,
        })
        .collect())
}
