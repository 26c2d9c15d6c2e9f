//! Read operations for the `candidates` table.

use sqlx::PgPool;

use super::types::CandidateRow;

/// List all active candidate rows, ordered by `id ASC`.
///
/// The stable id ordering matters downstream: the in-process radius
/// strategies rank by distance with a stable sort, so equal distances keep
/// this fetch order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_active_candidates(pool: &PgPool) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT id, public_id, full_name, title, city, state, zip, \
                latitude, longitude, is_active, created_at, updated_at \
         FROM candidates \
         WHERE is_active = TRUE \
         ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

/// Count of active candidate rows.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_active_candidates(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates WHERE is_active = TRUE")
        .fetch_one(pool)
        .await
}

/// Count of active candidates carrying a stored coordinate pair.
///
/// Drives the capability probe: zero spatial rows means the index and
/// bounding-box strategies have nothing to scan.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_candidates_with_coordinates(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM candidates \
         WHERE is_active = TRUE \
           AND latitude IS NOT NULL \
           AND longitude IS NOT NULL",
    )
    .fetch_one(pool)
    .await
}
