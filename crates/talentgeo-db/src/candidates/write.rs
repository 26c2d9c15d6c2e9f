//! Write operations for the `candidates` table.
//!
//! Kept minimal: the search core only reads this table. Inserts exist for
//! the seed command and tests; bulk-import mechanics live outside this
//! repository.

use sqlx::PgPool;

use super::types::NewCandidate;

/// Insert candidate rows one-by-one inside a single transaction.
///
/// Returns the number of rows inserted. Zips are stored as given — callers
/// normalize before insert if they want canonical 5-digit keys.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if any insert fails; the transaction rolls back
/// and no rows land.
pub async fn insert_candidates(
    pool: &PgPool,
    candidates: &[NewCandidate],
) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;

    for candidate in candidates {
        sqlx::query(
            "INSERT INTO candidates \
             (full_name, title, city, state, zip, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&candidate.full_name)
        .bind(&candidate.title)
        .bind(&candidate.city)
        .bind(&candidate.state)
        .bind(&candidate.zip)
        .bind(candidate.latitude)
        .bind(candidate.longitude)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(candidates.len())
}
