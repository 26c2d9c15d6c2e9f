//! Row types for the `candidates` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Input record for inserting a candidate profile.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub full_name: String,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A row from the `candidates` table.
///
/// Coordinates come back as `NUMERIC` (`Decimal`); distance work casts to
/// `float8` in SQL instead of converting here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub public_id: Uuid,
    pub full_name: String,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate with guaranteed coordinates, `float8`-cast for distance math.
///
/// Only rows where both `latitude` and `longitude` are non-null qualify.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidatePointRow {
    pub id: i64,
    pub public_id: Uuid,
    pub full_name: String,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}
