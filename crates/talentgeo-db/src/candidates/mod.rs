//! Queries over the `candidates` table (the talent records store).
//!
//! The radius planner only reads this table; writes exist for seeding and
//! tests. Stored coordinates are optional — profiles imported without a
//! geocoding pass carry only a zip.

mod read;
mod types;
mod write;

pub use read::{count_active_candidates, count_candidates_with_coordinates, list_active_candidates};
pub use types::{CandidatePointRow, CandidateRow, NewCandidate};
pub use write::insert_candidates;
