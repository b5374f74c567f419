//! DB-compatible (e.g. de/serialisable) types, and the logic that moves them
//! through their lifecycles.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - IDs and datetimes are serialised in MongoDB's own format.

use chrono::{DateTime, SubsecRound, Utc};

pub mod evaluation;
pub mod field_pool;

/// Truncate an instant to the millisecond precision of a BSON datetime, so a
/// record handed back after a write matches what a later read returns.
pub fn stored_instant(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// The result of a successful write: the record as stored, plus a
/// human-readable summary of what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Written<T> {
    pub message: String,
    pub record: T,
}
