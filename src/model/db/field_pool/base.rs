use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::FieldPoolStatus, mongodb::Id};

/// Core field pool data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPoolCore {
    pub name: String,
    pub description: String,
    pub status: FieldPoolStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub registration_deadline: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    /// Bumped on every write; guards read-modify-write cycles.
    pub revision: i64,
}

impl FieldPoolCore {
    /// The status as it would be derived at `now`, without touching storage.
    ///
    /// An open pool whose deadline has passed reads as closed. Nothing else
    /// is affected.
    pub fn status_at(&self, now: DateTime<Utc>) -> FieldPoolStatus {
        match self.status {
            FieldPoolStatus::Open if self.registration_deadline <= now => FieldPoolStatus::Closed,
            status => status,
        }
    }
}

/// A field pool without an ID.
pub type NewFieldPool = FieldPoolCore;

/// A field pool from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPool {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub pool: FieldPoolCore,
}

impl Deref for FieldPool {
    type Target = FieldPoolCore;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

impl DerefMut for FieldPool {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pool
    }
}
