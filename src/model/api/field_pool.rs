use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{common::FieldPoolStatus, db::field_pool::FieldPool};

/// A request to create a field pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPoolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub registration_deadline: DateTime<Utc>,
    /// Defaults to open.
    #[serde(default)]
    pub status: Option<FieldPoolStatus>,
}

/// A partial edit of a field pool. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPoolPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub status: Option<FieldPoolStatus>,
}

/// A request to push a field pool's registration deadline back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineExtension {
    pub new_deadline: DateTime<Utc>,
    /// Only logged, never stored.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A field pool as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPoolDescription {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: FieldPoolStatus,
    pub registration_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FieldPool> for FieldPoolDescription {
    fn from(pool: FieldPool) -> Self {
        Self {
            id: pool.id.to_string(),
            name: pool.pool.name,
            description: pool.pool.description,
            status: pool.pool.status,
            registration_deadline: pool.pool.registration_deadline,
            created_at: pool.pool.created_at,
            updated_at: pool.pool.updated_at,
        }
    }
}
