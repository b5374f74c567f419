use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    api::field_pool::{DeadlineExtension, FieldPoolPatch, FieldPoolSpec},
    common::FieldPoolStatus,
    db::{
        field_pool::{FieldPool, FieldPoolStore, NewFieldPool},
        stored_instant, Written,
    },
    mongodb::Id,
};

/// The status a pool must move to when its deadline is rewritten to
/// `deadline`, or `None` if it should keep `current`.
///
/// Closed pools given a future deadline reopen; open pools given a deadline
/// that is not in the future close. Hidden pools are never touched.
pub fn status_for_new_deadline(
    current: FieldPoolStatus,
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<FieldPoolStatus> {
    match current {
        FieldPoolStatus::Closed if deadline > now => Some(FieldPoolStatus::Open),
        FieldPoolStatus::Open if deadline <= now => Some(FieldPoolStatus::Closed),
        _ => None,
    }
}

/// Like [`status_for_new_deadline`], but for an extension: it can only ever
/// reopen a closed pool, never close one.
pub fn status_for_extension(
    current: FieldPoolStatus,
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<FieldPoolStatus> {
    (current == FieldPoolStatus::Closed && deadline > now).then_some(FieldPoolStatus::Open)
}

/// Keeps each field pool's status in step with its registration deadline at
/// the moments the deadline is written.
///
/// Every operation takes the current instant explicitly.
pub struct FieldPoolLifecycle<'s> {
    pools: &'s dyn FieldPoolStore,
    derive_status_on_read: bool,
}

impl<'s> FieldPoolLifecycle<'s> {
    pub fn new(pools: &'s dyn FieldPoolStore) -> Self {
        Self {
            pools,
            derive_status_on_read: false,
        }
    }

    /// Report lapsed open pools as closed on reads. Nothing is written.
    pub fn derive_status_on_read(mut self, enabled: bool) -> Self {
        self.derive_status_on_read = enabled;
        self
    }

    /// Create a new pool. An open pool whose deadline has already passed is
    /// stored as closed.
    pub async fn create(
        &self,
        spec: FieldPoolSpec,
        now: DateTime<Utc>,
    ) -> Result<Written<FieldPool>> {
        let now = stored_instant(now);
        let registration_deadline = stored_instant(spec.registration_deadline);
        let name = validated_name(spec.name)?;
        let mut status = spec.status.unwrap_or(FieldPoolStatus::Open);
        if status == FieldPoolStatus::Open && registration_deadline <= now {
            status = FieldPoolStatus::Closed;
        }
        let pool = FieldPool {
            id: Id::new(),
            pool: NewFieldPool {
                name,
                description: spec.description,
                status,
                registration_deadline,
                created_at: now,
                updated_at: now,
                revision: 0,
            },
        };
        self.pools.insert(&pool).await?;
        info!("Created field pool {} ({status})", pool.id);
        Ok(Written {
            message: "Field pool created successfully".to_string(),
            record: pool,
        })
    }

    /// Get a single pool.
    pub async fn get(&self, id: Id, now: DateTime<Utc>) -> Result<FieldPool> {
        let pool = self.load(id).await?;
        Ok(self.as_read(pool, now))
    }

    /// List pools, optionally filtered by status.
    ///
    /// The filter matches the status as read, so with read-time derivation
    /// enabled a lapsed open pool is listed under CLOSED, not OPEN.
    pub async fn list(
        &self,
        status: Option<FieldPoolStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<FieldPool>> {
        // Derivation can move a pool into the filtered status, so fetch
        // everything and filter afterwards.
        let fetch = if self.derive_status_on_read { None } else { status };
        let pools = self.pools.list(fetch).await?;
        Ok(pools
            .into_iter()
            .map(|pool| self.as_read(pool, now))
            .filter(|pool| status.map_or(true, |status| pool.status == status))
            .collect())
    }

    /// Apply a partial edit.
    ///
    /// If the patch carries a deadline, the status is re-derived from the
    /// *stored* status and the new deadline, and the derived status takes
    /// precedence over any explicit status in the same patch.
    pub async fn update(
        &self,
        id: Id,
        patch: FieldPoolPatch,
        now: DateTime<Utc>,
    ) -> Result<Written<FieldPool>> {
        let mut pool = self.load(id).await?;
        let stored_status = pool.status;

        if let Some(name) = patch.name {
            pool.name = validated_name(name)?;
        }
        if let Some(description) = patch.description {
            pool.description = description;
        }
        if let Some(status) = patch.status {
            pool.status = status;
        }
        let mut auto_status = None;
        if let Some(deadline) = patch.registration_deadline.map(stored_instant) {
            pool.registration_deadline = deadline;
            auto_status = status_for_new_deadline(stored_status, deadline, now);
            if let Some(status) = auto_status {
                pool.status = status;
            }
        }

        let pool = self.save(pool, now).await?;
        let message = match auto_status {
            Some(status) => {
                info!("Field pool {id} automatically moved from {stored_status} to {status}");
                format!("Field pool updated successfully. Status automatically changed to {status}")
            }
            None => "Field pool updated successfully".to_string(),
        };
        Ok(Written {
            message,
            record: pool,
        })
    }

    /// Push the registration deadline into the future, reopening the pool if
    /// it had closed.
    pub async fn extend_deadline(
        &self,
        id: Id,
        extension: DeadlineExtension,
        now: DateTime<Utc>,
    ) -> Result<Written<FieldPool>> {
        let new_deadline = stored_instant(extension.new_deadline);
        if new_deadline <= now {
            return Err(Error::invalid(format!(
                "New registration deadline {new_deadline} is not in the future"
            )));
        }

        let mut pool = self.load(id).await?;
        let previous_deadline = pool.registration_deadline;
        pool.registration_deadline = new_deadline;
        let reopened = status_for_extension(pool.status, new_deadline, now);
        if let Some(status) = reopened {
            pool.status = status;
        }

        let pool = self.save(pool, now).await?;
        let reason = extension.reason.as_deref().unwrap_or("none given");
        info!(
            "Extended deadline of field pool {id} from {previous_deadline} to {}, reason: {reason}",
            pool.registration_deadline
        );
        let message = if reopened.is_some() {
            "Registration deadline extended successfully. Field pool automatically reopened"
        } else {
            "Registration deadline extended successfully"
        };
        Ok(Written {
            message: message.to_string(),
            record: pool,
        })
    }

    /// Hard-delete a pool.
    pub async fn delete(&self, id: Id) -> Result<()> {
        if !self.pools.delete(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted field pool {id}");
        Ok(())
    }

    async fn load(&self, id: Id) -> Result<FieldPool> {
        self.pools.get(id).await?.ok_or_else(|| not_found(id))
    }

    /// Bump the revision and write back, failing if someone else got there
    /// first.
    async fn save(&self, mut pool: FieldPool, now: DateTime<Utc>) -> Result<FieldPool> {
        let expected_revision = pool.revision;
        pool.revision += 1;
        pool.updated_at = stored_instant(now);
        if !self.pools.replace(&pool, expected_revision).await? {
            warn!("Concurrent modification of field pool {}", pool.id);
            return Err(Error::conflict(format!(
                "Field pool with ID '{}' was modified concurrently",
                pool.id
            )));
        }
        Ok(pool)
    }

    fn as_read(&self, mut pool: FieldPool, now: DateTime<Utc>) -> FieldPool {
        if self.derive_status_on_read {
            pool.status = pool.status_at(now);
        }
        pool
    }
}

fn not_found(id: Id) -> Error {
    Error::not_found(format!("Field pool with ID '{id}'"))
}

fn validated_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("Field pool name must not be empty"));
    }
    Ok(trimmed.to_string())
}
