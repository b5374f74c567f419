//! In-memory stores, so lifecycle logic and routes can be tested without a
//! running MongoDB.
//!
//! Records are kept as BSON documents, so everything read back has been
//! through the same serialisation as a real database round trip.

use std::{collections::HashMap, marker::PhantomData};

use mongodb::bson::{from_document, to_document, Document};
use rocket::tokio::sync::Mutex;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::FieldPoolStatus,
    db::{
        evaluation::{EvaluationStore, ProjectEvaluation},
        field_pool::{FieldPool, FieldPoolStore},
    },
    mongodb::Id,
};

/// Records keyed by ID behind an async lock.
pub struct MemoryStore<T> {
    records: Mutex<HashMap<Id, Document>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            _record: PhantomData,
        }
    }
}

impl<T> MemoryStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(record: &T) -> Document {
        to_document(record).expect("Test records always serialise")
    }

    fn decode(doc: &Document) -> T {
        from_document(doc.clone()).expect("Stored documents always deserialise")
    }

    async fn put(&self, id: Id, record: &T) {
        self.records.lock().await.insert(id, Self::encode(record));
    }

    async fn fetch(&self, id: Id) -> Option<T> {
        self.records.lock().await.get(&id).map(Self::decode)
    }

    async fn all(&self) -> Vec<T> {
        self.records.lock().await.values().map(Self::decode).collect()
    }

    /// Overwrite `id` only if its stored revision is still `expected_revision`.
    async fn swap(&self, id: Id, record: &T, expected_revision: i64) -> bool {
        let mut records = self.records.lock().await;
        match records.get_mut(&id) {
            Some(stored) if matches!(stored.get_i64("revision"), Ok(r) if r == expected_revision) => {
                *stored = Self::encode(record);
                true
            }
            _ => false,
        }
    }
}

#[rocket::async_trait]
impl FieldPoolStore for MemoryStore<FieldPool> {
    async fn insert(&self, pool: &FieldPool) -> Result<()> {
        self.put(pool.id, pool).await;
        Ok(())
    }

    async fn get(&self, id: Id) -> Result<Option<FieldPool>> {
        Ok(self.fetch(id).await)
    }

    async fn list(&self, status: Option<FieldPoolStatus>) -> Result<Vec<FieldPool>> {
        let mut pools: Vec<_> = self
            .all()
            .await
            .into_iter()
            .filter(|pool| status.map_or(true, |status| pool.status == status))
            .collect();
        pools.sort_by_key(|pool| pool.registration_deadline);
        Ok(pools)
    }

    async fn replace(&self, pool: &FieldPool, expected_revision: i64) -> Result<bool> {
        Ok(self.swap(pool.id, pool, expected_revision).await)
    }

    async fn delete(&self, id: Id) -> Result<bool> {
        Ok(self.records.lock().await.remove(&id).is_some())
    }
}

#[rocket::async_trait]
impl EvaluationStore for MemoryStore<ProjectEvaluation> {
    async fn insert(&self, evaluation: &ProjectEvaluation) -> Result<()> {
        // Mirror the unique index on `project_id`.
        if self.find_by_project(&evaluation.project_id).await?.is_some() {
            return Err(Error::conflict(format!(
                "Duplicate project_id {}",
                evaluation.project_id
            )));
        }
        self.put(evaluation.id, evaluation).await;
        Ok(())
    }

    async fn get(&self, id: Id) -> Result<Option<ProjectEvaluation>> {
        Ok(self.fetch(id).await)
    }

    async fn find_by_project(&self, project_id: &str) -> Result<Option<ProjectEvaluation>> {
        Ok(self
            .all()
            .await
            .into_iter()
            .find(|evaluation| evaluation.project_id == project_id))
    }

    async fn replace(&self, evaluation: &ProjectEvaluation, expected_revision: i64) -> Result<bool> {
        Ok(self.swap(evaluation.id, evaluation, expected_revision).await)
    }
}
