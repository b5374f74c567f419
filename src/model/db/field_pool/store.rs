use mongodb::{bson::doc, options::FindOptions};
use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::{
    common::FieldPoolStatus,
    db::field_pool::FieldPool,
    mongodb::{Coll, Id},
};

/// Persistent storage for field pools.
#[rocket::async_trait]
pub trait FieldPoolStore: Send + Sync {
    /// Insert a brand new pool.
    async fn insert(&self, pool: &FieldPool) -> Result<()>;

    async fn get(&self, id: Id) -> Result<Option<FieldPool>>;

    /// All pools, optionally only those with the given stored status,
    /// ordered by registration deadline.
    async fn list(&self, status: Option<FieldPoolStatus>) -> Result<Vec<FieldPool>>;

    /// Overwrite the stored pool, but only if its revision is still
    /// `expected_revision`. Returns whether the write happened.
    async fn replace(&self, pool: &FieldPool, expected_revision: i64) -> Result<bool>;

    /// Returns whether a pool was actually deleted.
    async fn delete(&self, id: Id) -> Result<bool>;
}

#[rocket::async_trait]
impl FieldPoolStore for Coll<FieldPool> {
    async fn insert(&self, pool: &FieldPool) -> Result<()> {
        self.insert_one(pool, None).await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> Result<Option<FieldPool>> {
        Ok(self.find_one(id.as_doc(), None).await?)
    }

    async fn list(&self, status: Option<FieldPoolStatus>) -> Result<Vec<FieldPool>> {
        let filter = match status {
            Some(status) => doc! { "status": status },
            None => doc! {},
        };
        let options = FindOptions::builder()
            .sort(doc! { "registration_deadline": 1 })
            .build();
        let pools: Vec<FieldPool> = self.find(filter, options).await?.try_collect().await?;
        Ok(pools)
    }

    async fn replace(&self, pool: &FieldPool, expected_revision: i64) -> Result<bool> {
        let filter = doc! {
            "_id": pool.id,
            "revision": expected_revision,
        };
        let result = self.replace_one(filter, pool, None).await?;
        Ok(result.matched_count == 1)
    }

    async fn delete(&self, id: Id) -> Result<bool> {
        let result = self.delete_one(id.as_doc(), None).await?;
        Ok(result.deleted_count == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::model::{db::field_pool::NewFieldPool, mongodb::test_db};

    #[rocket::async_test]
    #[ignore = "needs a MongoDB server"]
    async fn revision_guarded_writes() {
        let db = test_db().await;
        let pools = Coll::<FieldPool>::from_db(&db);
        let now = Utc::now();

        let mut pool = FieldPool {
            id: Id::new(),
            pool: NewFieldPool::example(now),
        };
        let hidden = FieldPool {
            id: Id::new(),
            pool: NewFieldPool::example_with(now, FieldPoolStatus::Hidden, Duration::days(1)),
        };
        pools.insert(&pool).await.unwrap();
        pools.insert(&hidden).await.unwrap();

        let stored = pools.get(pool.id).await.unwrap().unwrap();
        assert_eq!(stored.name, pool.name);
        assert_eq!(stored.revision, 0);

        let listed = pools.list(None).await.unwrap();
        assert_eq!(
            listed.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![hidden.id, pool.id]
        );
        let listed = pools.list(Some(FieldPoolStatus::Hidden)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, hidden.id);

        pool.revision = 1;
        assert!(pools.replace(&pool, 0).await.unwrap());
        // The stored revision has moved on, so this write is stale.
        assert!(!pools.replace(&pool, 0).await.unwrap());
        assert_eq!(pools.get(pool.id).await.unwrap().unwrap().revision, 1);

        assert!(pools.delete(pool.id).await.unwrap());
        assert!(!pools.delete(pool.id).await.unwrap());
        assert!(pools.get(pool.id).await.unwrap().is_none());

        db.drop(None).await.unwrap();
    }
}
