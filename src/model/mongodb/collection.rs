use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use crate::model::db::{evaluation::ProjectEvaluation, field_pool::FieldPool};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for FieldPool {
    const NAME: &'static str = "field_pools";
}

impl MongoCollection for ProjectEvaluation {
    const NAME: &'static str = "project_evaluations";
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // At most one evaluation per project.
    let unique = IndexOptions::builder().unique(true).build();
    let evaluation_index = IndexModel::builder()
        .keys(doc! {"project_id": 1})
        .options(unique)
        .build();
    Coll::<ProjectEvaluation>::from_db(db)
        .create_index(evaluation_index, None)
        .await?;

    // Pools are listed by status, soonest deadline first.
    let pool_index = IndexModel::builder()
        .keys(doc! {"status": 1, "registration_deadline": 1})
        .build();
    Coll::<FieldPool>::from_db(db)
        .create_index(pool_index, None)
        .await?;

    Ok(())
}

/// A fresh, indexed database on the server at `MONGO_TEST_URI` (default
/// `mongodb://localhost:27017`). Tests using it are ignored unless run with
/// `--ignored` against a live server; drop the database when done.
#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let uri = std::env::var("MONGO_TEST_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = mongodb::Client::with_uri_str(uri).await.unwrap();
    let db = client.database(&format!("research_portal_test_{}", super::Id::new()));
    ensure_indexes_exist(&db).await.unwrap();
    db
}
