use mongodb::bson::doc;

use crate::error::Result;
use crate::model::{
    db::evaluation::ProjectEvaluation,
    mongodb::{Coll, Id},
};

/// Persistent storage for project evaluations.
#[rocket::async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Insert a brand new evaluation. Fails with a conflict if the project
    /// already has one.
    async fn insert(&self, evaluation: &ProjectEvaluation) -> Result<()>;

    async fn get(&self, id: Id) -> Result<Option<ProjectEvaluation>>;

    async fn find_by_project(&self, project_id: &str) -> Result<Option<ProjectEvaluation>>;

    /// Overwrite the stored evaluation, but only if its revision is still
    /// `expected_revision`. Returns whether the write happened.
    async fn replace(&self, evaluation: &ProjectEvaluation, expected_revision: i64) -> Result<bool>;
}

#[rocket::async_trait]
impl EvaluationStore for Coll<ProjectEvaluation> {
    async fn insert(&self, evaluation: &ProjectEvaluation) -> Result<()> {
        // Duplicate projects trip the unique index and surface as a conflict.
        self.insert_one(evaluation, None).await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> Result<Option<ProjectEvaluation>> {
        Ok(self.find_one(id.as_doc(), None).await?)
    }

    async fn find_by_project(&self, project_id: &str) -> Result<Option<ProjectEvaluation>> {
        let filter = doc! { "project_id": project_id };
        Ok(self.find_one(filter, None).await?)
    }

    async fn replace(&self, evaluation: &ProjectEvaluation, expected_revision: i64) -> Result<bool> {
        let filter = doc! {
            "_id": evaluation.id,
            "revision": expected_revision,
        };
        let result = self.replace_one(filter, evaluation, None).await?;
        Ok(result.matched_count == 1)
    }
}
