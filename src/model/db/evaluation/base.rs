use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{EvaluationStatus, ScoreRole},
    mongodb::Id,
};

/// A single evaluator's score for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScore {
    pub evaluator_id: String,
    pub role: ScoreRole,
    /// On a 0-10 scale.
    pub score: f64,
    pub comment: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
}

/// Core project evaluation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvaluationCore {
    pub project_id: String,
    pub status: EvaluationStatus,
    pub advisor_weight: Option<f64>,
    pub committee_weight: Option<f64>,
    /// Full precision; only rounded for display.
    pub final_score: Option<f64>,
    pub scores: Vec<EvaluationScore>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    /// Bumped on every write; guards read-modify-write cycles.
    pub revision: i64,
}

impl ProjectEvaluationCore {
    /// A fresh, unscored evaluation for the given project.
    pub fn new(project_id: String, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            status: EvaluationStatus::Pending,
            advisor_weight: None,
            committee_weight: None,
            final_score: None,
            scores: Vec::new(),
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Scores awarded in the given role.
    pub fn scores_for(&self, role: ScoreRole) -> impl Iterator<Item = f64> + '_ {
        self.scores
            .iter()
            .filter(move |score| score.role == role)
            .map(|score| score.score)
    }

    /// Record a score, replacing any earlier one by the same evaluator in the
    /// same role.
    pub fn record_score(&mut self, score: EvaluationScore) {
        match self
            .scores
            .iter_mut()
            .find(|s| s.evaluator_id == score.evaluator_id && s.role == score.role)
        {
            Some(existing) => *existing = score,
            None => self.scores.push(score),
        }
    }
}

/// A project evaluation without an ID.
pub type NewProjectEvaluation = ProjectEvaluationCore;

/// A project evaluation from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvaluation {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub evaluation: ProjectEvaluationCore,
}

impl Deref for ProjectEvaluation {
    type Target = ProjectEvaluationCore;

    fn deref(&self) -> &Self::Target {
        &self.evaluation
    }
}

impl DerefMut for ProjectEvaluation {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.evaluation
    }
}
