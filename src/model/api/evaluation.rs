use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{EvaluationStatus, ScoreRole},
    db::evaluation::{EvaluationScore, ProjectEvaluation},
};

/// A request to start evaluating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSpec {
    pub project_id: String,
}

/// One evaluator's score for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub evaluator_id: String,
    pub role: ScoreRole,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// The weights a division head finalizes an evaluation with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub advisor_weight: f64,
    pub committee_weight: f64,
}

/// A score as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDescription {
    pub evaluator_id: String,
    pub role: ScoreRole,
    pub score: f64,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<EvaluationScore> for ScoreDescription {
    fn from(score: EvaluationScore) -> Self {
        Self {
            evaluator_id: score.evaluator_id,
            role: score.role,
            score: score.score,
            comment: score.comment,
            submitted_at: score.submitted_at,
        }
    }
}

/// A project evaluation as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDescription {
    pub id: String,
    pub project_id: String,
    pub status: EvaluationStatus,
    pub advisor_weight: Option<f64>,
    pub committee_weight: Option<f64>,
    pub final_score: Option<f64>,
    /// `final_score` rounded to two decimals.
    pub final_score_display: Option<String>,
    pub scores: Vec<ScoreDescription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectEvaluation> for EvaluationDescription {
    fn from(evaluation: ProjectEvaluation) -> Self {
        let id = evaluation.id.to_string();
        let evaluation = evaluation.evaluation;
        Self {
            id,
            project_id: evaluation.project_id,
            status: evaluation.status,
            advisor_weight: evaluation.advisor_weight,
            committee_weight: evaluation.committee_weight,
            final_score: evaluation.final_score,
            final_score_display: evaluation.final_score.map(|score| format!("{score:.2}")),
            scores: evaluation.scores.into_iter().map(Into::into).collect(),
            created_at: evaluation.created_at,
            updated_at: evaluation.updated_at,
        }
    }
}
