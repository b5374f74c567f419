use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    api::evaluation::{EvaluationSpec, FinalizeRequest, ScoreSubmission},
    common::{EvaluationStatus, ScoreRole, MAX_SCORE, MIN_SCORE},
    db::{
        evaluation::{EvaluationScore, EvaluationStore, NewProjectEvaluation, ProjectEvaluation},
        stored_instant, Written,
    },
    mongodb::Id,
};

/// Default permitted deviation of the weight sum from 1.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-6;

/// A validated pair of weights: each in [0, 1], summing to 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weights {
    advisor: f64,
    committee: f64,
}

impl Weights {
    pub fn new(advisor: f64, committee: f64, tolerance: f64) -> Result<Self> {
        for (role, weight) in [("Advisor", advisor), ("Committee", committee)] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::invalid(format!(
                    "{role} weight {weight} is outside [0, 1]"
                )));
            }
        }
        let sum = advisor + committee;
        if (sum - 1.0).abs() > tolerance {
            return Err(Error::invalid(format!(
                "Advisor and committee weights must sum to 1, got {sum}"
            )));
        }
        Ok(Self { advisor, committee })
    }

    pub fn advisor(&self) -> f64 {
        self.advisor
    }

    pub fn committee(&self) -> f64 {
        self.committee
    }
}

/// Arithmetic mean, or 0 for no scores at all.
pub fn average_score(scores: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0u32), |(sum, count), score| (sum + score, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// How a final score was arrived at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub advisor_average: f64,
    pub committee_average: f64,
    pub final_score: f64,
}

/// Blend the per-role averages of an evaluation's scores.
pub fn final_score(evaluation: &NewProjectEvaluation, weights: Weights) -> ScoreBreakdown {
    let advisor_average = average_score(evaluation.scores_for(ScoreRole::Advisor));
    let committee_average = average_score(evaluation.scores_for(ScoreRole::Committee));
    ScoreBreakdown {
        advisor_average,
        committee_average,
        final_score: advisor_average * weights.advisor + committee_average * weights.committee,
    }
}

/// Collects evaluator scores for projects and turns them into final scores.
pub struct EvaluationFinalizer<'s> {
    evaluations: &'s dyn EvaluationStore,
    weight_tolerance: f64,
}

impl<'s> EvaluationFinalizer<'s> {
    pub fn new(evaluations: &'s dyn EvaluationStore) -> Self {
        Self {
            evaluations,
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
        }
    }

    /// Permitted deviation of the weight sum from 1.
    pub fn weight_tolerance(mut self, tolerance: f64) -> Self {
        self.weight_tolerance = tolerance;
        self
    }

    /// Start evaluating a project.
    pub async fn create(
        &self,
        spec: EvaluationSpec,
        now: DateTime<Utc>,
    ) -> Result<Written<ProjectEvaluation>> {
        let project_id = spec.project_id.trim().to_string();
        if project_id.is_empty() {
            return Err(Error::invalid("Project ID must not be empty"));
        }
        if self.evaluations.find_by_project(&project_id).await?.is_some() {
            return Err(Error::conflict(format!(
                "Project '{project_id}' already has an evaluation"
            )));
        }
        let evaluation = ProjectEvaluation {
            id: Id::new(),
            evaluation: NewProjectEvaluation::new(project_id, stored_instant(now)),
        };
        self.evaluations.insert(&evaluation).await?;
        info!(
            "Created evaluation {} for project {}",
            evaluation.id, evaluation.project_id
        );
        Ok(Written {
            message: "Evaluation created successfully".to_string(),
            record: evaluation,
        })
    }

    pub async fn get(&self, id: Id) -> Result<ProjectEvaluation> {
        self.evaluations
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Record an evaluator's score. Resubmitting replaces the earlier score.
    pub async fn submit_score(
        &self,
        id: Id,
        submission: ScoreSubmission,
        now: DateTime<Utc>,
    ) -> Result<Written<ProjectEvaluation>> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&submission.score) {
            return Err(Error::invalid(format!(
                "Score {} is outside [{MIN_SCORE}, {MAX_SCORE}]",
                submission.score
            )));
        }
        let evaluator_id = submission.evaluator_id.trim().to_string();
        if evaluator_id.is_empty() {
            return Err(Error::invalid("Evaluator ID must not be empty"));
        }

        let mut evaluation = self.get(id).await?;
        if evaluation.status == EvaluationStatus::Evaluated {
            return Err(Error::conflict(format!(
                "Evaluation with ID '{id}' has already been finalized"
            )));
        }
        evaluation.record_score(EvaluationScore {
            evaluator_id,
            role: submission.role,
            score: submission.score,
            comment: submission.comment,
            submitted_at: stored_instant(now),
        });

        let evaluation = self.save(evaluation, now).await?;
        debug!("Recorded {:?} score for evaluation {id}", submission.role);
        Ok(Written {
            message: "Score submitted successfully".to_string(),
            record: evaluation,
        })
    }

    /// Compute and store the final score.
    ///
    /// Finalizing again with the same weights and scores gives the same
    /// result.
    pub async fn finalize(
        &self,
        id: Id,
        request: FinalizeRequest,
        now: DateTime<Utc>,
    ) -> Result<ProjectEvaluation> {
        let weights = Weights::new(
            request.advisor_weight,
            request.committee_weight,
            self.weight_tolerance,
        )?;
        let mut evaluation = self.get(id).await?;

        let breakdown = final_score(&evaluation, weights);
        evaluation.advisor_weight = Some(weights.advisor());
        evaluation.committee_weight = Some(weights.committee());
        evaluation.final_score = Some(breakdown.final_score);
        evaluation.status = EvaluationStatus::Evaluated;

        let evaluation = self.save(evaluation, now).await?;
        info!(
            "Finalized evaluation {id}: advisor average {:.2}, committee average {:.2}, final score {:.2}",
            breakdown.advisor_average, breakdown.committee_average, breakdown.final_score
        );
        Ok(evaluation)
    }

    /// Bump the revision and write back, failing if someone else got there
    /// first.
    async fn save(
        &self,
        mut evaluation: ProjectEvaluation,
        now: DateTime<Utc>,
    ) -> Result<ProjectEvaluation> {
        let expected_revision = evaluation.revision;
        evaluation.revision += 1;
        evaluation.updated_at = stored_instant(now);
        if !self
            .evaluations
            .replace(&evaluation, expected_revision)
            .await?
        {
            warn!("Concurrent modification of evaluation {}", evaluation.id);
            return Err(Error::conflict(format!(
                "Evaluation with ID '{}' was modified concurrently",
                evaluation.id
            )));
        }
        Ok(evaluation)
    }
}

fn not_found(id: Id) -> Error {
    Error::not_found(format!("Evaluation with ID '{id}'"))
}
