use serde::{Deserialize, Serialize};

/// States in the project evaluation lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    /// Scores are still being collected.
    Pending,
    /// A final score has been computed.
    Evaluated,
}

/// The capacity in which an evaluator scored a project.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreRole {
    Advisor,
    Committee,
}
