mod base;
mod finalizer;
mod store;

pub use base::{EvaluationScore, NewProjectEvaluation, ProjectEvaluation, ProjectEvaluationCore};
pub use finalizer::{
    average_score, final_score, EvaluationFinalizer, ScoreBreakdown, Weights,
    DEFAULT_WEIGHT_TOLERANCE,
};
pub use store::EvaluationStore;
