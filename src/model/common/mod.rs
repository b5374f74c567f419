mod evaluation;
mod field_pool;

pub use evaluation::{EvaluationStatus, ScoreRole};
pub use field_pool::FieldPoolStatus;

/// Lowest score an evaluator can award.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score an evaluator can award.
pub const MAX_SCORE: f64 = 10.0;
