//! Rubric-based essay evaluation across providers

pub mod prompt;
pub mod router;

pub use prompt::{build_evaluation_prompt, DEFAULT_RUBRIC};
pub use router::EvaluationRouter;
