//! essay-grader: text extraction and essay evaluation over remote LLM providers
//!
//! Uploaded images and PDFs are transcribed concurrently by a multimodal
//! provider and reassembled in upload order. The resulting text can then be
//! graded against a rubric by any of several providers selected per request.
//! Provider failures never abort a batch; they are rendered inline or
//! returned as structured failures.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod extraction;
pub mod providers;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::GraderConfig;
pub use error::{Error, Result};
pub use evaluation::EvaluationRouter;
pub use extraction::ExtractionOrchestrator;
pub use types::{
    evaluation::{Evaluation, EvaluationRequest, ProviderSelector},
    extraction::{BatchExtractionResult, ExtractionOutcome},
    file::UploadedFile,
    outcome::{FailureKind, ProviderCallResult, ProviderFailure},
};
