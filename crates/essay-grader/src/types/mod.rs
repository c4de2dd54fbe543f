//! Core types shared by the extraction and evaluation pipelines

pub mod evaluation;
pub mod extraction;
pub mod file;
pub mod outcome;

pub use evaluation::{Evaluation, EvaluationRequest, ProviderSelector};
pub use extraction::{BatchExtractionResult, ExtractionOutcome};
pub use file::{FilePayload, UploadedFile};
pub use outcome::{FailureKind, ProviderCallResult, ProviderFailure};
