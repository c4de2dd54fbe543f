//! Multi-file text extraction through the multimodal provider

pub mod markers;
pub mod orchestrator;

pub use markers::{EXTRACTION_PROMPT, PAGE_SEPARATOR};
pub use orchestrator::ExtractionOrchestrator;
