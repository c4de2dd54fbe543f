//! Multimodal provider trait for extraction and text-only grading

use async_trait::async_trait;

use crate::types::{FilePayload, ProviderCallResult};

/// Trait for a provider that accepts a prompt plus an optional file
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API
#[async_trait]
pub trait MultimodalProvider: Send + Sync {
    /// Run one generation.
    ///
    /// `file` is attached as an inline part when present; otherwise the call
    /// is text-only. `credential_index` selects a configured credential slot.
    /// A single attempt is made.
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePayload>,
        credential_index: Option<usize>,
        model: &str,
    ) -> ProviderCallResult;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
