//! Chat provider trait for text-only grading

use async_trait::async_trait;

use crate::types::ProviderCallResult;

/// Per-call options for a chat completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Optional system message sent before the prompt
    pub system_message: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// Trait for a chat-completion provider serving several models
///
/// Implementations:
/// - `GithubModelsClient`: GitHub Models inference (DeepSeek, GPT)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one chat completion against `model`. A single attempt is made.
    async fn complete(&self, model: &str, prompt: &str, options: &ChatOptions) -> ProviderCallResult;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
