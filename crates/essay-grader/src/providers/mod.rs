//! Provider abstractions for remote inference
//!
//! This module provides trait-based abstractions over the multimodal provider
//! used for extraction (and text-only grading) and the chat providers used
//! for grading. Every call resolves to a [`ProviderCallResult`].
//!
//! [`ProviderCallResult`]: crate::types::ProviderCallResult

pub mod chat;
pub mod credentials;
pub mod gemini;
pub mod github_models;
pub mod multimodal;

pub use chat::{ChatOptions, ChatProvider};
pub use credentials::CredentialSet;
pub use gemini::GeminiClient;
pub use github_models::GithubModelsClient;
pub use multimodal::MultimodalProvider;

use std::time::Duration;

use crate::error::Result;

/// Build the shared HTTP client for a provider
pub(crate) fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().pool_max_idle_per_host(5);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Decode a provider body as JSON, keeping the raw text when it is not JSON
pub(crate) fn body_to_detail(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}
