//! Uniform outcome of a provider call

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome of a single call to a remote inference provider.
///
/// `Ok` carries the generated text; `Err` carries a [`ProviderFailure`].
/// Expected provider failures are values, never panics or crate errors.
pub type ProviderCallResult = std::result::Result<String, ProviderFailure>;

/// Category of a failed provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Required credential or endpoint missing when the call was attempted
    Configuration,
    /// Provider unreachable (connect, TLS, timeout, body read)
    Transport,
    /// Provider answered with a payload of unexpected shape
    ProviderResponse,
    /// Provider explicitly reported an inference failure
    ProviderReported,
}

/// A failed provider call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub kind: FailureKind,
    /// Human readable failure reason
    pub error: String,
    /// Raw provider body for diagnostics; only set for response-level failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ProviderFailure {
    pub fn configuration(error: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Configuration,
            error: error.into(),
            detail: None,
        }
    }

    pub fn transport(error: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            error: error.into(),
            detail: None,
        }
    }

    pub fn malformed(error: impl Into<String>, detail: Value) -> Self {
        Self {
            kind: FailureKind::ProviderResponse,
            error: error.into(),
            detail: Some(detail),
        }
    }

    pub fn reported(error: impl Into<String>, detail: Value) -> Self {
        Self {
            kind: FailureKind::ProviderReported,
            error: error.into(),
            detail: Some(detail),
        }
    }

    /// Replace the message, keeping kind and detail
    pub fn with_error(self, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..self
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for ProviderFailure {}
