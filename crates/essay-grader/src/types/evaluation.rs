//! Evaluation request and response types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which provider grades the essay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ProviderSelector {
    /// Multimodal provider, fast model variant, text-only mode
    #[default]
    GeminiFlash,
    /// Multimodal provider, large model variant, text-only mode
    GeminiPro,
    /// Chat provider serving DeepSeek
    Deepseek,
    /// Chat provider serving GPT
    Gpt,
}

impl ProviderSelector {
    pub const ALL: [ProviderSelector; 4] = [
        ProviderSelector::GeminiFlash,
        ProviderSelector::GeminiPro,
        ProviderSelector::Deepseek,
        ProviderSelector::Gpt,
    ];

    /// Name used in logs and user-facing failure messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderSelector::GeminiFlash => "Gemini",
            ProviderSelector::GeminiPro => "Gemini Pro",
            ProviderSelector::Deepseek => "DeepSeek",
            ProviderSelector::Gpt => "GPT-4",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSelector::GeminiFlash => "gemini-flash",
            ProviderSelector::GeminiPro => "gemini-pro",
            ProviderSelector::Deepseek => "deepseek",
            ProviderSelector::Gpt => "gpt",
        }
    }
}

impl fmt::Display for ProviderSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "gemini-flash" => Ok(ProviderSelector::GeminiFlash),
            "gemini-pro" => Ok(ProviderSelector::GeminiPro),
            "deepseek" => Ok(ProviderSelector::Deepseek),
            "gpt" | "gpt-4" | "gpt4" => Ok(ProviderSelector::Gpt),
            other => Err(Error::bad_request(format!("Unknown provider: {}", other))),
        }
    }
}

/// A request to grade a piece of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    /// Essay body
    pub text: String,
    /// Instruction replacing the default rubric
    #[serde(default, alias = "command")]
    pub custom_instruction: Option<String>,
    #[serde(default)]
    pub provider: ProviderSelector,
    /// Credential slot for the multimodal provider
    #[serde(default, alias = "keyNumber")]
    pub credential_index: Option<usize>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
}

impl EvaluationRequest {
    pub fn new(text: impl Into<String>, provider: ProviderSelector) -> Self {
        Self {
            text: text.into(),
            provider,
            ..Default::default()
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.custom_instruction = Some(instruction.into());
        self
    }

    pub fn with_credential_index(mut self, index: usize) -> Self {
        self.credential_index = Some(index);
        self
    }

    /// Reject requests whose text is empty after trimming
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::bad_request("請提供要評分的文字內容"));
        }
        Ok(())
    }
}

/// A successful evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Provider output
    pub evaluation: String,
    pub provider: ProviderSelector,
    /// Model that produced the output
    pub model: String,
}
