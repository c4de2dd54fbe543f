//! Gemini client for text extraction and grading via the Generative Language API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::credentials::CredentialSet;
use super::multimodal::MultimodalProvider;
use super::{body_to_detail, http_client};
use crate::config::GeminiConfig;
use crate::error::Result;
use crate::types::{FilePayload, ProviderCallResult, ProviderFailure};

/// Finish reasons that mean the model refused to produce text
const BLOCKING_FINISH_REASONS: [&str; 5] =
    ["SAFETY", "RECITATION", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini client authenticated with API keys
pub struct GeminiClient {
    client: reqwest::Client,
    credentials: CredentialSet,
    base_url: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let credentials = CredentialSet::new(config.api_keys.clone());
        tracing::info!(
            "Gemini client initialized ({} of {} key slots configured)",
            credentials.configured(),
            config.api_keys.len()
        );

        Ok(Self {
            client: http_client(config.request_timeout_secs)?,
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// Get the API endpoint URL for a model
    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn build_request<'a>(&self, prompt: &'a str, file: Option<&FilePayload>) -> GenerateRequest<'a> {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(file) = file {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: file.mime_type.clone(),
                    data: file.to_base64(),
                },
            });
        }

        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Classify a 2xx response body
fn interpret_success(body: &str) -> ProviderCallResult {
    let detail = body_to_detail(body);
    let response: GenerateResponse = match serde_json::from_value(detail.clone()) {
        Ok(response) => response,
        Err(e) => {
            return Err(ProviderFailure::malformed(
                format!("Failed to parse Gemini response: {}", e),
                detail,
            ))
        }
    };

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(ProviderFailure::reported(
            format!("Prompt blocked by Gemini: {}", reason),
            detail,
        ));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderFailure::malformed("No candidates in Gemini response", detail));
    };

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if !texts.is_empty() {
        return Ok(texts.concat());
    }

    match candidate.finish_reason.as_deref() {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason) => Err(ProviderFailure::reported(
            format!("Gemini stopped generation: {}", reason),
            detail,
        )),
        _ => Err(ProviderFailure::malformed("No text in Gemini response", detail)),
    }
}

/// Classify a non-2xx response body
fn interpret_error(status: reqwest::StatusCode, body: &str) -> ProviderFailure {
    let detail = body_to_detail(body);
    let message = detail
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Gemini request failed with HTTP {}", status));
    ProviderFailure::reported(message, detail)
}

#[async_trait]
impl MultimodalProvider for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePayload>,
        credential_index: Option<usize>,
        model: &str,
    ) -> ProviderCallResult {
        let (slot, api_key) = self.credentials.select(credential_index)?;
        let request = self.build_request(prompt, file);

        tracing::debug!(
            "Calling Gemini {} with key slot {} ({} prompt chars, file: {})",
            model,
            slot,
            prompt.chars().count(),
            file.map(|f| f.mime_type.as_str()).unwrap_or("none")
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                ProviderFailure::transport(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Gemini response body: {}", e);
            ProviderFailure::transport(format!("Failed to read Gemini response: {}", e))
        })?;

        let result = if status.is_success() {
            interpret_success(&body)
        } else {
            Err(interpret_error(status, &body))
        };

        if let Err(failure) = &result {
            tracing::error!("Gemini {} call failed ({:?}): {}", model, failure.kind, failure.error);
        }
        result
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
