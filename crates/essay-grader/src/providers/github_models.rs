//! GitHub Models chat-completion client (DeepSeek, GPT)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::chat::{ChatOptions, ChatProvider};
use super::{body_to_detail, http_client};
use crate::config::GithubModelsConfig;
use crate::error::Result;
use crate::types::{ProviderCallResult, ProviderFailure};

/// Client for the GitHub Models inference endpoint
pub struct GithubModelsClient {
    client: reqwest::Client,
    token: Option<String>,
    endpoint: String,
    defaults: ChatOptions,
}

impl GithubModelsClient {
    /// Create a new client from configuration
    pub fn new(config: &GithubModelsConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout_secs)?,
            token: config.token.clone().filter(|token| !token.trim().is_empty()),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            defaults: ChatOptions {
                system_message: None,
                max_tokens: Some(config.max_tokens),
                temperature: Some(config.temperature),
                top_p: Some(config.top_p),
            },
        })
    }

    fn build_request<'a>(&self, model: &'a str, prompt: &'a str, options: &'a ChatOptions) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = options.system_message.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            messages,
            max_tokens: options.max_tokens.or(self.defaults.max_tokens).unwrap_or(2048),
            temperature: options.temperature.or(self.defaults.temperature).unwrap_or(1.0),
            top_p: options.top_p.or(self.defaults.top_p).unwrap_or(1.0),
            model,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    model: &'a str,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl ChatProvider for GithubModelsClient {
    async fn complete(&self, model: &str, prompt: &str, options: &ChatOptions) -> ProviderCallResult {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ProviderFailure::configuration("GitHub API token is not configured"))?;

        let request = self.build_request(model, prompt, options);
        let url = format!("{}/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("{} API error: {}", model, e);
                ProviderFailure::transport(format!("{} request failed: {}", model, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("{} response could not be read: {}", model, e);
            ProviderFailure::transport(format!("Failed to read {} response: {}", model, e))
        })?;
        let detail = body_to_detail(&body);

        if !status.is_success() {
            tracing::error!("{} API returned unexpected response ({}): {}", model, status, body);
            return Err(ProviderFailure::reported("API returned unexpected response", detail));
        }

        match serde_json::from_value::<ChatResponse>(detail.clone())
            .ok()
            .and_then(|response| response.choices.into_iter().next())
        {
            Some(choice) => Ok(choice.message.content),
            None => {
                tracing::error!("{} returned an invalid response format", model);
                Err(ProviderFailure::malformed("Invalid response format", detail))
            }
        }
    }

    fn name(&self) -> &str {
        "github-models"
    }
}
