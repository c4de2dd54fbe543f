//! Routing of evaluation requests to the selected provider

use std::sync::Arc;

use super::prompt::build_evaluation_prompt;
use crate::config::GraderConfig;
use crate::providers::{ChatOptions, ChatProvider, MultimodalProvider};
use crate::types::{Evaluation, EvaluationRequest, ProviderFailure, ProviderSelector};

/// Model and options for one chat-backed selector
#[derive(Debug, Clone)]
pub struct ChatRoute {
    pub model: String,
    pub options: ChatOptions,
}

/// Static per-selector routing data, fixed at startup
#[derive(Debug, Clone)]
pub struct RoutingTable {
    pub gemini_flash_model: String,
    pub gemini_pro_model: String,
    pub deepseek: ChatRoute,
    pub gpt: ChatRoute,
}

impl RoutingTable {
    pub fn from_config(config: &GraderConfig) -> Self {
        let github = &config.github;
        Self {
            gemini_flash_model: config.gemini.flash_model.clone(),
            gemini_pro_model: config.gemini.pro_model.clone(),
            deepseek: ChatRoute {
                model: github.deepseek_model.clone(),
                options: ChatOptions {
                    system_message: github.deepseek_system_message.clone(),
                    ..ChatOptions::default()
                },
            },
            gpt: ChatRoute {
                model: github.gpt_model.clone(),
                options: ChatOptions {
                    system_message: github.gpt_system_message.clone(),
                    ..ChatOptions::default()
                },
            },
        }
    }

    /// Model a selector uses when the request does not override it
    pub fn default_model(&self, selector: ProviderSelector) -> &str {
        match selector {
            ProviderSelector::GeminiFlash => &self.gemini_flash_model,
            ProviderSelector::GeminiPro => &self.gemini_pro_model,
            ProviderSelector::Deepseek => &self.deepseek.model,
            ProviderSelector::Gpt => &self.gpt.model,
        }
    }
}

/// Dispatches evaluation prompts to the multimodal or chat provider
pub struct EvaluationRouter {
    multimodal: Arc<dyn MultimodalProvider>,
    chat: Arc<dyn ChatProvider>,
    routes: RoutingTable,
}

impl EvaluationRouter {
    pub fn new(
        multimodal: Arc<dyn MultimodalProvider>,
        chat: Arc<dyn ChatProvider>,
        routes: RoutingTable,
    ) -> Self {
        Self {
            multimodal,
            chat,
            routes,
        }
    }

    /// Grade `request.text` with the selected provider.
    ///
    /// Provider failures, including missing credentials, come back as `Err`
    /// values carrying a user-facing message plus the original kind and
    /// detail. The text is not re-validated here; callers reject blank text
    /// with [`EvaluationRequest::validate`] first.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, ProviderFailure> {
        let selector = request.provider;
        let prompt = build_evaluation_prompt(&request.text, request.custom_instruction.as_deref());
        let model = request
            .model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.routes.default_model(selector))
            .to_string();

        tracing::info!(
            "{} evaluation request (model: {}, text: {} chars, prompt: {} chars)",
            selector.display_name(),
            model,
            request.text.chars().count(),
            prompt.chars().count()
        );
        tracing::debug!("Prompt head: {}", prompt.chars().take(100).collect::<String>());

        let result = match selector {
            ProviderSelector::GeminiFlash | ProviderSelector::GeminiPro => {
                self.multimodal
                    .generate(&prompt, None, request.credential_index, &model)
                    .await
            }
            ProviderSelector::Deepseek => {
                self.chat
                    .complete(&model, &prompt, &self.routes.deepseek.options)
                    .await
            }
            ProviderSelector::Gpt => {
                self.chat
                    .complete(&model, &prompt, &self.routes.gpt.options)
                    .await
            }
        };

        match result {
            Ok(text) => {
                tracing::info!(
                    "{} evaluation succeeded ({} chars)",
                    selector.display_name(),
                    text.chars().count()
                );
                Ok(Evaluation {
                    evaluation: text,
                    provider: selector,
                    model,
                })
            }
            Err(failure) => {
                tracing::error!(
                    "{} evaluation failed ({:?}): {}",
                    selector.display_name(),
                    failure.kind,
                    failure.error
                );
                let message = format!("{} 評分失敗: {}", selector.display_name(), failure.error);
                Err(failure.with_error(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, GithubModelsConfig};
    use crate::evaluation::DEFAULT_RUBRIC;
    use crate::providers::{GeminiClient, GithubModelsClient};
    use crate::test_support::{unreachable_url, ScriptedChat, ScriptedMultimodal};
    use crate::types::FailureKind;
    use serde_json::json;

    fn router(
        multimodal: &Arc<ScriptedMultimodal>,
        chat: &Arc<ScriptedChat>,
    ) -> EvaluationRouter {
        EvaluationRouter::new(
            multimodal.clone(),
            chat.clone(),
            RoutingTable::from_config(&GraderConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_gpt_with_blank_instruction_uses_default_rubric() {
        let multimodal = Arc::new(ScriptedMultimodal::replying(Ok("unused".to_string())));
        let chat = Arc::new(ScriptedChat::replying(Ok("<provider output>".to_string())));
        let request = EvaluationRequest::new("essay body", ProviderSelector::Gpt).with_instruction("");

        let evaluation = router(&multimodal, &chat).evaluate(&request).await.unwrap();
        assert_eq!(evaluation.evaluation, "<provider output>");
        assert_eq!(evaluation.provider, ProviderSelector::Gpt);

        let calls = chat.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, format!("{}\n\n文章內容：\nessay body", DEFAULT_RUBRIC));
        assert_eq!(calls[0].model, "openai/gpt-4o");
        assert_eq!(
            calls[0].options.system_message.as_deref(),
            Some("You are a helpful assistant.")
        );
        assert!(multimodal.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deepseek_has_no_system_message() {
        let multimodal = Arc::new(ScriptedMultimodal::replying(Ok("unused".to_string())));
        let chat = Arc::new(ScriptedChat::replying(Ok("評分：B".to_string())));
        let request = EvaluationRequest::new("essay body", ProviderSelector::Deepseek)
            .with_instruction("請評分");

        router(&multimodal, &chat).evaluate(&request).await.unwrap();

        let calls = chat.calls();
        assert_eq!(calls[0].model, "deepseek/DeepSeek-V3-0324");
        assert_eq!(calls[0].prompt, "請評分\n\n文章內容：\nessay body");
        assert!(calls[0].options.system_message.is_none());
    }

    #[tokio::test]
    async fn test_gemini_variants_run_text_only() {
        let multimodal = Arc::new(ScriptedMultimodal::replying(Ok("good essay".to_string())));
        let chat = Arc::new(ScriptedChat::replying(Ok("unused".to_string())));
        let router = router(&multimodal, &chat);

        let request = EvaluationRequest::new("essay body", ProviderSelector::GeminiPro)
            .with_credential_index(2);
        let evaluation = router.evaluate(&request).await.unwrap();
        assert_eq!(evaluation.model, "gemini-2.5-pro");

        let mut request = EvaluationRequest::new("essay body", ProviderSelector::GeminiFlash);
        request.model = Some("gemini-2.0-flash".to_string());
        router.evaluate(&request).await.unwrap();

        let calls = multimodal.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.file.is_none()));
        assert_eq!(calls[0].model, "gemini-2.5-pro");
        assert_eq!(calls[0].credential_index, Some(2));
        assert_eq!(calls[1].model, "gemini-2.0-flash");
        assert!(chat.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_kind_and_detail() {
        let multimodal = Arc::new(ScriptedMultimodal::replying(Ok("unused".to_string())));
        let chat = Arc::new(ScriptedChat::replying(Err(ProviderFailure::reported(
            "API returned unexpected response",
            json!({"error": {"code": "RateLimitReached"}}),
        ))));
        let request = EvaluationRequest::new("essay body", ProviderSelector::Deepseek);

        let failure = router(&multimodal, &chat).evaluate(&request).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::ProviderReported);
        assert_eq!(failure.error, "DeepSeek 評分失敗: API returned unexpected response");
        assert_eq!(failure.detail, Some(json!({"error": {"code": "RateLimitReached"}})));
    }

    #[tokio::test]
    async fn test_missing_credentials_surface_as_failures() {
        let base_url = unreachable_url().await;
        let gemini = GeminiClient::new(&GeminiConfig {
            base_url: base_url.clone(),
            ..GeminiConfig::default()
        })
        .unwrap();
        let github = GithubModelsClient::new(&GithubModelsConfig {
            endpoint: base_url,
            ..GithubModelsConfig::default()
        })
        .unwrap();
        let router = EvaluationRouter::new(
            Arc::new(gemini),
            Arc::new(github),
            RoutingTable::from_config(&GraderConfig::default()),
        );

        for selector in ProviderSelector::ALL {
            let request = EvaluationRequest::new("essay body", selector);
            let failure = router.evaluate(&request).await.unwrap_err();
            assert_eq!(failure.kind, FailureKind::Configuration);
            assert!(failure.error.starts_with(selector.display_name()));
        }
    }
}
