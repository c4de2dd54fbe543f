//! Evaluation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{EvaluationRequest, ProviderSelector};

/// Body returned for a successful evaluation
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub success: bool,
    pub evaluation: String,
    pub provider: ProviderSelector,
    pub model: String,
}

/// Body returned when the provider call failed
#[derive(Debug, Serialize)]
pub struct EvaluationErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// POST /evaluate - Evaluate with the provider named in the request
pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Response> {
    run_evaluation(&state, request).await
}

/// POST /evaluate-text - Evaluate with the configured Gemini Flash model
pub async fn evaluate_with_gemini(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Response> {
    let request = EvaluationRequest {
        provider: ProviderSelector::GeminiFlash,
        model: None,
        ..request
    };
    run_evaluation(&state, request).await
}

/// POST /evaluate-text-deepseek - Evaluate with the configured DeepSeek model
pub async fn evaluate_with_deepseek(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Response> {
    let request = EvaluationRequest {
        provider: ProviderSelector::Deepseek,
        model: None,
        credential_index: None,
        ..request
    };
    run_evaluation(&state, request).await
}

/// POST /evaluate-text-gpt - Evaluate with the configured GPT model
pub async fn evaluate_with_gpt(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Response> {
    let request = EvaluationRequest {
        provider: ProviderSelector::Gpt,
        model: None,
        credential_index: None,
        ..request
    };
    run_evaluation(&state, request).await
}

async fn run_evaluation(state: &AppState, request: EvaluationRequest) -> Result<Response> {
    request.validate()?;

    let response = match state.router().evaluate(&request).await {
        Ok(evaluation) => Json(EvaluationResponse {
            success: true,
            evaluation: evaluation.evaluation,
            provider: evaluation.provider,
            model: evaluation.model,
        })
        .into_response(),
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(EvaluationErrorResponse {
                success: false,
                error: failure.error,
                detail: failure.detail,
            }),
        )
            .into_response(),
    };

    Ok(response)
}
