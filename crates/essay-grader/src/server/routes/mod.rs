//! HTTP routes for the grading server

pub mod evaluate;
pub mod extract;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Extraction - with larger body limit for file uploads
        .route(
            "/extract-text",
            post(extract::extract_text).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Evaluation with an explicit provider selector
        .route("/evaluate", post(evaluate::evaluate))
        // Fixed-provider evaluation endpoints
        .route("/evaluate-text", post(evaluate::evaluate_with_gemini))
        .route("/evaluate-text-deepseek", post(evaluate::evaluate_with_deepseek))
        .route("/evaluate-text-gpt", post(evaluate::evaluate_with_gpt))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "essay-grader",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Text extraction from images/PDFs and rubric-based essay evaluation",
        "endpoints": {
            "POST /extract-text": "Upload images or PDFs (multipart field 'files') and extract their text",
            "POST /evaluate": "Evaluate text with {text, command, provider, keyNumber, model}",
            "POST /evaluate-text": "Evaluate text with Gemini",
            "POST /evaluate-text-deepseek": "Evaluate text with DeepSeek",
            "POST /evaluate-text-gpt": "Evaluate text with GPT",
            "GET /health": "Health check"
        },
        "providers": ["gemini-flash", "gemini-pro", "deepseek", "gpt"]
    }))
}
