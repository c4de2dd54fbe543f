//! Grading server binary
//!
//! Run with: cargo run -p essay-grader --bin essay-grader-server

use essay_grader::{config::GraderConfig, server::GraderServer, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let config = match std::env::var("GRADER_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            GraderConfig::from_toml_file(&path)?
        }
        Err(_) => GraderConfig::from_env(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload directory: {}", config.upload.upload_dir.display());
    tracing::info!(
        "  - Limits: {} files, {}MB each",
        config.upload.max_files,
        config.upload.max_file_size_bytes / (1024 * 1024)
    );
    for var in config.missing_required() {
        tracing::warn!("{} is not set; calls that need it will fail", var);
    }

    let server = GraderServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /extract-text           - Extract text from images/PDFs");
    println!("  POST /evaluate               - Evaluate with a chosen provider");
    println!("  POST /evaluate-text          - Evaluate with Gemini");
    println!("  POST /evaluate-text-deepseek - Evaluate with DeepSeek");
    println!("  POST /evaluate-text-gpt      - Evaluate with GPT");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
