//! Command-line extraction and grading
//!
//! Run with: cargo run -p essay-grader --features cli --bin essay-grader -- extract page1.png page2.pdf

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use essay_grader::{
    config::GraderConfig, server::state::AppState, storage::stage_upload, telemetry,
    EvaluationRequest, ProviderSelector, UploadedFile,
};

#[derive(Parser)]
#[command(name = "essay-grader")]
#[command(about = "Extract text from images/PDFs and grade it with an LLM")]
#[command(version)]
struct Cli {
    /// TOML configuration file (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from files in the given order
    Extract {
        /// Image or PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Gemini credential slot
        #[arg(short, long)]
        key: Option<usize>,

        /// Gemini model used for extraction
        #[arg(short, long)]
        model: Option<String>,

        /// Grade the extracted text with this provider
        #[arg(short, long, value_enum)]
        evaluate: Option<ProviderSelector>,

        /// Grading instruction replacing the default rubric
        #[arg(short, long, requires = "evaluate")]
        command: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GraderConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => GraderConfig::from_env(),
    };

    for var in config.missing_required() {
        eprintln!("{} {} is not set", style("warning:").yellow().bold(), var);
    }

    match cli.command {
        Commands::Extract {
            files,
            key,
            model,
            evaluate,
            command,
        } => extract(config, files, key, model, evaluate, command).await,
    }
}

async fn extract(
    config: GraderConfig,
    paths: Vec<PathBuf>,
    key: Option<usize>,
    model: Option<String>,
    evaluate: Option<ProviderSelector>,
    command: Option<String>,
) -> anyhow::Result<()> {
    // Extraction releases every file it processes, so it only ever sees copies
    let staging = tempfile::tempdir().context("Failed to create staging directory")?;
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(stage_copy(staging.path(), path).await?);
    }

    let model = model.unwrap_or_else(|| config.gemini.default_model.clone());
    let state = AppState::new(config)?;

    let spinner = spinner(format!("Extracting {} file(s) with {}", files.len(), model));
    let result = state.orchestrator().extract_batch(&files, key, &model).await;
    spinner.finish_and_clear();

    println!(
        "{} {}",
        style("Extracted:").cyan().bold(),
        result.filenames.join(", ")
    );
    println!("{}", result.combined_text);

    let Some(provider) = evaluate else {
        return Ok(());
    };

    let mut request = EvaluationRequest::new(result.combined_text, provider);
    request.custom_instruction = command;
    request.credential_index = key;
    request.validate()?;

    let spinner = spinner(format!("Evaluating with {}", provider.display_name()));
    let outcome = state.router().evaluate(&request).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(evaluation) => {
            println!(
                "\n{} ({})",
                style("Evaluation").green().bold(),
                style(&evaluation.model).dim()
            );
            println!("{}", evaluation.evaluation);
            Ok(())
        }
        Err(failure) => {
            eprintln!("\n{} {}", style("✗").red(), failure.error);
            if let Some(detail) = &failure.detail {
                eprintln!("{}", style(detail).dim());
            }
            anyhow::bail!("evaluation failed")
        }
    }
}

/// Copy `path` into the staging directory
async fn stage_copy(dir: &Path, path: &Path) -> anyhow::Result<UploadedFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Ok(stage_upload(dir, &name, &mime_type, &data).await?)
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
