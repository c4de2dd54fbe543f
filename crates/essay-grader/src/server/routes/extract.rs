//! Text extraction endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::storage::{release_all, stage_upload};
use crate::types::UploadedFile;

/// Response for a processed batch
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    /// Per-file texts joined with the page separator
    pub text: String,
    pub filenames: Vec<String>,
}

/// Files and selectors received in one multipart request
#[derive(Debug, Default)]
struct Intake {
    files: Vec<UploadedFile>,
    credential_index: Option<usize>,
    model: Option<String>,
}

/// POST /extract-text - Upload images/PDFs and extract their text
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    let mut intake = Intake::default();

    if let Err(e) = receive_fields(&state, &mut multipart, &mut intake).await {
        tracing::error!("Upload intake failed: {}", e);
        discard(&state, &intake.files).await;
        return Err(e);
    }

    if intake.files.is_empty() {
        return Err(Error::bad_request("請選擇至少一個文件"));
    }

    let model = intake
        .model
        .unwrap_or_else(|| state.config().gemini.default_model.clone());

    // The batch owns its files and runs to completion even if the client disconnects
    let files = intake.files;
    let credential_index = intake.credential_index;
    let batch_state = state.clone();
    let batch = tokio::spawn(async move {
        batch_state
            .orchestrator()
            .extract_batch(&files, credential_index, &model)
            .await
    });

    let result = batch.await.map_err(|e| {
        tracing::error!("Extraction task failed: {}", e);
        Error::internal(format!("Extraction task failed: {}", e))
    })?;

    Ok(Json(ExtractResponse {
        success: true,
        text: result.combined_text,
        filenames: result.filenames,
    }))
}

/// Read every multipart field, staging file fields in the upload directory
async fn receive_fields(
    state: &AppState,
    multipart: &mut Multipart,
    intake: &mut Intake,
) -> Result<()> {
    let upload = &state.config().upload;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::upload(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" => {
                if intake.files.len() >= upload.max_files {
                    return Err(Error::upload(format!("最多只能上傳 {} 個文件", upload.max_files)));
                }

                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("file_{}", intake.files.len() + 1));
                let mime_type = field
                    .content_type()
                    .filter(|mime| *mime != "application/octet-stream")
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&filename)
                            .first_or_octet_stream()
                            .to_string()
                    });

                let data = field.bytes().await.map_err(|e| {
                    Error::upload(format!("Failed to read file '{}': {}", filename, e))
                })?;

                if data.len() as u64 > upload.max_file_size_bytes {
                    return Err(Error::upload(format!(
                        "文件大小不能超過 {}MB",
                        upload.max_file_size_bytes / (1024 * 1024)
                    )));
                }

                let file = stage_upload(&upload.upload_dir, &filename, &mime_type, &data).await?;
                tracing::debug!(
                    "Staged upload '{}' ({}, {} bytes) at {}",
                    file.original_name,
                    file.mime_type,
                    file.size_bytes,
                    file.storage_path.display()
                );
                intake.files.push(file);
            }
            "keyNumber" | "credentialIndex" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::upload(format!("Failed to read {}: {}", name, e)))?;
                intake.credential_index = value.trim().parse().ok();
            }
            "model" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::upload(format!("Failed to read model: {}", e)))?;
                let value = value.trim();
                if !value.is_empty() {
                    intake.model = Some(value.to_string());
                }
            }
            other => {
                tracing::debug!("Ignoring multipart field '{}'", other);
            }
        }
    }

    Ok(())
}

/// Remove files staged for a batch that will not be processed
async fn discard(state: &AppState, files: &[UploadedFile]) {
    if files.is_empty() {
        return;
    }

    let paths: Vec<PathBuf> = files.iter().map(|file| file.storage_path.clone()).collect();
    if !release_all(state.store(), &paths).await {
        tracing::warn!("Some staged uploads could not be removed");
    }
}
