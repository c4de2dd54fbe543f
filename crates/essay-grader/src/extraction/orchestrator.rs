//! Concurrent per-file extraction with ordered reassembly

use futures_util::future::join_all;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::markers::{error_marker, unsupported_marker, EXTRACTION_PROMPT, PAGE_SEPARATOR};
use crate::providers::MultimodalProvider;
use crate::storage::{with_scoped_file, UploadStore};
use crate::types::{BatchExtractionResult, ExtractionOutcome, FilePayload, UploadedFile};

/// Fans a batch of uploads out to the multimodal provider
pub struct ExtractionOrchestrator {
    provider: Arc<dyn MultimodalProvider>,
    store: Arc<dyn UploadStore>,
}

impl ExtractionOrchestrator {
    pub fn new(provider: Arc<dyn MultimodalProvider>, store: Arc<dyn UploadStore>) -> Self {
        Self { provider, store }
    }

    /// Extract text from every file concurrently.
    ///
    /// All files settle before the result is assembled; a failing file
    /// becomes an inline marker and never cancels its siblings. Outcomes are
    /// joined in input order regardless of completion order, and every file
    /// is released exactly once. An empty batch yields an empty result.
    pub async fn extract_batch(
        &self,
        files: &[UploadedFile],
        credential_index: Option<usize>,
        model: &str,
    ) -> BatchExtractionResult {
        if files.is_empty() {
            tracing::debug!("Empty extraction batch, nothing to do");
            return BatchExtractionResult::default();
        }

        tracing::info!(
            "Extracting text from {} files (model: {}, key slot: {})",
            files.len(),
            model,
            credential_index.unwrap_or(0)
        );

        let outcomes = join_all(
            files
                .iter()
                .map(|file| self.extract_file(file, credential_index, model)),
        )
        .await;

        BatchExtractionResult::from_outcomes(outcomes, PAGE_SEPARATOR)
    }

    /// Extract a single file and release it.
    ///
    /// Never fails: any problem, including a panic while processing, ends up
    /// as an inline marker in the outcome text.
    pub async fn extract_file(
        &self,
        file: &UploadedFile,
        credential_index: Option<usize>,
        model: &str,
    ) -> ExtractionOutcome {
        tracing::info!("Processing file: {} ({} bytes)", file.original_name, file.size_bytes);

        let scoped = with_scoped_file(self.store.as_ref(), file, || {
            self.extract_text(file, credential_index, model)
        });

        let text = match AssertUnwindSafe(scoped).catch_unwind().await {
            Ok(text) => text,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("Panic while processing '{}': {}", file.original_name, message);
                error_marker(&file.original_name, &message)
            }
        };

        ExtractionOutcome {
            filename: file.original_name.clone(),
            text,
        }
    }

    async fn extract_text(
        &self,
        file: &UploadedFile,
        credential_index: Option<usize>,
        model: &str,
    ) -> String {
        if !file.is_supported() {
            tracing::warn!(
                "Skipping unsupported file type: {} ({})",
                file.original_name,
                file.mime_type
            );
            return unsupported_marker(&file.original_name);
        }

        let data = match self.store.read(&file.storage_path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to read '{}': {}", file.original_name, e);
                return error_marker(&file.original_name, &e.to_string());
            }
        };
        let payload = FilePayload::new(file.mime_type.clone(), data);

        match self
            .provider
            .generate(EXTRACTION_PROMPT, Some(&payload), credential_index, model)
            .await
        {
            Ok(text) => {
                tracing::info!(
                    "Extracted text from '{}' ({} chars)",
                    file.original_name,
                    text.chars().count()
                );
                tracing::debug!("--- {} ---\n{}\n--- end ---", file.original_name, text);
                text
            }
            Err(failure) => {
                tracing::error!(
                    "Error processing '{}' via {}: {}",
                    file.original_name,
                    self.provider.name(),
                    failure.error
                );
                error_marker(&file.original_name, &failure.error)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic".to_string()
    }
}
