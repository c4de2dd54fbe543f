//! Uploaded file handles and the payloads sent to the multimodal provider

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file received by the upload layer and staged on local storage.
///
/// The handle is owned by the request that staged it; the backing bytes stay
/// at `storage_path` until the extraction pipeline releases them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Filename as supplied by the client
    pub original_name: String,
    /// Where the staged bytes live
    pub storage_path: PathBuf,
    /// Declared mime type
    pub mime_type: String,
    /// Size of the staged bytes
    pub size_bytes: u64,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        storage_path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            storage_path: storage_path.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Images and PDFs can be sent for text extraction; anything else cannot.
    pub fn is_supported(&self) -> bool {
        is_supported_mime(&self.mime_type)
    }
}

/// Check whether a mime type is accepted by the extraction pipeline
pub fn is_supported_mime(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_ascii_lowercase();
    mime.starts_with("image/") || mime == "application/pdf"
}

/// Binary file content attached to a multimodal prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FilePayload {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Base64 encoding used on the wire
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}
