//! Staging of incoming uploads in the upload directory

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;
use crate::types::UploadedFile;

/// Write an upload into `dir` under a collision-free name.
///
/// The directory is created when missing. The stored name keeps the
/// client's filename for readability; path components are stripped.
pub async fn stage_upload(
    dir: &Path,
    original_name: &str,
    mime_type: &str,
    data: &[u8],
) -> Result<UploadedFile> {
    tokio::fs::create_dir_all(dir).await?;

    let path = staged_path(dir, original_name);
    tokio::fs::write(&path, data).await?;

    Ok(UploadedFile::new(
        original_name,
        path,
        mime_type,
        data.len() as u64,
    ))
}

fn staged_path(dir: &Path, original_name: &str) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    dir.join(format!(
        "{}-{}-{}",
        millis,
        Uuid::new_v4().simple(),
        sanitize_filename(original_name)
    ))
}

/// Keep only the final path component and replace characters that are
/// unsafe in filenames
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "upload".to_string(),
        _ => cleaned,
    }
}
