//! Scoped release of staged uploads

use futures_util::future::join_all;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use super::{Release, UploadStore};
use crate::types::UploadedFile;

/// Run `action` for `file`, then release the file's storage.
///
/// The release happens exactly once, after `action` finishes, whether it
/// returned normally (including returning an error value) or panicked. A
/// panic is re-raised after the release.
pub async fn with_scoped_file<S, F, Fut, T>(store: &S, file: &UploadedFile, action: F) -> T
where
    S: UploadStore + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let outcome = AssertUnwindSafe(async move { action().await })
        .catch_unwind()
        .await;

    release_path(store, &file.storage_path).await;

    match outcome {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Release every path; true only if each was removed or already gone.
///
/// Used for bulk cleanup when a batch is abandoned before per-file scoping
/// took over.
pub async fn release_all<S>(store: &S, paths: &[PathBuf]) -> bool
where
    S: UploadStore + ?Sized,
{
    let results = join_all(paths.iter().map(|path| release_path(store, path))).await;
    results.into_iter().all(|released| released)
}

async fn release_path<S>(store: &S, path: &Path) -> bool
where
    S: UploadStore + ?Sized,
{
    match store.release(path).await {
        Ok(Release::Removed) => {
            tracing::debug!("Released upload {}", path.display());
            true
        }
        Ok(Release::AlreadyGone) => {
            tracing::debug!("Upload {} already released", path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Failed to release upload {}: {}", path.display(), e);
            false
        }
    }
}
