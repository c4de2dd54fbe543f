//! Storage of uploaded files between intake and extraction
//!
//! Uploads are staged on local disk by the HTTP layer and released by the
//! extraction pipeline once each file has been processed.

pub mod scoped;
pub mod staging;

pub use scoped::{release_all, with_scoped_file};
pub use staging::stage_upload;

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

/// Outcome of releasing a staged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The file existed and was deleted
    Removed,
    /// Nothing was at the path; treated as a no-op
    AlreadyGone,
}

/// Backing store for staged uploads
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Read the full contents of a staged file
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Delete a staged file. Releasing a missing path is not an error.
    async fn release(&self, path: &Path) -> Result<Release>;
}

/// Upload store on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalUploadStore;

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn release(&self, path: &Path) -> Result<Release> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(Release::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Release::AlreadyGone),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_release_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, b"bytes").unwrap();

        let store = LocalUploadStore;
        assert_eq!(store.read(&path).await.unwrap(), b"bytes");
        assert_eq!(store.release(&path).await.unwrap(), Release::Removed);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, b"bytes").unwrap();

        let store = LocalUploadStore;
        tokio_test::assert_ok!(store.release(&path).await);
        assert_eq!(store.release(&path).await.unwrap(), Release::AlreadyGone);
        assert_eq!(
            store.release(&dir.path().join("never-existed.pdf")).await.unwrap(),
            Release::AlreadyGone
        );
    }

    #[tokio::test]
    async fn test_release_of_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalUploadStore.release(dir.path()).await.is_err());
    }
}
