//! App-local recipe image library.
//!
//! A picked image is copied into the library directory and only the copy's
//! path is stored on the recipe. Image bytes are never uploaded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;

/// Copies a user-selected image into app-local storage.
#[async_trait]
pub trait ImageImporter: Send + Sync {
    /// Copy `source` and return the path of the stored copy.
    async fn import(&self, source: &Path) -> Result<String, CoreError>;
}

/// Directory-backed image library.
#[derive(Debug, Clone)]
pub struct LocalImageLibrary {
    root: PathBuf,
}

impl LocalImageLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a stored image path still points at a file on this device.
    pub async fn exists(path: &str) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Target path for a copy of `file_name`.
    ///
    /// The name is prefixed with a fresh id so that two sources sharing a
    /// file name never overwrite each other.
    fn target_for(&self, file_name: &str) -> PathBuf {
        self.root.join(format!("{}-{file_name}", Uuid::now_v7()))
    }
}

#[async_trait]
impl ImageImporter for LocalImageLibrary {
    async fn import(&self, source: &Path) -> Result<String, CoreError> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Image source {} has no file name",
                    source.display()
                ))
            })?;

        match tokio::fs::metadata(source).await {
            Ok(meta) if meta.is_file() => {}
            _ => {
                return Err(CoreError::NotFound {
                    entity: "image",
                    id: source.display().to_string(),
                })
            }
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            CoreError::Internal(format!(
                "Cannot create image directory {}: {e}",
                self.root.display()
            ))
        })?;

        let target = self.target_for(file_name);
        tokio::fs::copy(source, &target).await.map_err(|e| {
            tracing::error!(source = %source.display(), error = %e, "Failed to copy image");
            CoreError::Internal(format!("Failed to save the image locally: {e}"))
        })?;

        tracing::debug!(target = %target.display(), "Image imported");
        Ok(target.to_string_lossy().into_owned())
    }
}
