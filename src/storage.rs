// SPDX-License-Identifier: GPL-3.0-only

//! Gallery storage used by the review screen
//!
//! The capture session never touches the gallery. The review screen hands a
//! captured path to a [`MediaLibrary`], which persists it.

use crate::errors::{AppError, AppResult};
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persists captured media into the system gallery
pub trait MediaLibrary: Send + Sync {
    /// Save the file at `path` and return its location in the gallery
    fn save_to_library<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, AppResult<PathBuf>>;
}

/// Gallery backed by a plain directory
#[derive(Debug, Clone)]
pub struct GalleryDirectory {
    root: PathBuf,
}

impl GalleryDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaLibrary for GalleryDirectory {
    fn save_to_library<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, AppResult<PathBuf>> {
        Box::pin(async move {
            let file_name = path
                .file_name()
                .ok_or_else(|| AppError::Storage(format!("not a file: {}", path.display())))?;

            tokio::fs::create_dir_all(&self.root).await?;
            let target = self.root.join(file_name);
            tokio::fs::copy(path, &target).await?;

            info!(path = %target.display(), "Saved to gallery");
            Ok(target)
        })
    }
}

/// Delete a capture the user discarded on the review screen
pub async fn discard_capture(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Capture discarded");
            Ok(())
        }
        // Already gone is as good as deleted
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Most recently modified JPEG or PNG in `dir`
pub async fn latest_photo(dir: PathBuf) -> Option<PathBuf> {
    tokio::task::spawn_blocking(move || {
        let entries = std::fs::read_dir(&dir).ok()?;
        entries
            .flatten()
            .filter(|entry| {
                entry.path().extension().is_some_and(|ext| {
                    let ext = ext.to_string_lossy();
                    ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("png")
                })
            })
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, entry.path()))
            })
            .max_by_key(|(modified, _)| *modified)
            .map(|(_, path)| path)
    })
    .await
    .ok()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obscura-storage-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_save_copies_into_gallery() {
        let dir = scratch_dir("save");
        let source = dir.join("IMG_1.jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        let gallery = GalleryDirectory::new(dir.join("gallery"));
        let saved = gallery.save_to_library(&source).await.unwrap();

        assert_eq!(saved, dir.join("gallery").join("IMG_1.jpg"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"jpeg");
        assert_eq!(latest_photo(dir.join("gallery")).await, Some(saved));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_discard_is_idempotent() {
        let dir = scratch_dir("discard");
        let source = dir.join("IMG_2.jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        discard_capture(&source).await.unwrap();
        assert!(!source.exists());
        discard_capture(&source).await.unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_latest_photo_in_missing_dir() {
        assert_eq!(latest_photo(PathBuf::from("/nonexistent/obscura")).await, None);
    }
}
