//! Product image storage on the local filesystem.
//!
//! Files are stored flat in the upload directory under a random name and
//! served back from `/uploads`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Public URL prefix for stored images.
pub const UPLOADS_ROUTE: &str = "/uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"];

/// Errors raised while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file had no content.
    #[error("Uploaded file is empty")]
    Empty,

    /// The file is not an accepted image type.
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    /// Writing to disk failed.
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Whether the caller sent a bad file, as opposed to a storage failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Empty | Self::UnsupportedType(_))
    }
}

/// Writes uploaded images into a directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store an image and return its public path (`/uploads/<name>`).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Empty` for an empty body,
    /// `UploadError::UnsupportedType` when neither the content type nor the
    /// extension identifies an image, and `UploadError::Io` when the write fails.
    pub async fn save(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let extension = image_extension(file_name, content_type).ok_or_else(|| {
            UploadError::UnsupportedType(
                content_type
                    .or(file_name)
                    .unwrap_or("unknown")
                    .to_string(),
            )
        })?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let stored_name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;

        tracing::info!(file = %stored_name, size = bytes.len(), "Stored product image");
        Ok(format!("{UPLOADS_ROUTE}/{stored_name}"))
    }

    /// Delete a previously stored image by its public path.
    ///
    /// Paths outside `/uploads/`, such as external image URLs, are left
    /// alone. Returns whether a file was removed; failures are logged.
    pub async fn remove(&self, public_path: &str) -> bool {
        let Some(name) = stored_name(public_path) else {
            return false;
        };

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                tracing::info!(file = %name, "Removed product image");
                true
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to remove product image");
                false
            }
        }
    }
}

/// File name behind a `/uploads/<name>` path, if it names a single file.
fn stored_name(public_path: &str) -> Option<&str> {
    let name = public_path
        .strip_prefix(UPLOADS_ROUTE)?
        .strip_prefix('/')?;
    let plain = !name.is_empty() && !matches!(name, "." | "..") && !name.contains(['/', '\\']);
    plain.then_some(name)
}

/// Pick the stored extension from the file name, then the content type.
fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if from_name.is_some() {
        return from_name;
    }

    let subtype = content_type?
        .split(';')
        .next()?
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")?
        .to_owned();

    let extension = match subtype.as_str() {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other if ALLOWED_EXTENSIONS.contains(&other) => other.to_string(),
        // Other image types keep a neutral extension
        _ => "img".to_string(),
    };
    Some(extension)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("Vase.PNG"), None).as_deref(), Some("png"));
        assert_eq!(
            image_extension(Some("photo"), Some("image/jpeg")).as_deref(),
            Some("jpg")
        );
        assert_eq!(
            image_extension(None, Some("image/svg+xml")).as_deref(),
            Some("svg")
        );
        assert_eq!(
            image_extension(Some("scan.tiff"), Some("image/tiff")).as_deref(),
            Some("img")
        );
        assert!(image_extension(Some("notes.txt"), Some("text/plain")).is_none());
        assert!(image_extension(None, None).is_none());
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let path = store
            .save(Some("knife.webp"), Some("image/webp"), b"RIFF....WEBP")
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".webp"));

        let name = path.trim_start_matches("/uploads/");
        let written = tokio::fs::read(store.dir().join(name)).await.unwrap();
        assert_eq!(written, b"RIFF....WEBP");
    }

    #[test]
    fn test_stored_name() {
        assert_eq!(stored_name("/uploads/abc.png"), Some("abc.png"));
        assert_eq!(stored_name("/uploads/../database.sqlite"), None);
        assert_eq!(stored_name("/uploads/"), None);
        assert_eq!(stored_name("/uploadsabc.png"), None);
        assert_eq!(stored_name("https://cdn.example.com/uploads/abc.png"), None);
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let path = store
            .save(Some("vase.png"), Some("image/png"), b"\x89PNG")
            .await
            .unwrap();
        assert!(store.remove(&path).await);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        assert!(!store.remove(&path).await);
        assert!(!store.remove("https://lh3.googleusercontent.com/vase.png").await);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        assert!(matches!(
            store.save(Some("a.png"), Some("image/png"), b"").await,
            Err(UploadError::Empty)
        ));
        let err = store
            .save(Some("a.exe"), Some("application/octet-stream"), b"MZ")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
