//! Media store: filesystem-backed storage for uploaded product images.
//!
//! Images travel as base64 strings embedded in JSON. The store decodes them,
//! writes them under a configured directory with a collision-resistant
//! generated name, and builds the public URLs embedded in API responses.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted image-extension length.
const MAX_EXTENSION_LENGTH: usize = 8;

/// Errors from the media store.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The referenced image file does not exist.
    #[error("image not found: {0}")]
    NotFound(String),

    /// The payload, extension, or filename failed validation.
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    /// Create a media store rooted at `dir`.
    ///
    /// The directory is not created here; call [`Self::ensure_dir`] during
    /// startup.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory images are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Decode a base64 payload and write it under a generated filename.
    ///
    /// Returns the stored filename. Names are `product-<uuid>.<ext>`, so two
    /// uploads in the same instant cannot collide.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidPayload` if the base64 or the extension is
    /// malformed, `MediaError::Io` if the write fails.
    pub async fn save(&self, base64_payload: &str, extension: &str) -> Result<String, MediaError> {
        validate_extension(extension)?;

        let bytes = BASE64
            .decode(base64_payload)
            .map_err(|e| MediaError::InvalidPayload(format!("invalid base64 image data: {e}")))?;
        if bytes.is_empty() {
            return Err(MediaError::InvalidPayload("empty image data".to_owned()));
        }

        let filename = format!("product-{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        Ok(filename)
    }

    /// Remove a stored image file.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::NotFound` if the file does not exist,
    /// `MediaError::InvalidPayload` if the filename is not a bare name,
    /// `MediaError::Io` for other filesystem failures.
    pub async fn delete(&self, filename: &str) -> Result<(), MediaError> {
        validate_filename(filename)?;

        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(filename.to_owned()))
            }
            Err(e) => Err(MediaError::Io(e)),
        }
    }

    /// Build the absolute public URL for a stored filename.
    #[must_use]
    pub fn url(base_url: &str, filename: &str) -> String {
        format!("{}/media/{filename}", base_url.trim_end_matches('/'))
    }
}

/// Extensions must be short and alphanumeric ("png", "jpeg", ...).
fn validate_extension(extension: &str) -> Result<(), MediaError> {
    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LENGTH
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(MediaError::InvalidPayload(format!(
            "invalid image extension: {extension:?}"
        )));
    }
    Ok(())
}

/// Stored filenames are bare names; anything path-like is rejected before it
/// reaches the filesystem.
fn validate_filename(filename: &str) -> Result<(), MediaError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(MediaError::InvalidPayload(format!(
            "invalid image filename: {filename:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_writes_decoded_bytes() {
        let (_dir, store) = store();

        let payload = BASE64.encode(b"fake png bytes");
        let filename = store.save(&payload, "png").await.unwrap();

        assert!(filename.starts_with("product-"));
        assert!(filename.ends_with(".png"));

        let on_disk = std::fs::read(store.dir().join(&filename)).unwrap();
        assert_eq!(on_disk, b"fake png bytes");
    }

    #[tokio::test]
    async fn test_save_generates_unique_names() {
        let (_dir, store) = store();

        let payload = BASE64.encode(b"bytes");
        let a = store.save(&payload, "png").await.unwrap();
        let b = store.save(&payload, "png").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_base64() {
        let (_dir, store) = store();

        let err = store.save("not!!base64", "png").await.unwrap_err();
        assert!(matches!(err, MediaError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_bad_extension() {
        let (_dir, store) = store();

        let payload = BASE64.encode(b"bytes");
        assert!(store.save(&payload, "").await.is_err());
        assert!(store.save(&payload, "p/ng").await.is_err());
        assert!(store.save(&payload, "absurdlylong").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (_dir, store) = store();

        let payload = BASE64.encode(b"bytes");
        let filename = store.save(&payload, "png").await.unwrap();

        store.delete(&filename).await.unwrap();
        assert!(!store.dir().join(&filename).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let (_dir, store) = store();

        let err = store.delete("product-nope.png").await.unwrap_err();
        assert!(matches!(err, MediaError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_rejects_path_traversal() {
        let (_dir, store) = store();

        let err = store.delete("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, MediaError::InvalidPayload(_)));
    }

    #[test]
    fn test_url_construction() {
        assert_eq!(
            MediaStore::url("http://127.0.0.1:5000", "a.png"),
            "http://127.0.0.1:5000/media/a.png"
        );
        assert_eq!(
            MediaStore::url("https://shop.example.com/", "a.png"),
            "https://shop.example.com/media/a.png"
        );
    }
}
