//! Avatar Storage Service
//!
//! Writes uploaded avatar images to a local directory and hands back the
//! public URL stored on the user record. The directory is expected to be
//! served statically by the HTTP layer.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::error::AppError;
use crate::utils::security::generate_secure_token;
use uuid::Uuid;

/// Content types accepted for avatar uploads, with their file extensions
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
];

/// Custom error types for avatar storage
#[derive(Error, Debug)]
pub enum AvatarStorageError {
    /// Upload had a content type outside the allow-list
    #[error("Unsupported avatar content type: {0}")]
    UnsupportedType(String),

    /// Upload exceeded the configured size cap
    #[error("Avatar exceeds maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    /// File name failed the traversal guard
    #[error("Invalid avatar file name")]
    InvalidFileName,

    /// Filesystem operation failed
    #[error("Avatar storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AvatarStorageError> for AppError {
    fn from(err: AvatarStorageError) -> Self {
        match err {
            AvatarStorageError::UnsupportedType(_)
            | AvatarStorageError::TooLarge { .. }
            | AvatarStorageError::InvalidFileName => AppError::Validation(err.to_string()),
            AvatarStorageError::Io(e) => AppError::Internal(format!("Avatar storage error: {}", e)),
        }
    }
}

/// Result type for avatar storage operations
pub type AvatarStorageResult<T> = Result<T, AvatarStorageError>;

/// A stored avatar file
#[derive(Debug, Clone)]
pub struct StoredAvatar {
    /// File name under the avatar directory
    pub file_name: String,

    /// Public URL for the file
    pub url: String,
}

/// Local-directory blob storage for avatar images
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl AvatarStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: String, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    /// Directory avatar files are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an upload content type to a file extension, if accepted
    pub fn extension_for(content_type: &str) -> Option<&'static str> {
        ALLOWED_TYPES
            .iter()
            .find(|(accepted, _)| *accepted == content_type)
            .map(|(_, ext)| *ext)
    }

    /// Store avatar bytes for a user and return the stored file's URL.
    ///
    /// The file name embeds a random component so a re-upload never
    /// overwrites the previous file while it may still be referenced.
    pub async fn store(
        &self,
        user_id: Uuid,
        content_type: &str,
        bytes: &[u8],
    ) -> AvatarStorageResult<StoredAvatar> {
        let extension = Self::extension_for(content_type)
            .ok_or_else(|| AvatarStorageError::UnsupportedType(content_type.to_string()))?;

        if bytes.len() > self.max_bytes {
            return Err(AvatarStorageError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!(
            "{}-{}.{}",
            user_id,
            generate_secure_token(8).to_lowercase(),
            extension
        );
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        let url = format!("{}/{}", self.public_base_url, file_name);
        Ok(StoredAvatar { file_name, url })
    }

    /// Remove a stored avatar file by name.
    ///
    /// Missing files are not an error; the reference may already be stale.
    pub async fn remove(&self, file_name: &str) -> AvatarStorageResult<()> {
        if !is_safe_file_name(file_name) {
            return Err(AvatarStorageError::InvalidFileName);
        }

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Extract the stored file name from an avatar URL issued by this storage
    pub fn file_name_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url.strip_prefix(&self.public_base_url)?.strip_prefix('/')?;
        is_safe_file_name(name).then_some(name)
    }
}

/// Reject separators and parent references so names stay inside the root
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> AvatarStorage {
        let dir = std::env::temp_dir().join(format!("avatar-test-{}", Uuid::new_v4()));
        AvatarStorage::new(dir, "/avatars".to_string(), 1024)
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let storage = test_storage();
        let user_id = Uuid::new_v4();

        let stored = storage
            .store(user_id, "image/png", b"not really a png")
            .await
            .unwrap();

        assert!(stored.file_name.starts_with(&user_id.to_string()));
        assert!(stored.file_name.ends_with(".png"));
        assert_eq!(stored.url, format!("/avatars/{}", stored.file_name));
        assert!(storage.root().join(&stored.file_name).exists());

        storage.remove(&stored.file_name).await.unwrap();
        assert!(!storage.root().join(&stored.file_name).exists());

        // Removing again is fine
        storage.remove(&stored.file_name).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_unsupported_content_type() {
        let storage = test_storage();
        let result = storage
            .store(Uuid::new_v4(), "application/pdf", b"%PDF")
            .await;
        assert!(matches!(
            result,
            Err(AvatarStorageError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_oversized_upload() {
        let storage = test_storage();
        let bytes = vec![0u8; 2048];
        let result = storage.store(Uuid::new_v4(), "image/png", &bytes).await;
        assert!(matches!(result, Err(AvatarStorageError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let storage = test_storage();
        assert!(matches!(
            storage.remove("../etc/passwd").await,
            Err(AvatarStorageError::InvalidFileName)
        ));
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(AvatarStorage::extension_for("image/png"), Some("png"));
        assert_eq!(AvatarStorage::extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(AvatarStorage::extension_for("image/webp"), Some("webp"));
        assert_eq!(AvatarStorage::extension_for("image/gif"), None);
    }

    #[test]
    fn test_file_name_from_url() {
        let storage = test_storage();
        assert_eq!(
            storage.file_name_from_url("/avatars/abc-123.png"),
            Some("abc-123.png")
        );
        assert_eq!(storage.file_name_from_url("/other/abc.png"), None);
        assert_eq!(storage.file_name_from_url("/avatars/../secret"), None);
    }
}
