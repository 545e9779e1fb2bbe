//! Local file storage for menu item images.
//!
//! Uploaded images are stored under a flat directory with a random
//! prefix so distinct uploads of the same filename never collide. The
//! directory is served statically at `/images`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{BistroError, BistroResult};

/// Handle to the image upload directory.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Open the store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> BistroResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| BistroError::Internal(format!("Failed to create upload dir: {}", e)))?;
        Ok(Self { dir })
    }

    /// The directory images are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store uploaded bytes, returning the stored filename.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> BistroResult<String> {
        let stored = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(original_name)
        );

        tokio::fs::write(self.dir.join(&stored), bytes)
            .await
            .map_err(|e| BistroError::Internal(format!("Failed to store image: {}", e)))?;

        Ok(stored)
    }

    /// Remove a stored image. Best-effort: a missing file is not an
    /// error, the row it belonged to is already gone.
    pub async fn remove(&self, stored: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(stored)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(file = %stored, error = %e, "Failed to remove image");
            }
        }
    }

    /// Public URL for a stored filename.
    pub fn url_for(stored: &str) -> String {
        format!("/images/{}", stored)
    }
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path()).unwrap();

        let stored = store.save("dish.png", b"fake-png-bytes").await.unwrap();
        assert!(stored.ends_with("_dish.png"));

        let on_disk = store.dir().join(&stored);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"fake-png-bytes");

        store.remove(&stored).await;
        assert!(!on_disk.exists());

        // Removing again is a no-op.
        store.remove(&stored).await;
    }

    #[tokio::test]
    async fn test_same_name_never_collides() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path()).unwrap();

        let a = store.save("dish.png", b"a").await.unwrap();
        let b = store.save("dish.png", b"b").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("dish.png"), "dish.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\dish.png"), "dish.png");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_url_for() {
        assert_eq!(ImageStore::url_for("abc_dish.png"), "/images/abc_dish.png");
    }
}
