use std::fs;
use std::path::PathBuf;

use tracing::info;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Decoded upload ready to be written out.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores post images on disk under the configured media root and hands back
/// the relative path that gets recorded on the post.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn save(&self, image: ImageData) -> Result<String, DomainError> {
        let relative = format!("posts/{}-{}", Uuid::new_v4(), sanitize(&image.file_name));
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::Internal(format!("media store: {}", e)))?;
        }
        fs::write(&target, &image.bytes)
            .map_err(|e| DomainError::Internal(format!("media store: {}", e)))?;

        info!(path = %relative, "image stored");
        Ok(relative)
    }
}

/// Keeps only the final path segment and a conservative character set, so a
/// client-supplied name cannot escape the media root.
fn sanitize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_bytes_under_the_posts_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let path = store
            .save(ImageData {
                file_name: "small.gif".into(),
                bytes: vec![0x47, 0x49, 0x46],
            })
            .unwrap();

        assert!(path.starts_with("posts/"));
        assert!(path.ends_with("small.gif"));
        assert_eq!(fs::read(dir.path().join(&path)).unwrap(), vec![0x47, 0x49, 0x46]);
    }

    #[test]
    fn client_supplied_paths_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let path = store
            .save(ImageData {
                file_name: "../../etc/passwd".into(),
                bytes: vec![1],
            })
            .unwrap();

        assert!(path.starts_with("posts/"));
        assert!(path.ends_with("passwd"));
        assert!(dir.path().join(&path).exists());
    }
}
