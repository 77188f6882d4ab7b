//! Durable storage for the document text.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Errors reading or writing the durable copy.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error for the given path.
    Io(PathBuf, io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
        }
    }
}

/// Where the authoritative document text is persisted.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the stored text; `None` if nothing has been stored yet.
    async fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored text, creating the store if needed.
    async fn write(&self, text: &str) -> Result<(), StoreError>;
}

/// Stores the document as a UTF-8 file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(self.path.clone(), e)),
        }
    }

    async fn write(&self, text: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
            }
        }
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| StoreError::Io(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("note.md"));

        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data").join("nested").join("note.md");
        let store = FileStore::new(&path);

        store.write("# Hello\n").await.unwrap();

        assert_eq!(store.read().await.unwrap().as_deref(), Some("# Hello\n"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Hello\n");
    }

    #[tokio::test]
    async fn test_read_error_names_path() {
        let temp_dir = tempdir().unwrap();
        // a directory can't be read as a file
        let store = FileStore::new(temp_dir.path());

        let err = store.read().await.unwrap_err();
        assert!(err.to_string().contains(&temp_dir.path().display().to_string()));
    }
}
