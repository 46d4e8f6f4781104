// Local filesystem adapter - Directory walking and file metadata

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::domain::errors::*;
use crate::ports::FsPort;

/// Filesystem adapter over the local disk
#[derive(Debug, Default, Clone)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Depth-first listing; within a directory files sort before subdirectories
    fn walk_sorted(root: &Path) -> Vec<PathBuf> {
        let is_dir = |entry: &DirEntry| entry.file_type().is_dir();

        WalkDir::new(root)
            .sort_by(move |a, b| {
                is_dir(a)
                    .cmp(&is_dir(b))
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .collect()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, DomainError> {
        if !root.is_dir() {
            return Err(DomainError::FsFail(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || Self::walk_sorted(&root))
            .await
            .map_err(|e| DomainError::InternalError(format!("Directory walk failed: {}", e)))
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn directory_exists(&self, path: &Path) -> Result<bool, DomainError> {
        Ok(tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_walk_lists_files_before_subdirectories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a_season")).unwrap();
        fs::create_dir_all(root.join("b_extras/nested")).unwrap();
        fs::write(root.join("z_movie.mkv"), b"z").unwrap();
        fs::write(root.join("m_movie.mkv"), b"m").unwrap();
        fs::write(root.join("a_season/e02.mkv"), b"2").unwrap();
        fs::write(root.join("a_season/e01.mkv"), b"1").unwrap();
        fs::write(root.join("b_extras/nested/deep.mkv"), b"d").unwrap();
        fs::write(root.join("b_extras/trailer.mkv"), b"t").unwrap();

        let files = LocalFsAdapter::new().walk(root).await.unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(
            relative,
            vec![
                "m_movie.mkv",
                "z_movie.mkv",
                "a_season/e01.mkv",
                "a_season/e02.mkv",
                "b_extras/trailer.mkv",
                "b_extras/nested/deep.mkv",
            ]
        );
    }

    #[tokio::test]
    async fn test_walk_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let result = LocalFsAdapter::new().walk(&temp.path().join("missing")).await;
        assert!(matches!(result, Err(DomainError::FsFail(_))));
    }

    #[tokio::test]
    async fn test_file_size_and_directory_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("movie.mkv");
        fs::write(&file, vec![0u8; 2048]).unwrap();

        let fs_adapter = LocalFsAdapter::new();
        assert_eq!(fs_adapter.file_size(&file).await.unwrap(), 2048);
        assert!(fs_adapter.directory_exists(temp.path()).await.unwrap());
        assert!(!fs_adapter.directory_exists(&file).await.unwrap());
    }
}
