use crate::core::Storage;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

/// Files under a base directory.
///
/// Writes go to a temporary sibling that is renamed over the destination, so
/// readers see either the previous document or the new one in full.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

fn replace_file(target: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropping the temp file on an early return removes it.
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

impl Storage for LocalStorage {
    fn location(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = data.to_vec();
        tokio::task::spawn_blocking(move || replace_file(&full_path, &data))
            .await
            .map_err(std::io::Error::other)??;

        Ok(())
    }
}
