//! File writer — create or overwrite files named by file directives.

use shellwright_core::error::ExecutionError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes files relative to a base directory.
///
/// No path policy is applied: whatever name the model picked is written.
/// Parent directories are not created, so a name pointing into a missing
/// directory fails.
#[derive(Debug, Clone, Default)]
pub struct FileWriter {
    /// Base for relative names. `None` = process working directory.
    base_dir: Option<PathBuf>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Where `name` lands on disk.
    pub fn resolve(&self, name: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Write `content` to `name`, truncating any existing file.
    /// Returns the number of bytes written.
    pub async fn write(&self, name: &str, content: &str) -> Result<usize, ExecutionError> {
        let path = self.resolve(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ExecutionError::FileWrite {
                path: Path::new(name).to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(content.len())
    }
}
