use crate::infrastructure::{DiaryRepository, HookRegistry, WriteContext};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the diary slot as `<data_dir>/<key>.xml`.
pub struct FileSystemRepository {
    data_dir: PathBuf,
    key: String,
    hook_registry: HookRegistry,
}

impl FileSystemRepository {
    pub fn new(data_dir: PathBuf, key: impl Into<String>) -> Self {
        Self::with_hooks(data_dir, key, HookRegistry::new())
    }

    pub fn with_hooks(data_dir: PathBuf, key: impl Into<String>, hook_registry: HookRegistry) -> Self {
        Self {
            data_dir,
            key: key.into(),
            hook_registry,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.xml", self.key))
    }
}

impl DiaryRepository for FileSystemRepository {
    fn load(&self) -> Result<Option<String>> {
        let path = self.storage_path();

        if !path.exists() {
            debug!("No diary stored at {}", path.display());
            return Ok(None);
        }

        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                // Decoded lossily; the codec decides whether anything survives.
                warn!("{} is not valid UTF-8: {}", path.display(), e.utf8_error());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(content))
    }

    fn save(&self, xml: &str) -> Result<()> {
        let path = self.storage_path();

        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        // Write beside the target and rename over it so readers never see half a file.
        let mut staged = NamedTempFile::new_in(&self.data_dir)
            .context("Failed to create temporary diary file")?;
        staged.write_all(xml.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes to {}", xml.len(), path.display());

        // Call write hooks after successful write
        let context = WriteContext {
            key: self.key.clone(),
            storage_path: path,
            data_dir: self.data_dir.clone(),
            content: xml.to_string(),
        };
        self.hook_registry.execute_write_hooks(&context);

        Ok(())
    }

    fn key(&self) -> &str {
        &self.key
    }
}
