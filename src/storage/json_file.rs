//! JSON-file storage.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use rand::Rng;

use super::decode_blob;
use super::traits::Storage;
use crate::domain::RevisionStore;
use crate::error::{Result, RevisionError};

/// Stores the revision blob as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a JsonFileStorage at the given file path.
    ///
    /// Parent directories are created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written before the atomic rename.
    ///
    /// Unique per call so concurrent writers never share a temp file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "revisions.json".into());
        let suffix: u32 = rand::rng().random();
        name.push(format!(".{}.{:08x}.tmp", std::process::id(), suffix));
        self.path.with_file_name(name)
    }

    fn storage_err(&self, action: &str, e: std::io::Error) -> RevisionError {
        RevisionError::Storage(format!("Failed to {} {}: {}", action, self.path.display(), e))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<RevisionStore>> {
        if !self.path.exists() {
            debug!("No revision file at {}", self.path.display());
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| self.storage_err("read", e))?;
        Ok(decode_blob(&raw, &self.path.display().to_string()))
    }

    fn save(&self, store: &RevisionStore) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_err("create directory for", e))?;
        }

        let json = serde_json::to_string_pretty(store)?;

        // Write-then-rename so readers never see a half-written file
        let temp = self.temp_path();
        let written = fs::File::create(&temp)
            .and_then(|mut file| {
                file.write_all(json.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(self.storage_err("write", e));
        }

        debug!("Saved {} problems to {}", store.problems.len(), self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.storage_err("remove", e))?;
        }
        Ok(())
    }
}
