//! In-memory storage.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::decode_blob;
use super::traits::Storage;
use crate::domain::RevisionStore;
use crate::error::{Result, RevisionError};

/// Keeps the serialized blob in memory.
///
/// The blob is stored as JSON text so it goes through the same encode/decode
/// path as the durable backends.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an arbitrary raw blob, valid or not.
    pub fn with_blob(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Raw blob currently held.
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }

    /// Make every operation fail with a storage error, or stop doing so.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RevisionError::Storage("memory storage unavailable".to_string()));
        }
        self.blob.lock().map_err(|e| RevisionError::Storage(e.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<RevisionStore>> {
        let guard = self.guard()?;
        Ok(guard.as_deref().and_then(|raw| decode_blob(raw, "memory")))
    }

    fn save(&self, store: &RevisionStore) -> Result<()> {
        let json = serde_json::to_string(store)?;
        *self.guard()? = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.guard()? = None;
        Ok(())
    }
}
