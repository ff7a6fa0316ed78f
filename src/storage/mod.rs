//! Storage layer for revise.
//!
//! The whole revision store is one JSON blob. Backends only decide where that
//! blob lives:
//! - `JsonFileStorage`: a single JSON file, replaced atomically on save
//! - `SqliteStorage`: a key/value row in an embedded SQLite database
//! - `MemoryStorage`: in-process, for tests and embedding

mod json_file;
mod memory;
mod sqlite;
mod traits;

use log::warn;

use crate::domain::RevisionStore;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::{STORE_KEY, Storage};

/// Parse a raw blob, treating corrupt content as absent.
pub(crate) fn decode_blob(raw: &str, source: &str) -> Option<RevisionStore> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Ignoring corrupt revision data in {}: {}", source, e);
            None
        }
    }
}
