//! Storage trait definition.

use std::sync::Arc;

use crate::domain::RevisionStore;
use crate::error::Result;

/// Key the revision blob is stored under
pub const STORE_KEY: &str = "tuf_revision_data";

/// Durable home for the single revision blob.
///
/// Implementations replace the blob wholesale on `save`; there are no partial
/// writes. A missing or unreadable blob loads as `None`.
pub trait Storage: Send + Sync {
    /// Load the blob, or `None` when nothing usable is stored.
    fn load(&self) -> Result<Option<RevisionStore>>;

    /// Replace the stored blob.
    fn save(&self, store: &RevisionStore) -> Result<()>;

    /// Delete the stored blob.
    fn clear(&self) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self) -> Result<Option<RevisionStore>> {
        (**self).load()
    }

    fn save(&self, store: &RevisionStore) -> Result<()> {
        (**self).save(store)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn load(&self) -> Result<Option<RevisionStore>> {
        (**self).load()
    }

    fn save(&self, store: &RevisionStore) -> Result<()> {
        (**self).save(store)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
