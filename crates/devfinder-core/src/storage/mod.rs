//! Tab-scoped key-value storage and the search-session gateway on top of it.

pub mod file;
pub mod memory;
pub mod session;

pub use file::FileTabStorage;
pub use memory::MemoryStorage;
pub use session::{PersistenceGateway, TeardownSignal, SESSION_STORAGE_KEY};

use async_trait::async_trait;

use crate::error::StorageError;

/// Key-value storage whose lifetime is bound to one tab.
///
/// Values are opaque strings; the gateway stores JSON documents.
#[async_trait]
pub trait TabStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
