pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StreamsError;

pub use file::{default_storage_path, FileStore};
pub use memory::MemoryStore;

impl std::fmt::Debug for dyn KeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore").finish()
    }
}

/// Device-local string key-value storage.
///
/// `multi_set` and `multi_remove` must apply all of their keys in a single
/// write so that paired values never diverge.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StreamsError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StreamsError> {
        self.multi_set(&[(key, value)]).await
    }

    async fn multi_set(&self, pairs: &[(&str, &str)]) -> Result<(), StreamsError>;

    async fn remove(&self, key: &str) -> Result<(), StreamsError> {
        self.multi_remove(&[key]).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StreamsError>;
}
