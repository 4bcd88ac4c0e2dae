//! Key-value persistence.
//!
//! Everything the dashboard keeps is two JSON documents under fixed keys, so the storage seam is a
//! plain string map. [`leave_store::LeaveStore`] layers the typed records on top.

pub mod cache;
pub mod leave_store;
pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use derive_more::Display;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "storage backend error: {}", _0)]
    Backend(String),
    #[display(fmt = "stored value is not valid JSON: {}", _0)]
    Serialization(serde_json::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read that skips any caching layer. Read-modify-write paths use this.
    async fn get_fresh(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// All entries, ordered by key.
    async fn list(&self) -> Result<Vec<(String, String)>, StoreError>;
}
