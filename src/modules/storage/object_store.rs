//! Object store port used by the photo services
//!
//! The photo transaction code only talks to this trait, so tests can swap the
//! S3 bucket for an in-memory double.

use async_trait::async_trait;

use crate::core::error::Result;

/// One entry returned by [`ObjectStore::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`. Fails with `AppError::Storage` when rejected.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Publicly reachable URL for `key`
    fn public_url(&self, key: &str) -> String;

    /// Remove every key in `keys`. Keys that are already gone count as removed.
    async fn remove(&self, keys: &[String]) -> Result<()>;

    /// List every object whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>>;

    /// Reverse of [`ObjectStore::public_url`]. `None` for URLs outside this store.
    fn key_from_url(&self, url: &str) -> Option<String>;

    /// Prefix every photo key is created under
    fn key_prefix(&self) -> &str;
}
