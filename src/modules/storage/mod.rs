//! Storage module for photo objects
//!
//! Provides the object store port, its S3-compatible implementation and a
//! reachability probe for image URLs hosted elsewhere.

mod object_store;
mod storage_client;
mod url_probe;

pub use object_store::{ObjectStore, StoredObject};
pub use storage_client::StorageClient;
pub use url_probe::{HttpUrlProbe, UrlProbe};
