//! S3-compatible storage client
//!
//! Backs the [`ObjectStore`] port with a single rust-s3 bucket. Works against
//! MinIO and any hosted storage exposing the S3 protocol.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::object_store::{ObjectStore, StoredObject};

/// S3-compatible storage client
pub struct StorageClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    key_prefix: String,
}

impl StorageClient {
    /// Create a new storage client from configuration
    pub fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create bucket handle: {}", e)))?;

        // Path-style URLs (http://endpoint/bucket/key instead of http://bucket.endpoint/key)
        bucket.set_path_style();

        info!(
            "Storage client initialized for endpoint: {}, bucket: {}, key_prefix: {}",
            config.endpoint,
            bucket.name(),
            config.key_prefix
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            key_prefix: config.key_prefix,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<()> {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    // Hosted backends often forbid bucket creation for scoped keys
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn url_base(endpoint: &str, bucket: &str) -> String {
        format!("{}/{}/", endpoint, bucket)
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(AppError::Storage(format!(
                "Upload of '{}' rejected with status {}",
                key, status
            )));
        }

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}{}",
            Self::url_base(&self.public_endpoint, &self.bucket.name()),
            key
        )
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut failed = Vec::new();

        for key in keys {
            match self.bucket.delete_object(key).await {
                Ok(response) if (200..300).contains(&response.status_code()) => {
                    debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
                }
                Ok(response) if response.status_code() == 404 => {
                    debug!("Object '{}' was already gone", key);
                }
                Ok(response) => {
                    failed.push(format!("{} (status {})", key, response.status_code()));
                }
                Err(e) => failed.push(format!("{} ({})", key, e)),
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(AppError::Storage(format!(
                "Failed to remove objects: {}",
                failed.join(", ")
            )))
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let pages = self
            .bucket
            .list(prefix.to_string(), None)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to list '{}': {}", prefix, e)))?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| StoredObject {
                key: object.key,
                size: object.size,
                last_modified: Some(object.last_modified),
            })
            .collect())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        extract_key(
            url,
            &[
                Self::url_base(&self.public_endpoint, &bucket),
                Self::url_base(&self.endpoint, &bucket),
            ],
        )
    }

    fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

/// Strip the first matching base from `url`, drop any query string and decode the rest
pub(crate) fn extract_key(url: &str, bases: &[String]) -> Option<String> {
    let rest = bases.iter().find_map(|base| url.strip_prefix(base.as_str()))?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    if rest.is_empty() {
        return None;
    }
    urlencoding::decode(rest).ok().map(|key| key.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases() -> Vec<String> {
        vec![
            "https://cdn.example.com/photos/".to_string(),
            "http://localhost:9000/photos/".to_string(),
        ]
    }

    #[test]
    fn test_extract_key_from_public_url() {
        assert_eq!(
            extract_key(
                "https://cdn.example.com/photos/photos/hero/1-abc.jpg",
                &bases()
            ),
            Some("photos/hero/1-abc.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_key_strips_query_and_decodes() {
        assert_eq!(
            extract_key(
                "http://localhost:9000/photos/photos/store_photo/a%20b.png?v=2",
                &bases()
            ),
            Some("photos/store_photo/a b.png".to_string())
        );
    }

    #[test]
    fn test_extract_key_rejects_foreign_urls() {
        assert_eq!(
            extract_key("https://images.unsplash.com/photo-1.jpg", &bases()),
            None
        );
        assert_eq!(extract_key("https://cdn.example.com/photos/", &bases()), None);
    }
}
