use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// Checks whether an image URL that lives outside the managed bucket still answers
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

/// `HEAD`-request based probe
pub struct HttpUrlProbe {
    client: reqwest::Client,
}

impl HttpUrlProbe {
    const TIMEOUT_SECS: u64 = 10;

    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("EyewearAdmin/1.0 (photo-maintenance)")
            .timeout(Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProbe for HttpUrlProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}
