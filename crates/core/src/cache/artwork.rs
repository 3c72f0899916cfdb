//! Poster artwork fetching through a shared byte cache.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::catalog::FetchError;

use super::BoundedCache;

/// Default maximum number of cached images.
pub const DEFAULT_MAX_IMAGES: usize = 100;

/// Default total size limit for cached image bytes (50 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 50 * 1024 * 1024;

/// Fetches poster bytes by URL, serving repeats from a shared
/// [`BoundedCache`].
///
/// The cache instance is injected so one store can back every loader in
/// the process; the cached cost of an image is its byte length.
pub struct ArtworkLoader {
    client: Client,
    cache: Arc<BoundedCache<String, Vec<u8>>>,
}

impl ArtworkLoader {
    /// Create a loader over the given shared cache.
    pub fn new(cache: Arc<BoundedCache<String, Vec<u8>>>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, cache }
    }

    /// A cache sized with the default artwork limits.
    pub fn default_cache() -> Arc<BoundedCache<String, Vec<u8>>> {
        Arc::new(BoundedCache::new(DEFAULT_MAX_IMAGES, DEFAULT_MAX_IMAGE_BYTES))
    }

    /// Fetch one image, hitting the network only on a cache miss.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(bytes) = self.cache.get(url) {
            debug!(url, bytes = bytes.len(), "artwork cache hit");
            return Ok(bytes);
        }

        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                FetchError::NoConnectivity
            } else {
                FetchError::InvalidResponse(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::InvalidResponse(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?
            .to_vec();

        debug!(url, bytes = bytes.len(), "artwork fetched");
        self.cache
            .set_with_cost(url.to_string(), bytes.clone(), bytes.len() as u64);
        Ok(bytes)
    }

    /// Evict one image.
    pub fn evict(&self, url: &str) {
        self.cache.remove(url);
    }
}
