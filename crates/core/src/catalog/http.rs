//! HTTP catalog backend for a TMDB-shaped API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;

use super::types::PageResponse;
use super::{CatalogClient, CatalogItem, Connectivity, FetchError};

/// HTTP catalog backend.
///
/// Performs exactly one request per call, consulting the connectivity
/// probe first. The API key and query are URL-encoded by this client.
pub struct HttpCatalogClient {
    client: Client,
    config: ApiConfig,
    connectivity: Arc<dyn Connectivity>,
}

impl HttpCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig, connectivity: Arc<dyn Connectivity>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            connectivity,
        }
    }

    /// Build the popular-listing URL for a page.
    fn build_popular_url(&self, page: u32) -> String {
        format!(
            "{}/movie/popular?api_key={}&page={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
            page
        )
    }

    /// Build the search URL for a query and page.
    fn build_search_url(&self, query: &str, page: u32) -> String {
        format!(
            "{}/search/movie?api_key={}&query={}&page={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(query),
            page
        )
    }

    /// Resolve a relative poster path against the image base URL.
    pub fn poster_url(&self, image_ref: &str) -> String {
        format!(
            "{}/{}",
            self.config.image_base_url.trim_end_matches('/'),
            image_ref.trim_start_matches('/')
        )
    }

    /// Issue one page fetch and decode the response.
    async fn fetch_page(&self, url: String) -> Result<Vec<CatalogItem>, FetchError> {
        if !self.connectivity.is_connected() {
            return Err(FetchError::NoConnectivity);
        }

        let url =
            reqwest::Url::parse(&url).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                FetchError::NoConnectivity
            } else {
                FetchError::InvalidResponse(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let page: PageResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decoding(e.to_string()))?;

        Ok(page.results.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_popular(&self, page: u32) -> Result<Vec<CatalogItem>, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        debug!(page, "fetching popular listing");
        self.fetch_page(self.build_popular_url(page)).await
    }

    async fn fetch_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<CatalogItem>, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        debug!(page, query, "fetching search listing");
        self.fetch_page(self.build_search_url(query, page)).await
    }
}
