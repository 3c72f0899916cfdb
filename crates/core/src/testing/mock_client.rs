//! Mock catalog client for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CatalogClient, CatalogItem, Connectivity, FetchError};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedFetch {
    Popular { page: u32 },
    Search { query: String, page: u32 },
}

/// Mock implementation of the [`CatalogClient`] trait.
///
/// Provides controllable behavior for testing:
/// - scripted result pages per request
/// - optional per-class delays to keep a fetch in flight
/// - one-shot error injection
/// - records every fetch for assertions
///
/// Unscripted pages resolve to an empty page, the remote's way of saying
/// the feed is exhausted.
pub struct MockCatalogClient {
    popular_pages: Arc<RwLock<HashMap<u32, Vec<CatalogItem>>>>,
    search_pages: Arc<RwLock<HashMap<(String, u32), Vec<CatalogItem>>>>,
    popular_delay: Arc<RwLock<Option<Duration>>>,
    search_delay: Arc<RwLock<Option<Duration>>>,
    next_error: Arc<RwLock<Option<FetchError>>>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self {
            popular_pages: Arc::new(RwLock::new(HashMap::new())),
            search_pages: Arc::new(RwLock::new(HashMap::new())),
            popular_delay: Arc::new(RwLock::new(None)),
            search_delay: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            fetches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Script the result for a popular page.
    pub async fn set_popular_page(&self, page: u32, items: Vec<CatalogItem>) {
        self.popular_pages.write().await.insert(page, items);
    }

    /// Script the result for a search page.
    pub async fn set_search_page(&self, query: &str, page: u32, items: Vec<CatalogItem>) {
        self.search_pages
            .write()
            .await
            .insert((query.to_string(), page), items);
    }

    /// Delay every popular fetch, keeping it observably in flight.
    pub async fn set_popular_delay(&self, delay: Duration) {
        *self.popular_delay.write().await = Some(delay);
    }

    /// Delay every search fetch, keeping it observably in flight.
    pub async fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.write().await = Some(delay);
    }

    /// Fail the next fetch with the given error.
    pub async fn fail_next(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Every fetch made so far, in order.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Total number of fetches made so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    async fn take_error(&self) -> Option<FetchError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn fetch_popular(&self, page: u32) -> Result<Vec<CatalogItem>, FetchError> {
        self.fetches
            .write()
            .await
            .push(RecordedFetch::Popular { page });

        let delay = *self.popular_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        Ok(self
            .popular_pages
            .read()
            .await
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<CatalogItem>, FetchError> {
        self.fetches.write().await.push(RecordedFetch::Search {
            query: query.to_string(),
            page,
        });

        let delay = *self.search_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        Ok(self
            .search_pages
            .read()
            .await
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }
}

/// Connectivity probe with a settable state.
pub struct MockConnectivity {
    connected: AtomicBool,
}

impl MockConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Connectivity for MockConnectivity {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
