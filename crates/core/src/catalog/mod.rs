//! Remote catalog access.
//!
//! This module provides the domain item type, a `CatalogClient` trait for
//! fetching one page of the popular listing or of a free-text search, and
//! an HTTP implementation against a TMDB-shaped API.

mod http;
mod types;

pub use http::HttpCatalogClient;
pub use types::CatalogItem;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity probe reported offline, or the connection dropped
    /// mid-call.
    #[error("network is unavailable")]
    NoConnectivity,

    /// The request could not be constructed (bad base URL, page 0, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure or non-2xx status; carries the status and a
    /// body prefix when available.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decoding(String),
}

/// Trait for remote catalog backends.
///
/// One call performs exactly one logical fetch; pagination state lives in
/// the caller.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of the popular listing. Pages start at 1.
    async fn fetch_popular(&self, page: u32) -> Result<Vec<CatalogItem>, FetchError>;

    /// Fetch one page of search results for a free-text query. The
    /// implementation is responsible for encoding the query.
    async fn fetch_search(&self, query: &str, page: u32)
        -> Result<Vec<CatalogItem>, FetchError>;
}

/// Connectivity probe consulted before every fetch attempt.
pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Probe that always reports online.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

impl Connectivity for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}
