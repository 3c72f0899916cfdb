//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing controller and client tests without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockCatalogClient};
//!
//! let client = MockCatalogClient::new();
//! client.set_popular_page(1, fixtures::item_page(1, 3)).await;
//!
//! // Use in a CatalogController...
//! ```

mod mock_client;
mod mock_favorites;

pub use mock_client::{MockCatalogClient, MockConnectivity, RecordedFetch};
pub use mock_favorites::MockFavoritesStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogItem;

    /// Create a test catalog item with reasonable defaults.
    pub fn catalog_item(id: u64, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            title: title.to_string(),
            summary: format!("A film about {}.", title.to_lowercase()),
            image_ref: Some(format!("/poster-{}.jpg", id)),
            release_label: "2024-06-15".to_string(),
            rating_average: 7.5,
            rating_count: 1200,
            popularity: 88.1,
        }
    }

    /// A page of `count` sequentially-numbered items starting at
    /// `first_id`.
    pub fn item_page(first_id: u64, count: usize) -> Vec<CatalogItem> {
        (0..count as u64)
            .map(|i| catalog_item(first_id + i, &format!("Item {}", first_id + i)))
            .collect()
    }
}
