//! Persisted favorites.
//!
//! The store owns favorite records exclusively: at most one record per
//! item id, snapshotting the item's fields at the moment it was added.
//! Each mutation is atomic and durable before it returns, so callers can
//! read the store back immediately to reconcile display state.

mod sqlite;

pub use sqlite::SqliteFavoritesStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::CatalogItem;

/// Error type for favorites store operations.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Underlying storage failed.
    #[error("favorites persistence failed: {0}")]
    Persistence(String),
}

/// A favorited item with the moment it was added.
///
/// `added_at` orders display only; membership is keyed by `item.id`.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteRecord {
    pub item: CatalogItem,
    pub added_at: DateTime<Utc>,
}

/// Trait for favorites storage backends.
pub trait FavoritesStore: Send + Sync {
    /// Add an item, snapshotting its fields. Replaces any existing record
    /// for the same id, refreshing its recency.
    fn insert(&self, item: &CatalogItem) -> Result<(), FavoritesError>;

    /// Remove by id. Returns whether a record was removed.
    fn delete(&self, id: u64) -> Result<bool, FavoritesError>;

    /// Whether a record exists for `id`.
    fn exists(&self, id: u64) -> Result<bool, FavoritesError>;

    /// All favorite records, most recently added first.
    fn records_recent_first(&self) -> Result<Vec<FavoriteRecord>, FavoritesError>;

    /// All favorited items, most recently added first.
    fn list_recent_first(&self) -> Result<Vec<CatalogItem>, FavoritesError> {
        Ok(self
            .records_recent_first()?
            .into_iter()
            .map(|r| r.item)
            .collect())
    }
}
