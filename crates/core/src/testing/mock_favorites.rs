//! Mock favorites store for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::catalog::CatalogItem;
use crate::favorites::{FavoriteRecord, FavoritesError, FavoritesStore};

/// In-memory mock of the [`FavoritesStore`] trait with one-shot failure
/// injection.
pub struct MockFavoritesStore {
    /// Records, newest first.
    records: Mutex<Vec<FavoriteRecord>>,
    fail_next: AtomicBool,
}

impl MockFavoritesStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Fail the next store operation.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_fail(&self) -> Result<(), FavoritesError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(FavoritesError::Persistence(
                "injected failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for MockFavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStore for MockFavoritesStore {
    fn insert(&self, item: &CatalogItem) -> Result<(), FavoritesError> {
        self.check_fail()?;
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.item.id != item.id);
        records.insert(
            0,
            FavoriteRecord {
                item: item.clone(),
                added_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn delete(&self, id: u64) -> Result<bool, FavoritesError> {
        self.check_fail()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.item.id != id);
        Ok(records.len() != before)
    }

    fn exists(&self, id: u64) -> Result<bool, FavoritesError> {
        self.check_fail()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.item.id == id))
    }

    fn records_recent_first(&self) -> Result<Vec<FavoriteRecord>, FavoritesError> {
        self.check_fail()?;
        Ok(self.records.lock().unwrap().clone())
    }
}
