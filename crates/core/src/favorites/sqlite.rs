//! SQLite-backed favorites store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::catalog::CatalogItem;

use super::{FavoriteRecord, FavoritesError, FavoritesStore};

/// SQLite-backed favorites store.
pub struct SqliteFavoritesStore {
    conn: Mutex<Connection>,
}

impl SqliteFavoritesStore {
    /// Open a store at `path`, creating the database file and table if
    /// needed.
    pub fn new(path: &Path) -> Result<Self, FavoritesError> {
        let conn =
            Connection::open(path).map_err(|e| FavoritesError::Persistence(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, FavoritesError> {
        let conn =
            Connection::open_in_memory().map_err(|e| FavoritesError::Persistence(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), FavoritesError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                summary TEXT NOT NULL,
                image_ref TEXT,
                release_label TEXT NOT NULL,
                rating_average REAL NOT NULL,
                rating_count INTEGER NOT NULL,
                popularity REAL NOT NULL,
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_favorites_added_at ON favorites(added_at);
            "#,
        )
        .map_err(|e| FavoritesError::Persistence(e.to_string()))?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FavoriteRecord> {
        let id: i64 = row.get(0)?;
        let title: String = row.get(1)?;
        let summary: String = row.get(2)?;
        let image_ref: Option<String> = row.get(3)?;
        let release_label: String = row.get(4)?;
        let rating_average: f64 = row.get(5)?;
        let rating_count: u32 = row.get(6)?;
        let popularity: f64 = row.get(7)?;
        let added_at_str: String = row.get(8)?;

        // Timestamps are written by this store; a parse failure means a
        // hand-edited row, fall back to now rather than failing the list.
        let added_at = DateTime::parse_from_rfc3339(&added_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(FavoriteRecord {
            item: CatalogItem {
                id: id as u64,
                title,
                summary,
                image_ref,
                release_label,
                rating_average,
                rating_count,
                popularity,
            },
            added_at,
        })
    }
}

impl FavoritesStore for SqliteFavoritesStore {
    fn insert(&self, item: &CatalogItem) -> Result<(), FavoritesError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT OR REPLACE INTO favorites
                (id, title, summary, image_ref, release_label,
                 rating_average, rating_count, popularity, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item.id as i64,
                item.title,
                item.summary,
                item.image_ref,
                item.release_label,
                item.rating_average,
                item.rating_count,
                item.popularity,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| FavoritesError::Persistence(e.to_string()))?;

        Ok(())
    }

    fn delete(&self, id: u64) -> Result<bool, FavoritesError> {
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute("DELETE FROM favorites WHERE id = ?1", params![id as i64])
            .map_err(|e| FavoritesError::Persistence(e.to_string()))?;
        Ok(removed > 0)
    }

    fn exists(&self, id: u64) -> Result<bool, FavoritesError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT 1 FROM favorites WHERE id = ?1")
            .map_err(|e| FavoritesError::Persistence(e.to_string()))?;
        stmt.exists(params![id as i64])
            .map_err(|e| FavoritesError::Persistence(e.to_string()))
    }

    fn records_recent_first(&self) -> Result<Vec<FavoriteRecord>, FavoritesError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, title, summary, image_ref, release_label,
                       rating_average, rating_count, popularity, added_at
                FROM favorites
                ORDER BY added_at DESC, rowid DESC
                "#,
            )
            .map_err(|e| FavoritesError::Persistence(e.to_string()))?;

        let records = stmt
            .query_map([], Self::row_to_record)
            .map_err(|e| FavoritesError::Persistence(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FavoritesError::Persistence(e.to_string()))?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_insert_exists_delete_roundtrip() {
        let store = SqliteFavoritesStore::in_memory().unwrap();
        let item = fixtures::catalog_item(42, "Blade Runner");

        assert!(!store.exists(42).unwrap());
        store.insert(&item).unwrap();
        assert!(store.exists(42).unwrap());

        assert!(store.delete(42).unwrap());
        assert!(!store.exists(42).unwrap());
        assert!(!store.delete(42).unwrap());
    }

    #[test]
    fn test_insert_snapshots_item_fields() {
        let store = SqliteFavoritesStore::in_memory().unwrap();
        let item = fixtures::catalog_item(7, "Stalker");
        store.insert(&item).unwrap();

        let records = store.records_recent_first().unwrap();
        assert_eq!(records.len(), 1);
        let stored = &records[0].item;
        assert_eq!(stored.id, 7);
        assert_eq!(stored.title, "Stalker");
        assert_eq!(stored.summary, item.summary);
        assert_eq!(stored.image_ref, item.image_ref);
        assert_eq!(stored.release_label, item.release_label);
        assert_eq!(stored.rating_count, item.rating_count);
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let store = SqliteFavoritesStore::in_memory().unwrap();
        store.insert(&fixtures::catalog_item(1, "First")).unwrap();
        store.insert(&fixtures::catalog_item(2, "Second")).unwrap();
        store.insert(&fixtures::catalog_item(3, "Third")).unwrap();

        let ids: Vec<u64> = store
            .list_recent_first()
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_reinsert_refreshes_recency() {
        let store = SqliteFavoritesStore::in_memory().unwrap();
        store.insert(&fixtures::catalog_item(1, "First")).unwrap();
        store.insert(&fixtures::catalog_item(2, "Second")).unwrap();
        store.insert(&fixtures::catalog_item(1, "First")).unwrap();

        let ids: Vec<u64> = store
            .list_recent_first()
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        // Still a single record for id 1.
        assert_eq!(store.records_recent_first().unwrap().len(), 2);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("favorites.db");

        {
            let store = SqliteFavoritesStore::new(&path).unwrap();
            store.insert(&fixtures::catalog_item(9, "Heat")).unwrap();
        }

        let store = SqliteFavoritesStore::new(&path).unwrap();
        assert!(store.exists(9).unwrap());
        assert_eq!(store.list_recent_first().unwrap().len(), 1);
    }
}
