//! Controller-owned state types.

use std::collections::HashSet;

use crate::catalog::{CatalogItem, FetchError};

/// Which feed drives the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    /// The generic popular feed.
    Browse,
    /// A free-text search feed, paginated independently from browse.
    Search(String),
}

impl ListMode {
    /// The query backing search mode, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            ListMode::Browse => None,
            ListMode::Search(q) => Some(q),
        }
    }
}

/// Which loading flag a fetch occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchClass {
    Primary,
    More,
}

/// Identifies the request a fetch was issued for.
///
/// Compared against current state when the fetch completes: a mismatch in
/// mode (which carries the query), page, or sequence number means the
/// result is stale and gets discarded. `seq` covers the case where a
/// reset re-issued the same mode and page while the old fetch was still
/// in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestTag {
    pub mode: ListMode,
    pub page: u32,
    pub seq: u64,
}

/// Mutable controller state.
///
/// Lives behind the controller's lock for the controller's lifetime and
/// is never shared across controllers.
#[derive(Debug)]
pub(crate) struct QueryState {
    pub raw_query: String,
    pub mode: ListMode,
    pub page: u32,
    pub items: Vec<CatalogItem>,
    pub favorite_ids: HashSet<u64>,
    pub loading_primary: bool,
    pub loading_more: bool,
    pub has_more_pages: bool,
    pub last_error: Option<FetchError>,
    pub loaded_initial: bool,
    /// Monotonic fetch counter; compared for equality only, so it grows
    /// for the controller's lifetime and is never reset.
    pub fetch_seq: u64,
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            raw_query: String::new(),
            mode: ListMode::Browse,
            page: 1,
            items: Vec::new(),
            favorite_ids: HashSet::new(),
            loading_primary: false,
            loading_more: false,
            has_more_pages: true,
            last_error: None,
            loaded_initial: false,
            fetch_seq: 0,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            raw_query: self.raw_query.clone(),
            mode: self.mode.clone(),
            page: self.page,
            items: self.items.clone(),
            favorite_ids: self.favorite_ids.clone(),
            loading_primary: self.loading_primary,
            loading_more: self.loading_more,
            has_more_pages: self.has_more_pages,
            last_error: self.last_error.clone(),
        }
    }
}

/// Immutable view of the list state, published after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    /// Raw input text as last typed, echoed before any debounce.
    pub raw_query: String,
    pub mode: ListMode,
    /// Page cursor of the most recently issued fetch.
    pub page: u32,
    pub items: Vec<CatalogItem>,
    /// Ids of currently-favorited items, for flag projection onto `items`.
    pub favorite_ids: HashSet<u64>,
    pub loading_primary: bool,
    pub loading_more: bool,
    pub has_more_pages: bool,
    pub last_error: Option<FetchError>,
}

impl ListSnapshot {
    /// Whether the given item id is currently favorited.
    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorite_ids.contains(&id)
    }

    /// Whether any fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading_primary || self.loading_more
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = QueryState::new();
        assert_eq!(state.mode, ListMode::Browse);
        assert_eq!(state.page, 1);
        assert!(state.items.is_empty());
        assert!(state.has_more_pages);
        assert!(!state.loading_primary);
        assert!(!state.loading_more);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_mode_query_accessor() {
        assert_eq!(ListMode::Browse.query(), None);
        assert_eq!(ListMode::Search("noir".into()).query(), Some("noir"));
    }

    #[test]
    fn test_snapshot_projects_favorites() {
        let mut state = QueryState::new();
        state.favorite_ids.insert(3);

        let snap = state.snapshot();
        assert!(snap.is_favorite(3));
        assert!(!snap.is_favorite(4));
        assert!(!snap.is_loading());
    }
}
