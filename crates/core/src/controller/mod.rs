//! Query/pagination controller.
//!
//! Owns the list state machine: browse vs search mode, the search
//! debounce pipeline, the page cursor, in-flight guards, and the
//! projection of persisted favorite flags onto whatever list is currently
//! displayed.
//!
//! Every mutation of the state happens atomically under one lock, which
//! is never held across a suspension point; each public operation is one
//! guard-check/flag-set, one awaited fetch, one atomic completion. After
//! each mutation a fresh [`ListSnapshot`] is published to subscribers.

mod types;

pub use types::{ListMode, ListSnapshot};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::{CatalogClient, CatalogItem, FetchError};
use crate::favorites::{FavoritesError, FavoritesStore};

use types::{FetchClass, QueryState, RequestTag};

/// Default quiescence window for the search debounce.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Input events for the debounce pipeline.
enum QueryInput {
    /// New raw text; supersedes any pending value.
    Edit(String),
    /// Abandon any pending value without firing.
    Clear,
}

/// Query/pagination controller over a remote catalog and a favorites
/// store.
///
/// Construct one per displayed list; the controller spawns its debounce
/// task on the current tokio runtime and aborts it on drop.
pub struct CatalogController {
    inner: Arc<Inner>,
    input_tx: mpsc::UnboundedSender<QueryInput>,
    debounce_task: JoinHandle<()>,
}

struct Inner {
    client: Arc<dyn CatalogClient>,
    favorites: Arc<dyn FavoritesStore>,
    state: Mutex<QueryState>,
    snapshot_tx: watch::Sender<ListSnapshot>,
}

impl CatalogController {
    /// Create a controller and spawn its debounce pipeline.
    pub fn new(
        client: Arc<dyn CatalogClient>,
        favorites: Arc<dyn FavoritesStore>,
        debounce: Duration,
    ) -> Self {
        let mut state = QueryState::new();
        match favorites.list_recent_first() {
            Ok(items) => state.favorite_ids = items.iter().map(|i| i.id).collect(),
            Err(e) => warn!(error = %e, "failed to load favorites at startup"),
        }

        let (snapshot_tx, _) = watch::channel(state.snapshot());
        let inner = Arc::new(Inner {
            client,
            favorites,
            state: Mutex::new(state),
            snapshot_tx,
        });

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let debounce_task =
            tokio::spawn(Inner::debounce_loop(Arc::clone(&inner), input_rx, debounce));

        Self {
            inner,
            input_tx,
            debounce_task,
        }
    }

    /// Record raw input and enqueue it for the debounce pipeline. Never
    /// fetches synchronously.
    pub fn set_query(&self, text: &str) {
        {
            let mut st = self.inner.state.lock().unwrap();
            st.raw_query = text.to_string();
        }
        self.inner.publish();
        let _ = self.input_tx.send(QueryInput::Edit(text.to_string()));
    }

    /// Trigger the first browse load. No-op once a fresh load has
    /// completed for the current mode, and while any fetch is in flight.
    pub async fn load_initial(&self) {
        {
            let st = self.inner.state.lock().unwrap();
            if st.loaded_initial {
                return;
            }
        }
        self.inner.fresh_load(ListMode::Browse).await;
    }

    /// Load the next page in the current mode, appending results. No-op
    /// while any fetch is in flight or once the feed is exhausted.
    pub async fn load_more(&self) {
        let tag = {
            let mut st = self.inner.state.lock().unwrap();
            if st.loading_primary || st.loading_more || !st.has_more_pages {
                return;
            }
            st.loading_more = true;
            st.last_error = None;
            st.page += 1;
            st.fetch_seq += 1;
            RequestTag {
                mode: st.mode.clone(),
                page: st.page,
                seq: st.fetch_seq,
            }
        };
        self.inner.publish();

        let result = self.inner.fetch(&tag).await;
        self.inner.complete_fetch(tag, FetchClass::More, result);
    }

    /// Optimistically flip the display flag for `item`, commit the change
    /// to the store, then re-derive all flags from the store.
    ///
    /// A persistence failure leaves the optimistic flip in place; the
    /// store wins again at the next successful reconciliation.
    pub async fn toggle_favorite(&self, item: &CatalogItem) {
        {
            let mut st = self.inner.state.lock().unwrap();
            if !st.favorite_ids.remove(&item.id) {
                st.favorite_ids.insert(item.id);
            }
        }
        self.inner.publish();

        match self.inner.commit_favorite_toggle(item) {
            Ok(now_favorite) => {
                debug!(id = item.id, now_favorite, "favorite toggled");
                {
                    let mut st = self.inner.state.lock().unwrap();
                    self.inner.refresh_favorites(&mut st);
                }
                self.inner.publish();
            }
            Err(e) => {
                warn!(id = item.id, error = %e, "favorite toggle not persisted");
            }
        }
    }

    /// Clear the query and return to a fresh browse listing.
    ///
    /// Any pending debounced search is abandoned; an in-flight fetch is
    /// left to complete and its result discarded as stale.
    pub async fn reset_search(&self) {
        let _ = self.input_tx.send(QueryInput::Clear);
        {
            let mut st = self.inner.state.lock().unwrap();
            st.raw_query.clear();
            st.mode = ListMode::Browse;
            st.page = 1;
            st.items.clear();
            st.has_more_pages = true;
            st.last_error = None;
            st.loaded_initial = false;
            st.loading_primary = false;
            st.loading_more = false;
            st.fetch_seq += 1;
        }
        self.inner.publish();

        self.inner.fresh_load(ListMode::Browse).await;
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.state.lock().unwrap().snapshot()
    }

    /// Subscribe to state changes. The receiver holds the latest
    /// published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Full favorites list, most recently added first.
    pub fn favorites(&self) -> Result<Vec<CatalogItem>, FavoritesError> {
        self.inner.favorites.list_recent_first()
    }
}

impl Drop for CatalogController {
    fn drop(&mut self) {
        self.debounce_task.abort();
    }
}

impl Inner {
    /// Debounce pipeline: coalesce edits within the quiescence window,
    /// fire only the last value, suppress consecutive duplicates, route
    /// an empty value to browse.
    async fn debounce_loop(
        inner: Arc<Inner>,
        mut rx: mpsc::UnboundedReceiver<QueryInput>,
        window: Duration,
    ) {
        let mut last_fired: Option<String> = None;

        'outer: while let Some(event) = rx.recv().await {
            let mut pending = match event {
                QueryInput::Edit(text) => text,
                QueryInput::Clear => {
                    last_fired = None;
                    continue;
                }
            };

            // Timer-reset loop: every new edit restarts the window.
            loop {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(QueryInput::Edit(text)) => pending = text,
                        Some(QueryInput::Clear) => {
                            last_fired = None;
                            continue 'outer;
                        }
                        None => return,
                    },
                    _ = tokio::time::sleep(window) => break,
                }
            }

            if last_fired.as_deref() == Some(pending.as_str()) {
                continue;
            }
            last_fired = Some(pending.clone());

            if pending.is_empty() {
                inner.fresh_load(ListMode::Browse).await;
            } else {
                debug!(query = %pending, "debounced search firing");
                inner.fresh_load(ListMode::Search(pending)).await;
            }
        }
    }

    /// Issue a page-1 fetch for `mode`, replacing the list on success.
    /// Rejected while any fetch is in flight.
    async fn fresh_load(&self, mode: ListMode) {
        let tag = {
            let mut st = self.state.lock().unwrap();
            if st.loading_primary || st.loading_more {
                debug!("fresh load rejected, fetch already in flight");
                return;
            }
            st.loading_primary = true;
            st.last_error = None;
            st.mode = mode;
            st.page = 1;
            st.fetch_seq += 1;
            RequestTag {
                mode: st.mode.clone(),
                page: 1,
                seq: st.fetch_seq,
            }
        };
        self.publish();

        let result = self.fetch(&tag).await;
        self.complete_fetch(tag, FetchClass::Primary, result);
    }

    async fn fetch(&self, tag: &RequestTag) -> Result<Vec<CatalogItem>, FetchError> {
        match &tag.mode {
            ListMode::Browse => self.client.fetch_popular(tag.page).await,
            ListMode::Search(query) => self.client.fetch_search(query, tag.page).await,
        }
    }

    /// Apply a completed fetch. Stale results (superseded by a reset or a
    /// newer fetch) are discarded without touching any flag.
    fn complete_fetch(
        &self,
        tag: RequestTag,
        class: FetchClass,
        result: Result<Vec<CatalogItem>, FetchError>,
    ) {
        {
            let mut st = self.state.lock().unwrap();

            if tag.seq != st.fetch_seq || tag.mode != st.mode || tag.page != st.page {
                debug!(page = tag.page, "discarded stale fetch result");
                return;
            }

            match class {
                FetchClass::Primary => st.loading_primary = false,
                FetchClass::More => st.loading_more = false,
            }

            match result {
                Ok(new_items) => {
                    st.has_more_pages = !new_items.is_empty();
                    if tag.page == 1 {
                        st.items = new_items;
                        // Only a completed browse load satisfies
                        // load_initial; a search landing first must not
                        // stop the popular feed from ever loading.
                        if tag.mode == ListMode::Browse {
                            st.loaded_initial = true;
                        }
                    } else {
                        st.items.extend(new_items);
                    }
                    self.refresh_favorites(&mut st);
                }
                Err(e) => {
                    warn!(error = %e, page = tag.page, "catalog fetch failed");
                    st.last_error = Some(e);
                    st.has_more_pages = false;
                }
            }
        }
        self.publish();
    }

    fn commit_favorite_toggle(&self, item: &CatalogItem) -> Result<bool, FavoritesError> {
        if self.favorites.exists(item.id)? {
            self.favorites.delete(item.id)?;
            Ok(false)
        } else {
            self.favorites.insert(item)?;
            Ok(true)
        }
    }

    /// Re-derive favorite flags for the displayed list by reloading the
    /// store.
    fn refresh_favorites(&self, st: &mut QueryState) {
        match self.favorites.list_recent_first() {
            Ok(items) => st.favorite_ids = items.iter().map(|i| i.id).collect(),
            Err(e) => warn!(error = %e, "failed to reload favorites"),
        }
    }

    fn publish(&self) {
        let snap = self.state.lock().unwrap().snapshot();
        self.snapshot_tx.send_replace(snap);
    }
}
