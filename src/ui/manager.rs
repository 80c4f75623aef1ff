//! Full manager view surface.
//!
//! The manager tab: full collapsible tree, search capped at 200 results,
//! and a stats line (bookmark / folder / showing counts).

use crate::messaging::{Message, Messenger, GET_BOOKMARKS};
use crate::sync::events::SyncEvent;
use crate::sync::store::BookmarkStore;
use crate::sync::tree::TreeSnapshot;
use crate::ui::display::{search_items, tree_items, DisplayItem};
use crate::ui::{LoadState, RedrawCallback};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Maximum number of search results the manager derives. A rendering
/// guard, not a correctness requirement.
pub const MANAGER_RESULT_CAP: usize = 200;

/// Counts shown in the manager's stats line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerStats {
    /// Total leaf bookmarks in the snapshot.
    pub bookmarks: usize,
    /// Total folders, excluding the reserved root.
    pub folders: usize,
    /// Rows currently showing (search results when filtering, all
    /// bookmarks otherwise).
    pub showing: usize,
}

#[derive(Default)]
struct ManagerState {
    state: LoadState,
    snapshot: TreeSnapshot,
    expanded: HashSet<String>,
    query: String,
}

/// The full manager surface.
#[derive(Clone)]
pub struct ManagerView {
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn BookmarkStore>,
    state: Arc<RwLock<ManagerState>>,
    redraw_cb: Option<Arc<RedrawCallback>>,
}

impl ManagerView {
    /// Create a manager view over the given transport and fallback store.
    pub fn new(messenger: Arc<dyn Messenger>, store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            messenger,
            store,
            state: Arc::new(RwLock::new(ManagerState::default())),
            redraw_cb: None,
        }
    }

    /// Set the redraw callback.
    pub fn set_redraw_callback(&mut self, cb: RedrawCallback) {
        self.redraw_cb = Some(Arc::new(cb));
    }

    /// Load the bookmark tree, with the same router-then-direct-fetch
    /// fallback as the mini panel.
    pub async fn load(&self) {
        let snapshot = match self.messenger.send(Message::new(GET_BOOKMARKS)).await {
            Ok(response) if response.success => response
                .data
                .and_then(|data| serde_json::from_value::<TreeSnapshot>(data).ok()),
            Ok(_) | Err(_) => None,
        };

        let snapshot = match snapshot {
            Some(snapshot) => Some(snapshot),
            None => {
                tracing::debug!("manager falling back to direct store fetch");
                self.store.fetch_tree().await.ok()
            }
        };

        let mut state = self.state.write().await;
        match snapshot {
            Some(snapshot) => {
                state.snapshot = snapshot;
                state.state = LoadState::Loaded;
            }
            None => state.state = LoadState::Error,
        }
    }

    /// Current load state.
    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.state
    }

    /// Set the search query (trimmed and case-folded).
    pub async fn set_query(&self, query: &str) {
        self.state.write().await.query = query.trim().to_lowercase();
    }

    /// Clear the search query (the escape-key path).
    pub async fn clear_query(&self) {
        self.state.write().await.query.clear();
    }

    /// Toggle a folder's expansion state.
    pub async fn toggle_folder(&self, folder_id: &str) {
        let mut state = self.state.write().await;
        if !state.expanded.remove(folder_id) {
            state.expanded.insert(folder_id.to_string());
        }
    }

    /// Derive the current display list.
    pub async fn display(&self) -> Vec<DisplayItem> {
        let state = self.state.read().await;
        if !state.query.is_empty() {
            search_items(&state.snapshot, &state.query, MANAGER_RESULT_CAP)
        } else {
            tree_items(&state.snapshot, &state.expanded)
        }
    }

    /// Compute the stats line for the current snapshot and filter.
    pub async fn stats(&self) -> ManagerStats {
        let state = self.state.read().await;
        let bookmarks = state.snapshot.bookmark_count();
        let showing = if state.query.is_empty() {
            bookmarks
        } else {
            search_items(&state.snapshot, &state.query, MANAGER_RESULT_CAP).len()
        };

        ManagerStats {
            bookmarks,
            folders: state.snapshot.folder_count(),
            showing,
        }
    }

    /// Start listening for sync events.
    pub fn attach_sync_listener(
        &self,
        rx: broadcast::Receiver<SyncEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let view = self.clone();
        tokio::spawn(async move {
            view.listener_loop(rx).await;
        })
    }

    async fn listener_loop(&self, mut rx: broadcast::Receiver<SyncEvent>) {
        loop {
            match rx.recv().await {
                Ok(SyncEvent::Synced { snapshot }) => {
                    {
                        let mut state = self.state.write().await;
                        state.snapshot = snapshot;
                        state.state = LoadState::Loaded;
                    }
                    self.request_redraw();
                }
                Ok(SyncEvent::Store(event)) => {
                    tracing::debug!("manager saw store event for {}", event.id());
                    self.request_redraw();
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!("manager lagged behind by {count} events");
                    self.request_redraw();
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("sync event channel closed, stopping manager listener");
                    break;
                }
            }
        }
    }

    fn request_redraw(&self) {
        if let Some(ref cb) = self.redraw_cb {
            cb();
        }
    }
}
