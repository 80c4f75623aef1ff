//! Mini panel view surface.
//!
//! The popup-style panel: two tabs (a flat list of saved bookmarks and
//! the full tree), search capped at 50 results, and an "open manager"
//! action routed through the messenger.

use crate::messaging::{Message, Messenger, GET_BOOKMARKS, OPEN_MANAGER};
use crate::sync::events::SyncEvent;
use crate::sync::store::BookmarkStore;
use crate::sync::tree::TreeSnapshot;
use crate::ui::display::{saved_items, search_items, tree_items, DisplayItem};
use crate::ui::{LoadState, RedrawCallback};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Maximum number of rows the mini panel will derive for a list or
/// search view. A rendering guard, not a correctness requirement.
pub const MINI_PANEL_RESULT_CAP: usize = 50;

/// Active tab of the mini panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTab {
    /// Flat list of all saved bookmarks.
    #[default]
    Saved,
    /// Collapsible bookmark tree.
    Bookmarks,
}

#[derive(Default)]
struct PanelState {
    state: LoadState,
    snapshot: TreeSnapshot,
    expanded: HashSet<String>,
    query: String,
    tab: PanelTab,
}

/// The popup-style mini panel.
///
/// View state (expansion, query, active tab) lives for the lifetime of
/// the view and is never persisted. Cloning yields another handle onto
/// the same state, which is how the sync-listener task shares it.
#[derive(Clone)]
pub struct MiniPanelView {
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn BookmarkStore>,
    state: Arc<RwLock<PanelState>>,
    redraw_cb: Option<Arc<RedrawCallback>>,
}

impl MiniPanelView {
    /// Create a panel over the given transport and fallback store.
    pub fn new(messenger: Arc<dyn Messenger>, store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            messenger,
            store,
            state: Arc::new(RwLock::new(PanelState::default())),
            redraw_cb: None,
        }
    }

    /// Set the redraw callback.
    pub fn set_redraw_callback(&mut self, cb: RedrawCallback) {
        self.redraw_cb = Some(Arc::new(cb));
    }

    /// Load the bookmark tree.
    ///
    /// Requests `GET_BOOKMARKS` through the messenger; if the request
    /// fails outright or comes back unsuccessful, falls back to a direct
    /// store fetch so the view stays usable even when the background
    /// coordinator is unreachable. Only when both paths fail does the
    /// view transition to [`LoadState::Error`].
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
                tracing::debug!("mini panel falling back to direct store fetch");
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

    /// Switch the active tab.
    pub async fn switch_tab(&self, tab: PanelTab) {
        self.state.write().await.tab = tab;
    }

    /// Set the search query (trimmed and case-folded).
    pub async fn set_query(&self, query: &str) {
        self.state.write().await.query = query.trim().to_lowercase();
    }

    /// Toggle a folder's expansion state.
    pub async fn toggle_folder(&self, folder_id: &str) {
        let mut state = self.state.write().await;
        if !state.expanded.remove(folder_id) {
            state.expanded.insert(folder_id.to_string());
        }
    }

    /// Whether a folder is currently expanded.
    pub async fn is_expanded(&self, folder_id: &str) -> bool {
        self.state.read().await.expanded.contains(folder_id)
    }

    /// Derive the current display list from snapshot, query, expansion
    /// set, and active tab.
    pub async fn display(&self) -> Vec<DisplayItem> {
        let state = self.state.read().await;
        if !state.query.is_empty() {
            search_items(&state.snapshot, &state.query, MINI_PANEL_RESULT_CAP)
        } else {
            match state.tab {
                PanelTab::Saved => saved_items(&state.snapshot, MINI_PANEL_RESULT_CAP),
                PanelTab::Bookmarks => tree_items(&state.snapshot, &state.expanded),
            }
        }
    }

    /// Ask the background router to open the full manager surface.
    ///
    /// Failures are logged and otherwise ignored; the panel keeps
    /// running either way.
    pub async fn open_manager(&self) {
        match self.messenger.send(Message::new(OPEN_MANAGER)).await {
            Ok(response) if response.success => {}
            Ok(response) => {
                tracing::warn!(
                    "open manager refused: {}",
                    response.error.unwrap_or_default()
                );
            }
            Err(e) => tracing::warn!("open manager failed: {e}"),
        }
    }

    /// Start listening for sync events, replacing the snapshot on every
    /// `Synced` broadcast and requesting a redraw.
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
                    tracing::debug!("mini panel saw store event for {}", event.id());
                    self.request_redraw();
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!("mini panel lagged behind by {count} events");
                    self.request_redraw();
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("sync event channel closed, stopping panel listener");
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
