//! External bookmark store interface.
//!
//! The bookmark store is externally authoritative: this crate only caches
//! and rebroadcasts its tree. The store provides a full-tree fetch and five
//! change notifications, each carrying an id and an event-specific record.

use crate::sync::tree::{BookmarkNode, TreeError, TreeSnapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from the external bookmark store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached. Treated as transient; the caller
    /// retries on the next change notification.
    #[error("bookmark store unavailable: {0}")]
    Unavailable(String),

    /// The store returned a node violating the folder/bookmark invariant.
    #[error("malformed bookmark tree: {0}")]
    Malformed(#[from] TreeError),
}

/// Record carried by a `Changed` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// New title.
    pub title: String,
    /// New URL, absent for folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Record carried by a `Removed` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveInfo {
    /// Id of the parent the node was removed from.
    pub parent_id: String,
    /// Index the node occupied within the parent.
    pub index: usize,
}

/// Record carried by a `Moved` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInfo {
    /// New parent id.
    pub parent_id: String,
    /// New index within the parent.
    pub index: usize,
    /// Previous parent id.
    pub old_parent_id: String,
    /// Previous index within the old parent.
    pub old_index: usize,
}

/// Record carried by a `ChildrenReordered` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderInfo {
    /// Child ids in their new order.
    pub child_ids: Vec<String>,
}

/// A change notification from the external store.
///
/// Every variant carries the id of the affected node plus the store's
/// event-specific record, forwarded verbatim to listening UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookmarkEvent {
    /// A node was created.
    Created {
        /// Id of the new node.
        id: String,
        /// The created node.
        node: BookmarkNode,
    },
    /// A node was removed.
    Removed {
        /// Id of the removed node.
        id: String,
        /// Where the node was removed from.
        info: RemoveInfo,
    },
    /// A node's title or URL changed.
    Changed {
        /// Id of the changed node.
        id: String,
        /// The new title/URL.
        info: ChangeInfo,
    },
    /// A node moved to a new parent or index.
    Moved {
        /// Id of the moved node.
        id: String,
        /// Old and new position.
        info: MoveInfo,
    },
    /// A folder's children were reordered.
    ChildrenReordered {
        /// Id of the reordered folder.
        id: String,
        /// The new child order.
        info: ReorderInfo,
    },
}

impl BookmarkEvent {
    /// Id of the node the event refers to.
    pub fn id(&self) -> &str {
        match self {
            BookmarkEvent::Created { id, .. }
            | BookmarkEvent::Removed { id, .. }
            | BookmarkEvent::Changed { id, .. }
            | BookmarkEvent::Moved { id, .. }
            | BookmarkEvent::ChildrenReordered { id, .. } => id,
        }
    }
}

/// The external bookmark store collaborator.
///
/// Implementations are expected to be transiently unavailable; callers
/// never treat a fetch failure as fatal.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Fetch the full bookmark tree.
    async fn fetch_tree(&self) -> Result<TreeSnapshot, StoreError>;
}

/// In-memory bookmark store for the demo binary and tests.
///
/// Holds a mutable snapshot, counts fetches, and supports failure
/// injection so the coordinator's stale-read path can be exercised.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tree: Arc<RwLock<TreeSnapshot>>,
    fail: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create a store serving the given snapshot.
    pub fn new(tree: TreeSnapshot) -> Self {
        Self {
            tree: Arc::new(RwLock::new(tree)),
            fail: Arc::new(AtomicBool::new(false)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the snapshot the store serves.
    pub async fn set_tree(&self, tree: TreeSnapshot) {
        *self.tree.write().await = tree;
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn fetch_tree(&self) -> Result<TreeSnapshot, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        Ok(self.tree.read().await.clone())
    }
}
