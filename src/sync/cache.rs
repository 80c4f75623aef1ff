//! Last-known-tree cache.
//!
//! Holds the most recent successfully fetched snapshot. The sync
//! coordinator is the sole writer; everything else reads.

use crate::sync::tree::TreeSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache of the last successfully fetched bookmark tree.
///
/// Cloning the cache clones the handle, not the snapshot; the snapshot
/// itself is swapped atomically by [`replace`](TreeCache::replace).
#[derive(Clone, Default)]
pub struct TreeCache {
    inner: Arc<RwLock<Option<TreeSnapshot>>>,
}

impl TreeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the last snapshot without blocking on any fetch, or `None`
    /// if no refresh has ever succeeded.
    pub async fn get(&self) -> Option<TreeSnapshot> {
        self.inner.read().await.clone()
    }

    /// Like [`get`](TreeCache::get), but substituting an empty snapshot
    /// for a never-populated cache.
    pub async fn get_or_empty(&self) -> TreeSnapshot {
        self.get().await.unwrap_or_default()
    }

    /// Whether a refresh has ever populated the cache.
    pub async fn is_populated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Atomically swap in a new snapshot.
    pub async fn replace(&self, snapshot: TreeSnapshot) {
        *self.inner.write().await = Some(snapshot);
    }
}
