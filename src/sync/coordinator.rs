//! Debounced single-flight bookmark synchronization.
//!
//! The coordinator is the sole writer of the tree cache and of the
//! in-flight/queued flag pair. Concurrent refresh triggers are collapsed
//! into one underlying fetch plus at most one trailing refresh, bounding
//! the fetch rate to roughly one per debounce window under bursts.

use crate::sync::cache::TreeCache;
use crate::sync::events::{EventBroadcaster, SyncEvent};
use crate::sync::store::{BookmarkEvent, BookmarkStore};
use crate::sync::tree::TreeSnapshot;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default delay before a queued trailing refresh fires.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// The debounce flag pair, reset to false/false at startup and at the end
/// of every refresh cycle.
#[derive(Debug, Default)]
struct SyncState {
    refresh_in_flight: bool,
    refresh_queued: bool,
}

/// Coordinates refreshes of the tree cache against the external store.
///
/// Cloning yields another handle onto the same cache, state, and
/// broadcaster, letting the trailing refresh run from a spawned task.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: Arc<dyn BookmarkStore>,
    cache: TreeCache,
    broadcaster: EventBroadcaster,
    state: Arc<Mutex<SyncState>>,
    debounce_window: Duration,
}

impl SyncCoordinator {
    /// Create a coordinator with default debounce window and buffer size.
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        SyncCoordinatorBuilder::new(store).build()
    }

    /// Handle to the tree cache (read-only use by other components).
    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    /// Handle to the event broadcaster.
    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.broadcaster
    }

    /// Refresh the cache from the external store.
    ///
    /// Never errors across this boundary:
    /// - if a refresh is already in flight, the trailing-refresh flag is
    ///   set and the current cached snapshot is returned immediately
    ///   (stale reads are acceptable);
    /// - on fetch failure the previous snapshot is returned unchanged and
    ///   the error is only logged — the store is assumed transiently
    ///   unavailable and the next change notification retries anyway.
    ///
    /// On success the cache is replaced and a [`SyncEvent::Synced`] is
    /// broadcast carrying the new snapshot.
    pub async fn refresh(&self) -> TreeSnapshot {
        {
            let mut state = self.state.lock().await;
            if state.refresh_in_flight {
                state.refresh_queued = true;
                return self.cache.get_or_empty().await;
            }
            state.refresh_in_flight = true;
        }

        let snapshot = match self.store.fetch_tree().await {
            Ok(snapshot) => {
                self.cache.replace(snapshot.clone()).await;
                self.broadcaster.broadcast(SyncEvent::Synced {
                    snapshot: snapshot.clone(),
                });
                snapshot
            }
            Err(e) => {
                tracing::error!("failed to sync bookmarks: {e}");
                self.cache.get_or_empty().await
            }
        };

        let queued = {
            let mut state = self.state.lock().await;
            state.refresh_in_flight = false;
            std::mem::take(&mut state.refresh_queued)
        };

        if queued {
            // Exactly one trailing refresh per completed cycle. Triggers
            // arriving during the wait land on the flag of that refresh,
            // never on an extra timer.
            let coordinator = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(coordinator.debounce_window).await;
                coordinator.refresh_boxed().await;
            });
        }

        snapshot
    }

    /// Boxed re-entry point for the trailing refresh. The trailing task
    /// awaits `refresh()` recursively; boxing gives that recursion an
    /// explicitly `Send` future type.
    fn refresh_boxed(&self) -> Pin<Box<dyn Future<Output = TreeSnapshot> + Send + '_>> {
        Box::pin(self.refresh())
    }

    /// Handle one change notification from the external store.
    ///
    /// Refreshes (possibly deduplicated into an in-flight cycle), then
    /// forwards the raw event to listeners unconditionally.
    pub async fn handle_store_event(&self, event: BookmarkEvent) {
        tracing::debug!("bookmark change notification for node {}", event.id());
        self.refresh().await;
        self.broadcaster.broadcast(SyncEvent::Store(event));
    }
}

/// Builder for [`SyncCoordinator`] with sensible defaults.
pub struct SyncCoordinatorBuilder {
    store: Arc<dyn BookmarkStore>,
    debounce_window: Duration,
    buffer_size: usize,
}

impl SyncCoordinatorBuilder {
    /// Start a builder over the given store.
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            buffer_size: 64,
        }
    }

    /// Delay before a queued trailing refresh fires.
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Broadcast channel buffer size.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Build the coordinator.
    pub fn build(self) -> SyncCoordinator {
        SyncCoordinator {
            store: self.store,
            cache: TreeCache::new(),
            broadcaster: EventBroadcaster::new(self.buffer_size),
            state: Arc::new(Mutex::new(SyncState::default())),
            debounce_window: self.debounce_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::store::{MemoryStore, RemoveInfo, StoreError};
    use crate::sync::tree::BookmarkNode;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    fn snapshot(title: &str) -> TreeSnapshot {
        TreeSnapshot(vec![BookmarkNode::Bookmark {
            id: "1".to_string(),
            title: title.to_string(),
            url: "http://a.example".to_string(),
        }])
    }

    /// Store whose fetches block until a permit is released, so a refresh
    /// can be held in flight while more triggers arrive.
    struct GatedStore {
        inner: MemoryStore,
        gate: Semaphore,
    }

    impl GatedStore {
        fn new(tree: TreeSnapshot) -> Self {
            Self {
                inner: MemoryStore::new(tree),
                gate: Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl BookmarkStore for GatedStore {
        async fn fetch_tree(&self) -> Result<TreeSnapshot, StoreError> {
            let permit = self.gate.acquire().await.map_err(|_| {
                StoreError::Unavailable("gate closed".to_string())
            })?;
            permit.forget();
            self.inner.fetch_tree().await
        }
    }

    #[tokio::test]
    async fn test_refresh_runs_on_a_spawned_task() {
        // tokio::spawn requires a Send future; this guards the boxed
        // trailing-refresh re-entry against regressions.
        let store = Arc::new(MemoryStore::new(snapshot("A")));
        let coordinator = SyncCoordinator::new(store);

        let handle = tokio::spawn(async move { coordinator.refresh().await });

        assert_eq!(handle.await.unwrap(), snapshot("A"));
    }

    #[tokio::test]
    async fn test_refresh_populates_cache_and_broadcasts() {
        let store = Arc::new(MemoryStore::new(snapshot("A")));
        let coordinator = SyncCoordinator::new(store);
        let mut rx = coordinator.broadcaster().subscribe();

        let result = coordinator.refresh().await;

        assert_eq!(result, snapshot("A"));
        assert_eq!(coordinator.cache().get().await, Some(snapshot("A")));
        match rx.recv().await.unwrap() {
            SyncEvent::Synced { snapshot: s } => assert_eq!(s, snapshot("A")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_previous_snapshot() {
        let store = Arc::new(MemoryStore::new(snapshot("A")));
        let coordinator = SyncCoordinator::new(store.clone() as Arc<dyn BookmarkStore>);

        coordinator.refresh().await;
        store.set_failing(true);
        store.set_tree(snapshot("B")).await;

        let result = coordinator.refresh().await;

        assert_eq!(result, snapshot("A"));
        assert_eq!(coordinator.cache().get().await, Some(snapshot("A")));
    }

    #[tokio::test]
    async fn test_fetch_failure_with_empty_cache_returns_empty() {
        let store = Arc::new(MemoryStore::new(snapshot("A")));
        store.set_failing(true);
        let coordinator = SyncCoordinator::new(store);

        let result = coordinator.refresh().await;

        assert!(result.is_empty());
        assert!(coordinator.cache().get().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_triggers_collapse_to_one_trailing_refresh() {
        let store = Arc::new(GatedStore::new(snapshot("A")));
        let coordinator = SyncCoordinatorBuilder::new(store.clone() as Arc<dyn BookmarkStore>)
            .debounce_window(Duration::from_millis(10))
            .build();

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.refresh().await })
        };

        // Wait until the first fetch is actually blocked in flight.
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Burst of triggers while the fetch is held; each returns the
        // (empty) cached snapshot without waiting.
        for _ in 0..5 {
            let stale = coordinator.refresh().await;
            assert!(stale.is_empty());
        }

        // The final state lands in the store before the refreshes drain.
        store.inner.set_tree(snapshot("FINAL")).await;
        store.gate.add_permits(16);

        first.await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // One initial fetch plus exactly one trailing fetch.
        assert_eq!(store.inner.fetch_count(), 2);
        assert_eq!(coordinator.cache().get().await, Some(snapshot("FINAL")));
    }

    #[tokio::test]
    async fn test_store_event_broadcasts_even_when_refresh_deduplicated() {
        let store = Arc::new(GatedStore::new(snapshot("A")));
        let coordinator = SyncCoordinatorBuilder::new(store.clone() as Arc<dyn BookmarkStore>)
            .debounce_window(Duration::from_millis(10))
            .build();
        let mut rx = coordinator.broadcaster().subscribe();

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // This event's refresh is absorbed by the in-flight cycle, but the
        // raw event must still reach listeners.
        let event = BookmarkEvent::Removed {
            id: "9".to_string(),
            info: RemoveInfo {
                parent_id: "0".to_string(),
                index: 0,
            },
        };
        coordinator.handle_store_event(event.clone()).await;

        match rx.recv().await.unwrap() {
            SyncEvent::Store(e) => assert_eq!(e, event),
            other => panic!("unexpected event: {other:?}"),
        }

        store.gate.add_permits(16);
        first.await.unwrap();
    }
}
