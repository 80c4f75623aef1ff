//! Request routing for UI-initiated messages.
//!
//! Maps the two known request kinds onto the sync coordinator and the
//! navigation collaborator, and converts every failure path into a
//! structured failure response.

use crate::messaging::transport::{
    Message, Messenger, Response, TransportError, GET_BOOKMARKS, OPEN_MANAGER,
};
use crate::sync::SyncCoordinator;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the navigation collaborator.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// The navigation call itself failed.
    #[error("failed to open {url}: {reason}")]
    OpenFailed {
        /// URL that could not be opened.
        url: String,
        /// Collaborator-reported reason.
        reason: String,
    },
}

/// The navigation collaborator: opens a URL in a new top-level surface
/// (not an overlay).
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Open the given URL.
    async fn open(&self, url: &str) -> Result<(), NavigationError>;
}

/// Routes UI requests to the coordinator and the navigator.
///
/// `handle` is infallible by construction: malformed or unknown requests
/// and collaborator failures all come back as `{success: false, error}`.
#[derive(Clone)]
pub struct MessageRouter {
    coordinator: SyncCoordinator,
    navigator: Arc<dyn Navigator>,
    manager_url: String,
}

impl MessageRouter {
    /// Create a router that opens `manager_url` on [`OPEN_MANAGER`].
    pub fn new(
        coordinator: SyncCoordinator,
        navigator: Arc<dyn Navigator>,
        manager_url: impl Into<String>,
    ) -> Self {
        Self {
            coordinator,
            navigator,
            manager_url: manager_url.into(),
        }
    }

    /// Handle one request, delivering the response asynchronously.
    pub async fn handle(&self, message: Message) -> Response {
        match message.kind.as_str() {
            OPEN_MANAGER => self.open_manager().await,
            GET_BOOKMARKS => self.get_bookmarks().await,
            other => {
                tracing::debug!("unknown message type: {other}");
                Response::failure("Unknown message type")
            }
        }
    }

    async fn open_manager(&self) -> Response {
        match self.navigator.open(&self.manager_url).await {
            Ok(()) => Response::ok_empty(),
            Err(e) => Response::failure(e.to_string()),
        }
    }

    async fn get_bookmarks(&self) -> Response {
        // Ensure the cache has been populated at least once.
        let snapshot = match self.coordinator.cache().get().await {
            Some(snapshot) => snapshot,
            None => self.coordinator.refresh().await,
        };

        match serde_json::to_value(&snapshot) {
            Ok(data) => Response::ok(data),
            Err(e) => Response::failure(e.to_string()),
        }
    }
}

/// In-process [`Messenger`] that hands requests straight to a router.
#[derive(Clone)]
pub struct LocalMessenger {
    router: MessageRouter,
}

impl LocalMessenger {
    /// Wrap a router.
    pub fn new(router: MessageRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Messenger for LocalMessenger {
    async fn send(&self, message: Message) -> Result<Response, TransportError> {
        Ok(self.router.handle(message).await)
    }
}

/// Navigator that only logs, for tests and the demo binary.
#[derive(Default)]
pub struct NoopNavigator;

#[async_trait]
impl Navigator for NoopNavigator {
    async fn open(&self, url: &str) -> Result<(), NavigationError> {
        tracing::info!("opening {url}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tree::{BookmarkNode, TreeSnapshot};
    use crate::sync::MemoryStore;

    struct FailingNavigator;

    #[async_trait]
    impl Navigator for FailingNavigator {
        async fn open(&self, url: &str) -> Result<(), NavigationError> {
            Err(NavigationError::OpenFailed {
                url: url.to_string(),
                reason: "window creation denied".to_string(),
            })
        }
    }

    fn sample_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(TreeSnapshot(vec![BookmarkNode::Bookmark {
            id: "1".to_string(),
            title: "A".to_string(),
            url: "http://a.example".to_string(),
        }])))
    }

    fn router_over(store: Arc<MemoryStore>, navigator: Arc<dyn Navigator>) -> MessageRouter {
        let coordinator = SyncCoordinator::new(store as Arc<dyn crate::sync::BookmarkStore>);
        MessageRouter::new(coordinator, navigator, "manager.html")
    }

    #[tokio::test]
    async fn test_get_bookmarks_refreshes_unpopulated_cache_once() {
        let store = sample_store();
        let router = router_over(store.clone(), Arc::new(NoopNavigator));

        let response = router.handle(Message::new(GET_BOOKMARKS)).await;

        assert!(response.success);
        assert_eq!(store.fetch_count(), 1);
        let snapshot: TreeSnapshot = serde_json::from_value(response.data.unwrap()).unwrap();
        assert_eq!(snapshot.bookmark_count(), 1);
    }

    #[tokio::test]
    async fn test_get_bookmarks_serves_cache_without_refetching() {
        let store = sample_store();
        let router = router_over(store.clone(), Arc::new(NoopNavigator));

        router.handle(Message::new(GET_BOOKMARKS)).await;
        let response = router.handle(Message::new(GET_BOOKMARKS)).await;

        assert!(response.success);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_structured_failure() {
        let router = router_over(sample_store(), Arc::new(NoopNavigator));

        let response = router.handle(Message::new("FROBNICATE")).await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Unknown message type"));
    }

    #[tokio::test]
    async fn test_open_manager_success() {
        let router = router_over(sample_store(), Arc::new(NoopNavigator));

        let response = router.handle(Message::new(OPEN_MANAGER)).await;

        assert!(response.success);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_open_manager_navigation_failure_surfaces_as_error_payload() {
        let router = router_over(sample_store(), Arc::new(FailingNavigator));

        let response = router.handle(Message::new(OPEN_MANAGER)).await;

        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("manager.html"));
        assert!(error.contains("window creation denied"));
    }
}
