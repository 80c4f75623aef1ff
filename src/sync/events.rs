//! Typed event fan-out to listening UI surfaces.
//!
//! Broadcasting is a responsiveness optimization, not a correctness path:
//! sends are fire-and-forget, and the expected "no active listener" case
//! is swallowed without so much as a warning.

use crate::sync::store::BookmarkEvent;
use crate::sync::tree::TreeSnapshot;
use tokio::sync::broadcast;

/// An event fanned out to open UI surfaces.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// The cache was replaced with a freshly fetched snapshot.
    Synced {
        /// The new snapshot.
        snapshot: TreeSnapshot,
    },
    /// A raw change notification from the external store, forwarded
    /// regardless of whether the accompanying refresh was deduplicated.
    Store(BookmarkEvent),
}

/// Outcome of a single delivery attempt. Callers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryAttempt {
    /// Number of listeners the event was handed to.
    pub listeners: usize,
}

/// Fans out [`SyncEvent`]s to any subscribed UI surface.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBroadcaster {
    /// Create a broadcaster with the given channel buffer size.
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    /// Subscribe a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }

    /// Number of currently subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Send an event to all listeners, best effort.
    ///
    /// Never fails: a send with no listeners is the expected idle case
    /// and is ignored silently.
    pub fn broadcast(&self, event: SyncEvent) -> DeliveryAttempt {
        match self.sender.send(event) {
            Ok(listeners) => DeliveryAttempt { listeners },
            Err(_) => {
                // No receivers are subscribed; expected when no UI is open.
                tracing::debug!("broadcast dropped: no active listeners");
                DeliveryAttempt { listeners: 0 }
            }
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}
