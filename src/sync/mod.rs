//! Bookmark synchronization core.
//!
//! This module provides:
//! - `tree`: the bookmark tree data model
//! - `store`: the external bookmark store trait and its change events
//! - `cache`: the last-known-tree cache
//! - `events`: typed event fan-out to UI surfaces
//! - `coordinator`: debounced single-flight refresh logic

pub mod cache;
pub mod coordinator;
pub mod events;
pub mod store;
pub mod tree;

pub use cache::TreeCache;
pub use coordinator::{SyncCoordinator, SyncCoordinatorBuilder, DEFAULT_DEBOUNCE_WINDOW};
pub use events::{DeliveryAttempt, EventBroadcaster, SyncEvent};
pub use store::{
    BookmarkEvent, BookmarkStore, ChangeInfo, MemoryStore, MoveInfo, RemoveInfo, ReorderInfo,
    StoreError,
};
pub use tree::{BookmarkNode, RawNode, TreeError, TreeSnapshot, ROOT_ID};
