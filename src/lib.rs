//! BookmarkDock core
//!
//! A thin cache-and-rebroadcast layer over an externally authoritative
//! bookmark store, plus the two view surfaces that render it. The store
//! owns the tree; this crate mirrors it, collapses bursts of change
//! notifications into single-flight refreshes, and fans typed events out
//! to whatever surfaces happen to be open.
//!
//! ## Flow
//!
//! ```text
//! Store change notification
//!        ↓
//! SyncCoordinator.handle_store_event()
//!        ↓
//! refresh() [single-flight + one trailing refresh per cycle]
//!        ↓
//! TreeCache.replace() [atomic snapshot swap]
//!        ↓
//! EventBroadcaster.broadcast(Synced) [best effort]
//!        ↓
//! MiniPanelView / ManagerView listener loops
//!        ↓
//! display lists re-derived, redraw requested
//! ```
//!
//! UI surfaces talk back through the [`messaging`] layer: `GET_BOOKMARKS`
//! reads the cache (refreshing once if it was never populated) and
//! `OPEN_MANAGER` opens the full manager surface. Every failure crosses
//! the message boundary as a structured `{success: false, error}`
//! response, never as a fault.
//!
//! ## Module structure
//!
//! - [`sync`]: tree model, store trait, cache, broadcaster, coordinator
//! - [`messaging`]: request router and transport seams
//! - [`ui`]: display-list derivation and the two view surfaces

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod messaging;
pub mod sync;
pub mod ui;

/// Re-exports for convenience.
pub mod prelude {
    pub use crate::messaging::{
        LocalMessenger, Message, MessageRouter, Messenger, NavigationError, Navigator,
        NoopNavigator, Response, TransportError, GET_BOOKMARKS, OPEN_MANAGER,
    };
    pub use crate::sync::{
        BookmarkEvent, BookmarkNode, BookmarkStore, EventBroadcaster, MemoryStore, StoreError,
        SyncCoordinator, SyncCoordinatorBuilder, SyncEvent, TreeCache, TreeSnapshot,
    };
    pub use crate::ui::{
        DisplayItem, LoadState, ManagerView, MiniPanelView, PanelTab, MANAGER_RESULT_CAP,
        MINI_PANEL_RESULT_CAP,
    };
}
