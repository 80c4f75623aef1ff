//! Cross-surface messaging.
//!
//! This module provides:
//! - `transport`: wire shapes and the `Messenger` transport seam
//! - `router`: the background-side request router and navigation seam

pub mod router;
pub mod transport;

pub use router::{LocalMessenger, MessageRouter, NavigationError, Navigator, NoopNavigator};
pub use transport::{Message, Messenger, Response, TransportError, GET_BOOKMARKS, OPEN_MANAGER};
