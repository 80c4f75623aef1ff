//! View surfaces.
//!
//! This module provides the two UI surfaces and what they share:
//! - `display`: display-list derivation (tree, flat list, search)
//! - `mini_panel`: the popup-style mini panel
//! - `manager`: the full manager tab
//! - `theme`: dark-mode resolution

pub mod display;
pub mod manager;
pub mod mini_panel;
pub mod theme;

pub use display::{hostname, saved_items, search_items, tree_items, DisplayItem};
pub use manager::{ManagerStats, ManagerView, MANAGER_RESULT_CAP};
pub use mini_panel::{MiniPanelView, PanelTab, MINI_PANEL_RESULT_CAP};
pub use theme::{dark_mode_enabled, KeyValueStore, MemoryKeyValueStore, DARK_MODE_KEY};

/// Callback type for requesting a redraw.
pub type RedrawCallback = Box<dyn Fn() + Send + Sync>;

/// Load state of a view surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded yet.
    #[default]
    Initial,
    /// A snapshot is available (possibly empty).
    Loaded,
    /// Neither the router nor the direct fetch produced data; the
    /// surface shows a static error panel.
    Error,
}
