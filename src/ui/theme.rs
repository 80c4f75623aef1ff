//! Dark-mode resolution.
//!
//! The dark-mode flag lives in an external key-value store and is
//! consulted read-only at view startup, OR-ed with the OS color-scheme
//! preference signal.

use std::collections::HashMap;

/// Key holding the persisted dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Read-only view of the local key-value store collaborator.
pub trait KeyValueStore: Send + Sync {
    /// Look up a value by key.
    fn get(&self, key: &str) -> Option<String>;
}

/// Resolve whether a view should start in dark mode.
///
/// True when the stored flag is the string `"true"` or the OS reports a
/// dark color-scheme preference.
pub fn dark_mode_enabled(kv: &dyn KeyValueStore, os_prefers_dark: bool) -> bool {
    kv.get(DARK_MODE_KEY).as_deref() == Some("true") || os_prefers_dark
}

/// In-memory key-value store for the demo binary and tests.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Create a store holding the given entries.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
