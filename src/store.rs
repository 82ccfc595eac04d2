//! String key-value stores behind the booking collections.
//!
//! The browser's `localStorage` is the production backend (see the `wasm`
//! feature). [`MemoryStore`] offers the same contract for headless hosts and
//! tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;

/// The subset of the Web Storage API the widget uses.
///
/// Collections only ever grow, so there is no removal. Implementations
/// persist each `set_item` immediately; there is no batching and no
/// transaction across keys.
pub trait KeyValueStore {
    /// The stored string, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, e.g. with data left behind by an older page version.
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.get_item("name").unwrap().is_none());

        store.set_item("name", "alice").unwrap();
        assert_eq!(store.get_item("name").unwrap().as_deref(), Some("alice"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_overwrites_whole_value() {
        let store = MemoryStore::new();
        store.set_item("shammaBookings", "[1]").unwrap();
        store.set_item("shammaBookings", "[1,2]").unwrap();
        assert_eq!(store.get_item("shammaBookings").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_seeded() {
        let store = MemoryStore::new().with_item("shammaBookings", "[]");
        assert_eq!(store.get_item("shammaBookings").unwrap().as_deref(), Some("[]"));
    }
}
