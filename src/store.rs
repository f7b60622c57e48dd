//! String-keyed store guarded by a reader/writer lock.
//!
//! [`KeyValueStore`] is the object the [`registry`](crate::registry) hands
//! out. Every read takes the shared side of a [`parking_lot::RwLock`] and
//! every mutation takes the exclusive side, so any number of readers may
//! proceed together while writers are serialized.
//!
//! The underlying map is allocated lazily on the first [`set`](KeyValueStore::set).
//! Until then the store behaves exactly like an empty one: reads find
//! nothing, deletes are no-ops and [`size`](KeyValueStore::size) is zero.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Source of construction sequence numbers, shared by every store in the process.
static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// A thread-safe mapping from `String` keys to `String` values.
///
/// None of the operations can fail. Absence is reported through `Option`
/// (for [`get`](Self::get)) or silently ignored (for [`delete`](Self::delete)).
///
/// # Examples
///
/// ```rust
/// use contesa::store::KeyValueStore;
///
/// let store = KeyValueStore::new();
/// assert_eq!(store.get("name"), None);
///
/// store.set("name", "João");
/// assert_eq!(store.get("name").as_deref(), Some("João"));
/// assert_eq!(store.size(), 1);
///
/// store.delete("name");
/// assert_eq!(store.get("name"), None);
/// assert_eq!(store.size(), 0);
/// ```
pub struct KeyValueStore {
    id: u64,
    data: RwLock<Option<HashMap<String, String>>>,
}

impl KeyValueStore {
    /// Creates an empty store with a fresh process-unique id.
    ///
    /// No map is allocated until the first insertion.
    pub fn new() -> Self {
        KeyValueStore {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            data: RwLock::new(None),
        }
    }

    /// Returns the construction sequence number of this store.
    ///
    /// Two references with the same id point at the same store.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        log::trace!("store #{}: set {key}", self.id);
        self.data
            .write()
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
    }

    /// Returns a copy of the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().as_ref()?.get(key).cloned()
    }

    /// Removes `key`. Missing keys are ignored.
    pub fn delete(&self, key: &str) {
        log::trace!("store #{}: delete {key}", self.id);
        if let Some(map) = self.data.write().as_mut() {
            map.remove(key);
        }
    }

    /// Returns the number of keys currently stored.
    pub fn size(&self) -> usize {
        self.data.read().as_ref().map_or(0, HashMap::len)
    }

    /// Returns the stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .as_ref()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Returns `true` once the backing map has been allocated.
    pub fn is_allocated(&self) -> bool {
        self.data.read().is_some()
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for KeyValueStore {
    /// Formats the store as `store#id{ size: n }`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store#{}{{ size: {} }}", self.id, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_is_unallocated() {
        let store = KeyValueStore::new();
        assert!(!store.is_allocated());
        assert_eq!(store.size(), 0);
        assert_eq!(store.get("missing"), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_delete_on_unallocated_is_noop() {
        let store = KeyValueStore::new();
        store.delete("missing");
        assert!(!store.is_allocated());
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_set_then_get() {
        let store = KeyValueStore::new();
        store.set("nome", "João");
        assert!(store.is_allocated());
        assert_eq!(store.get("nome"), Some("João".to_string()));
    }

    #[test]
    fn test_set_overwrites() {
        let store = KeyValueStore::new();
        store.set("idade", "30");
        store.set("idade", "31");
        assert_eq!(store.get("idade").as_deref(), Some("31"));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_delete_removes_key() {
        let store = KeyValueStore::new();
        store.set("cidade", "São Paulo");
        store.delete("cidade");
        assert_eq!(store.get("cidade"), None);
        assert_eq!(store.size(), 0);
        // still allocated, still empty
        assert!(store.is_allocated());
    }

    #[test]
    fn test_size_counts_live_keys() {
        let store = KeyValueStore::new();
        store.set("a", "1");
        store.set("b", "2");
        store.set("c", "3");
        store.set("a", "4");
        store.delete("b");
        store.delete("zzz");
        assert_eq!(store.size(), 2);
        assert_eq!(store.keys(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = KeyValueStore::new();
        let b = KeyValueStore::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_debug() {
        let store = KeyValueStore::new();
        store.set("k", "v");
        let debug_str = format!("{:?}", store);
        assert!(debug_str.starts_with("store#"));
        assert!(debug_str.contains("size: 1"));
    }

    #[test]
    fn test_multiple_threads() {
        let store = Arc::new(KeyValueStore::new());
        let mut handles = vec![];

        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("t{t}_k{i}");
                    store.set(key.clone(), i.to_string());
                    assert_eq!(store.get(&key), Some(i.to_string()));
                    let _ = store.size();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.size(), 800);
    }
}
