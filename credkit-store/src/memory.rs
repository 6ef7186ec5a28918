//! In-memory implementation of the preference store for tests and demos.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{PreferenceStore, StoreResult};

/// An in-memory [`PreferenceStore`] backed by a mutex-guarded map.
///
/// Contents do not survive the process. Used by unit tests, the scenario
/// driver in the CLI, and as the empty-cache stand-in wherever no file path
/// is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock means a writer panicked mid-update; the map itself
        // is still a valid snapshot, so recover it.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.lock().contains_key(key))
    }

    fn clear_all(&self) -> StoreResult<()> {
        self.lock().clear();
        Ok(())
    }
}
