//! Small TTL cache for AI responses.
//!
//! Backs the `cache_results`/`cache_ttl_secs` configuration: breakdown and
//! NLP responses are cached keyed by a normalized request fingerprint.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// In-memory map of fingerprint -> (expiry, value). Expired entries are
/// dropped on access.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a live entry, removing it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((expires_at, value)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: V, ttl: Duration) {
        let mut entries = self.entries.lock();
        entries.retain(|_, (expires_at, _)| *expires_at > Instant::now());
        entries.insert(key, (Instant::now() + ttl, value));
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
