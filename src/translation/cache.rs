/*!
 * Translation caching functionality.
 *
 * This module memoizes finished translations keyed by the exact source string,
 * so repeated strings (within a run and across runs) skip the external service.
 * The cache is loaded once from its store and flushed in full after every write.
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::{debug, warn};

use crate::errors::StoreError;
use crate::storage::KeyValueStore;

/// Translation cache for storing and retrieving translations
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<BTreeMap<String, String>>>,

    /// Backing store, rewritten on every `store`
    backend: Arc<dyn KeyValueStore>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl TranslationCache {
    /// Load the cache from its store. A malformed store starts an empty cache.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let entries = match backend.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Starting with an empty translation cache ({}): {}", backend.describe(), e);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} cached translations from {}", entries.len(), backend.describe());

        Self {
            cache: Arc::new(RwLock::new(entries)),
            backend,
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str) -> Option<String> {
        let cache = self.cache.read();

        match cache.get(source_text) {
            Some(translation) => {
                *self.hits.write() += 1;
                debug!("Cache hit for '{}'", truncate_text(source_text, 30));
                Some(translation.clone())
            },
            None => {
                *self.misses.write() += 1;
                debug!("Cache miss for '{}'", truncate_text(source_text, 30));
                None
            }
        }
    }

    /// Store a translation and persist the whole cache
    pub fn store(&self, source_text: &str, translation: &str) -> Result<(), StoreError> {
        self.cache.write().insert(source_text.to_string(), translation.to_string());
        debug!("Cached translation for '{}'", truncate_text(source_text, 30));
        self.flush()
    }

    /// Write the current cache content to the backing store
    pub fn flush(&self) -> Result<(), StoreError> {
        let snapshot = self.cache.read().clone();
        self.backend.save(&snapshot)
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            backend: self.backend.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
