// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named registry of event caches
//!
//! Caches are created on first request for an id and live until removed or
//! until the manager is dropped.

use crate::cache::EventCache;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use vigil_core::{SharedClock, Window};

/// Creates, looks up, and removes event caches by id
pub trait CacheManager<E>: Send + Sync {
    /// Return the cache for `id`, creating it with `window` if absent.
    /// An existing cache keeps its current window.
    fn get_cache(&self, id: &str, window: Window) -> Arc<EventCache<E>>;

    fn lookup_cache(&self, id: &str) -> Option<Arc<EventCache<E>>>;

    /// Detach the cache for `id`. Returns whether one existed.
    fn remove_cache(&self, id: &str) -> bool;

    /// Ids of every registered cache, sorted
    fn cache_ids(&self) -> Vec<String>;

    fn start(&self) {}

    fn stop(&self) {}
}

/// In-process cache manager backed by a locked map
pub struct LocalCacheManager<E> {
    clock: SharedClock,
    caches: RwLock<HashMap<String, Arc<EventCache<E>>>>,
}

impl<E> LocalCacheManager<E> {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            caches: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Eq + Hash + Send + Sync> CacheManager<E> for LocalCacheManager<E> {
    fn get_cache(&self, id: &str, window: Window) -> Arc<EventCache<E>> {
        if let Some(cache) = self.lookup_cache(id) {
            return cache;
        }

        let mut caches = self.caches.write().unwrap_or_else(|e| e.into_inner());
        let cache = caches.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(cache = id, %window, "creating cache");
            Arc::new(EventCache::new(id, window, Arc::clone(&self.clock)))
        });
        Arc::clone(cache)
    }

    fn lookup_cache(&self, id: &str) -> Option<Arc<EventCache<E>>> {
        self.caches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn remove_cache(&self, id: &str) -> bool {
        let removed = self
            .caches
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some();
        if removed {
            tracing::debug!(cache = id, "removed cache");
        }
        removed
    }

    fn cache_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .caches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn start(&self) {
        tracing::info!("cache manager started");
    }

    fn stop(&self) {
        tracing::info!("cache manager stopped");
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
