// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compile-time table of cache manager implementations
//!
//! The host application registers a factory per implementation name and the
//! engine picks one by name at initialization.

use crate::manager::{CacheManager, LocalCacheManager};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use vigil_core::SharedClock;

/// Name under which [`LocalCacheManager`] is registered by default
pub const LOCAL_CACHE_MANAGER: &str = "local";

/// Builds a cache manager around the given clock
pub type CacheManagerFactory<E> =
    Box<dyn Fn(SharedClock) -> Arc<dyn CacheManager<E>> + Send + Sync>;

pub struct CacheManagerRegistry<E> {
    factories: HashMap<String, CacheManagerFactory<E>>,
}

impl<E: Eq + Hash + Send + Sync + 'static> CacheManagerRegistry<E> {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the built-in implementations
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LOCAL_CACHE_MANAGER, |clock| {
            Arc::new(LocalCacheManager::new(clock)) as Arc<dyn CacheManager<E>>
        });
        registry
    }

    /// Register (or replace) a factory under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(SharedClock) -> Arc<dyn CacheManager<E>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Build the manager registered under `name`
    pub fn create(&self, name: &str, clock: SharedClock) -> Option<Arc<dyn CacheManager<E>>> {
        self.factories.get(name).map(|factory| factory(clock))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<E: Eq + Hash + Send + Sync + 'static> Default for CacheManagerRegistry<E> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
