// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-route event cache with count and age eviction
//!
//! Items live in a `VecDeque` used as a ring buffer, oldest at the front.
//! A companion set rejects duplicates in O(1). Both are only touched under
//! the cache's write guard and always change together.
//!
//! Pruning walks from the front and stops at the first item that violates
//! neither policy, so its cost is proportional to what it evicts. It runs
//! after every admission and before every read.

use crate::item::CacheItem;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use vigil_core::clock::{duration_millis, SharedClock};
use vigil_core::{Window, WindowError};

/// Counters describing what a cache has done since creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub admitted: u64,
    pub duplicates: u64,
    pub evicted: u64,
}

#[derive(Default)]
struct Counters {
    admitted: AtomicU64,
    duplicates: AtomicU64,
    evicted: AtomicU64,
}

struct Inner<E> {
    window: Window,
    items: VecDeque<CacheItem<E>>,
    members: HashSet<Arc<E>>,
}

impl<E: Eq + Hash> Inner<E> {
    fn new(window: Window) -> Self {
        Self {
            items: VecDeque::with_capacity(ring_capacity(&window)),
            members: HashSet::new(),
            window,
        }
    }

    fn prune(&mut self, now: Option<i64>) -> usize {
        let cutoff = match (self.window.max_age, now) {
            (Some(age), Some(now)) => Some(now.saturating_sub(duration_millis(age))),
            _ => None,
        };

        let mut evicted = 0;
        while let Some(head) = self.items.front() {
            let too_old = matches!((cutoff, head.timestamp()), (Some(c), Some(ts)) if ts < c);
            let too_many = self
                .window
                .max_items
                .is_some_and(|max| self.items.len() > max);
            if !too_old && !too_many {
                break;
            }
            if let Some(item) = self.items.pop_front() {
                self.members.remove(item.event());
                evicted += 1;
            }
        }
        evicted
    }
}

fn ring_capacity(window: &Window) -> usize {
    // One slot of headroom: an admission lands before the prune that follows it
    window.max_items.map_or(0, |n| n.saturating_add(1).min(1024))
}

/// Bounded, deduplicating, insertion-ordered store of events for one route
pub struct EventCache<E> {
    id: String,
    clock: SharedClock,
    inner: RwLock<Inner<E>>,
    counters: Counters,
}

impl<E: Eq + Hash> EventCache<E> {
    pub fn new(id: impl Into<String>, window: Window, clock: SharedClock) -> Self {
        Self {
            id: id.into(),
            clock,
            inner: RwLock::new(Inner::new(window)),
            counters: Counters::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner<E>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<E>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Admit an event. Returns `false` without touching the cache when an
    /// equal event is already retained.
    pub fn add(&self, event: impl Into<Arc<E>>) -> bool {
        let event = event.into();

        if self.read().members.contains(&event) {
            self.counters.duplicates.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        {
            let mut inner = self.write();
            // Another writer may have admitted the same event since the check
            if !inner.members.insert(Arc::clone(&event)) {
                drop(inner);
                self.counters.duplicates.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            let timestamp = inner.window.max_age.map(|_| self.clock.now_millis());
            inner.items.push_back(CacheItem::new(event, timestamp));
        }

        self.counters.admitted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(cache = %self.id, "event admitted");
        self.prune();
        true
    }

    /// Evict everything that violates the current window. Returns the number
    /// of evicted items.
    pub fn prune(&self) -> usize {
        let evicted = {
            let mut inner = self.write();
            if inner.window.is_unbounded() || inner.items.is_empty() {
                return 0;
            }
            let now = inner.window.max_age.map(|_| self.clock.now_millis());
            inner.prune(now)
        };

        if evicted > 0 {
            self.counters
                .evicted
                .fetch_add(evicted as u64, Ordering::Relaxed);
            tracing::debug!(cache = %self.id, evicted, "pruned cache");
        }
        evicted
    }

    /// Retained events, oldest first
    pub fn window(&self) -> Vec<Arc<E>> {
        self.prune();
        self.read()
            .items
            .iter()
            .map(|item| Arc::clone(item.event()))
            .collect()
    }

    /// Retained items with their admission timestamps, oldest first
    pub fn items(&self) -> Vec<CacheItem<E>> {
        self.prune();
        self.read().items.iter().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.prune();
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether an equal event is currently retained
    pub fn contains(&self, event: &E) -> bool {
        self.prune();
        self.read().members.contains(event)
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.items.clear();
        inner.members.clear();
    }

    /// The retention policy currently in force
    pub fn window_spec(&self) -> Window {
        self.read().window
    }

    /// Replace the retention policy from its text form
    pub fn set_window(&self, spec: &str) -> Result<(), WindowError> {
        let window = Window::parse(spec)?;
        self.set_window_to(window);
        Ok(())
    }

    /// Replace the retention policy and prune against it.
    ///
    /// Turning on an age window stamps already-retained items with the
    /// current time, so they age from the moment the window applies.
    pub fn set_window_to(&self, window: Window) {
        {
            let mut inner = self.write();
            if window.max_age.is_some() && inner.window.max_age.is_none() {
                let now = self.clock.now_millis();
                for item in inner.items.iter_mut() {
                    item.stamp(now);
                }
            }
            let wanted = ring_capacity(&window);
            let len = inner.items.len();
            if wanted > len {
                inner.items.reserve(wanted - len);
            }
            inner.window = window;
        }
        tracing::debug!(cache = %self.id, window = %window, "window updated");
        self.prune();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            admitted: self.counters.admitted.load(Ordering::Relaxed),
            duplicates: self.counters.duplicates.load(Ordering::Relaxed),
            evicted: self.counters.evicted.load(Ordering::Relaxed),
        }
    }
}

impl<E> fmt::Debug for EventCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("EventCache")
            .field("id", &self.id)
            .field("window", &inner.window)
            .field("len", &inner.items.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
