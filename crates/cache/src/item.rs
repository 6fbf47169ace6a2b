// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single admitted event

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An admitted event plus the time it was admitted
///
/// The timestamp is only recorded when the owning cache has an age window,
/// so count-only caches never read the clock.
pub struct CacheItem<E> {
    event: Arc<E>,
    timestamp: Option<i64>,
}

impl<E> CacheItem<E> {
    pub fn new(event: Arc<E>, timestamp: Option<i64>) -> Self {
        Self { event, timestamp }
    }

    pub fn event(&self) -> &Arc<E> {
        &self.event
    }

    /// Admission time in epoch milliseconds, if recorded
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Order by admission time; unstamped items sort first
    pub fn cmp_timestamp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }

    pub(crate) fn stamp(&mut self, millis: i64) {
        self.timestamp.get_or_insert(millis);
    }
}

impl<E> Clone for CacheItem<E> {
    fn clone(&self) -> Self {
        Self {
            event: Arc::clone(&self.event),
            timestamp: self.timestamp,
        }
    }
}

impl<E: PartialEq> PartialEq for CacheItem<E> {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.event == other.event
    }
}

impl<E: Eq> Eq for CacheItem<E> {}

impl<E: fmt::Debug> fmt::Debug for CacheItem<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheItem")
            .field("event", &self.event)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Sort items by admission time, keeping insertion order for ties
pub fn sort_by_timestamp<E>(items: &mut [CacheItem<E>]) {
    items.sort_by(CacheItem::cmp_timestamp);
}
