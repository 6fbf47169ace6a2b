// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events as seen by the engine
//!
//! The engine never looks inside an event. It needs equality and hashing
//! for deduplication, and a way to tell which route the event came from.

use std::hash::Hash;

/// An event that can be routed to a per-route cache
pub trait RoutedEvent: Eq + Hash + Send + Sync + 'static {
    /// Explicit originating-route tag
    fn from_route(&self) -> Option<&str>;

    /// Originating endpoint, consulted when no route tag is set
    fn from_endpoint(&self) -> Option<&str> {
        None
    }

    /// Alternate cache key for callers that register a route under a
    /// different alias than the event reports
    fn alias_key(&self) -> Option<String> {
        None
    }

    /// Route tag, falling back to the endpoint
    fn origin(&self) -> Option<&str> {
        self.from_route()
            .filter(|r| !r.is_empty())
            .or_else(|| self.from_endpoint().filter(|e| !e.is_empty()))
    }
}
