// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigil-cache: windowed, deduplicating event caches
//!
//! - `EventCache` - per-route store with count and age eviction
//! - `CacheManager` - creates and looks up caches by route id
//! - `CacheManagerRegistry` - picks a manager implementation by name

mod cache;
mod item;
mod manager;
mod registry;

pub use cache::{CacheStats, EventCache};
pub use item::{sort_by_timestamp, CacheItem};
pub use manager::{CacheManager, LocalCacheManager};
pub use registry::{CacheManagerFactory, CacheManagerRegistry, LOCAL_CACHE_MANAGER};
