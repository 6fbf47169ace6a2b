// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Every time-based eviction decision reads through [`Clock`], so window
//! boundaries can be driven deterministically with [`FakeClock`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A clock that provides the current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Clock handle shared between the engine and its caches
pub type SharedClock = Arc<dyn Clock>;

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Wrap in a [`SharedClock`]
    pub fn shared() -> SharedClock {
        Arc::new(SystemClock)
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Fake clock for testing with controllable time
///
/// Clones share the same underlying time, so a test can hand one clone to the
/// engine and keep another to move time around.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<i64>>,
}

impl FakeClock {
    /// Start at the epoch
    pub fn new() -> Self {
        Self::at(0)
    }

    /// Start at a specific millisecond timestamp
    pub fn at(millis: i64) -> Self {
        Self {
            current: Arc::new(Mutex::new(millis)),
        }
    }

    /// Set the clock to a specific millisecond timestamp
    pub fn set(&self, millis: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = millis;
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        self.advance_by(duration_millis(duration));
    }

    /// Move the clock backwards by the given duration
    pub fn retreat(&self, duration: Duration) {
        self.advance_by(duration_millis(duration).saturating_neg());
    }

    /// Shift the clock by a signed number of milliseconds
    pub fn advance_by(&self, delta_millis: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.saturating_add(delta_millis);
    }

    /// Convenience for handing this clock to an engine
    pub fn shared(&self) -> SharedClock {
        Arc::new(self.clone())
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> i64 {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Milliseconds in a duration, saturating at `i64::MAX`
pub fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
