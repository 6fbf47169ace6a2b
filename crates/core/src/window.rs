// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention windows for event caches
//!
//! A window is written as comma-separated tokens. `100` or `100b` caps the
//! number of retained events; anything humantime understands (`5s`, `10m`,
//! `1h 30m`) caps their age. Both may be given at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

// Count tokens: digits with an optional trailing `b`
#[allow(clippy::expect_used)]
static COUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*b?\s*$").expect("constant regex pattern is valid"));

/// Errors from parsing a window specification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("invalid window token '{token}' in '{spec}'")]
    InvalidToken { spec: String, token: String },
    #[error("window count out of range: {0}")]
    CountOutOfRange(String),
}

/// Retention policy: maximum item count, maximum age, both, or neither
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Window {
    pub max_items: Option<usize>,
    pub max_age: Option<Duration>,
}

impl Window {
    /// No eviction at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Keep at most `n` events
    pub fn count(n: usize) -> Self {
        Self {
            max_items: Some(n),
            max_age: None,
        }
    }

    /// Keep events younger than `age`
    pub fn age(age: Duration) -> Self {
        Self {
            max_items: None,
            max_age: Some(age),
        }
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_items.is_none() && self.max_age.is_none()
    }

    /// Parse a comma-separated window specification
    pub fn parse(spec: &str) -> Result<Self, WindowError> {
        let mut window = Window::default();
        if spec.trim().is_empty() {
            return Ok(window);
        }

        for token in spec.split(',') {
            let invalid = || WindowError::InvalidToken {
                spec: spec.to_string(),
                token: token.to_string(),
            };

            if let Some(caps) = COUNT_TOKEN.captures(token) {
                let digits = &caps[1];
                let n = digits
                    .parse::<usize>()
                    .map_err(|_| WindowError::CountOutOfRange(digits.to_string()))?;
                window.max_items = Some(n);
                continue;
            }

            let trimmed = token.trim();
            if trimmed.is_empty() {
                return Err(invalid());
            }
            let age = humantime::parse_duration(trimmed).map_err(|_| invalid())?;
            window.max_age = Some(age);
        }

        Ok(window)
    }
}

impl FromStr for Window {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Window::parse(s)
    }
}

impl TryFrom<String> for Window {
    type Error = WindowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Window::parse(&value)
    }
}

impl From<Window> for String {
    fn from(window: Window) -> Self {
        window.to_string()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.max_items, self.max_age) {
            (None, None) => Ok(()),
            (Some(n), None) => write!(f, "{}", n),
            (None, Some(age)) => write!(f, "{}", humantime::format_duration(age)),
            (Some(n), Some(age)) => write!(f, "{},{}", n, humantime::format_duration(age)),
        }
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
