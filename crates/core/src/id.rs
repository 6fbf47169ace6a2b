// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression identifiers
//!
//! Every registered expression gets an [`ExpressionId`] so its route
//! bindings can be found again on removal. Hosts pick the minting strategy
//! through [`IdGen`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier assigned to an expression at registration
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpressionId(pub String);

impl ExpressionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints expression ids
pub trait IdGen: Clone + Send + Sync {
    fn mint(&self) -> ExpressionId;
}

/// Random v4 UUIDs
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn mint(&self) -> ExpressionId {
        ExpressionId(uuid::Uuid::new_v4().to_string())
    }
}

/// `<prefix>-1`, `<prefix>-2`, ...; clones draw from the same sequence
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            issued: Arc::default(),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("expr")
    }
}

impl IdGen for SequentialIdGen {
    fn mint(&self) -> ExpressionId {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        ExpressionId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
