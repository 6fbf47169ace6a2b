// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Match notification callbacks

use crate::expression::Expression;
use thiserror::Error;

/// Failure reported by a listener
///
/// A listener error is not isolated: it propagates out of
/// `EventEngine::process` and skips the remaining expressions for that event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Invoked synchronously, on the thread calling `process`, whenever an
/// expression matches after an event is admitted
pub trait Listener<E>: Send + Sync {
    fn on_match(&self, expression: &Expression<E>, event: &E) -> Result<(), ListenerError>;
}

impl<E, F> Listener<E> for F
where
    F: Fn(&Expression<E>, &E) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_match(&self, expression: &Expression<E>, event: &E) -> Result<(), ListenerError> {
        self(expression, event)
    }
}
