// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event engine

use crate::config::ConfigError;
use crate::expression::ExpressionError;
use crate::listener::ListenerError;
use thiserror::Error;
use vigil_core::{ExpressionId, WindowError};

/// Errors that can occur in the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown cache manager implementation: {0}")]
    UnknownCacheManager(String),
    #[error("invalid window: {0}")]
    Window(#[from] WindowError),
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),
    #[error("listener for expression {expression} failed: {source}")]
    Listener {
        expression: ExpressionId,
        #[source]
        source: ListenerError,
    },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
