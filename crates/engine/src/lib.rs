// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigil event engine
//!
//! Events flow through [`EventEngine::process`] into per-route caches; every
//! expression bound to that route is then evaluated and its listener fired
//! when it matches.

mod config;
mod engine;
mod error;
mod expression;
mod listener;
mod routing;

pub use config::{ConfigError, EngineConfig, RouteConfig};
pub use engine::{EngineContext, EventEngine, ProcessOutcome};
pub use error::EngineError;
pub use expression::{
    CompoundExpression, Evaluation, Expression, ExpressionError, Operator, RouteExpression,
    RoutingContext,
};
pub use listener::{Listener, ListenerError};
pub use routing::{split_route_ids, Binding, RoutingTable};
pub use vigil_core::ExpressionId;
