// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigil-core: shared building blocks for the vigil event engine
//!
//! This crate provides:
//! - A clock abstraction so time-based eviction is testable
//! - Identifiers for registered expressions
//! - The `RoutedEvent` trait every cached event implements
//! - Window specifications (count and age retention policies)

pub mod clock;
pub mod event;
pub mod id;
pub mod window;

pub use clock::{Clock, FakeClock, SharedClock, SystemClock};
pub use event::RoutedEvent;
pub use id::{ExpressionId, IdGen, SequentialIdGen, UuidIdGen};
pub use window::{Window, WindowError};
