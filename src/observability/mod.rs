// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log messages are structs with a `Display` implementation, so message text
//! lives in one place rather than as strings scattered through the code. Each
//! also implements [`messages::StructuredLog`] to emit the same event with
//! structured fields.
//!
//! Messages are organized by subsystem:
//! * `messages::bundle` - bundle loading and inspection
//! * `messages::engine` - pipeline construction and forward passes
//! * `messages::stage` - stage registration, instantiation and execution
//! * `messages::boundary` - runtime lifecycle and C boundary failures
//!
//! # Usage
//!
//! ```rust
//! use stagecraft::observability::messages::StructuredLog;
//! use stagecraft::observability::messages::stage::StageExecutionFailed;
//!
//! let error = stagecraft::errors::StageError::new("bad input");
//! let msg = StageExecutionFailed {
//!     stage: "reverse",
//!     error: &error,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `filter` (`EnvFilter` syntax).
///
/// Safe to call more than once; only the first successful call installs a
/// subscriber. Returns whether this call installed it.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .is_ok()
}
