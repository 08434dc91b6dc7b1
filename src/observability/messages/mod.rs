// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Usage Pattern
//!
//! ```rust
//! use stagecraft::observability::messages::engine::PipelineBuilt;
//!
//! let msg = PipelineBuilt {
//!     bundle: "shout-backwards",
//!     stage_count: 2,
//!     output_stage: "reverse",
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod boundary;
pub mod bundle;
pub mod engine;
pub mod stage;

/// A log message that can emit itself with structured fields.
pub trait StructuredLog {
    /// Emit the event at the message's documented level.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
