// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stage registration, instantiation and execution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A stage factory was registered. `replaced` is set when an earlier factory
/// for the same type id was overwritten.
pub struct StageTypeRegistered<'a> {
    pub type_id: &'a str,
    pub replaced: bool,
}

impl Display for StageTypeRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(f, "Stage type '{}' re-registered, previous factory replaced", self.type_id)
        } else {
            write!(f, "Stage type '{}' registered", self.type_id)
        }
    }
}

impl StructuredLog for StageTypeRegistered<'_> {
    fn log(&self) {
        if self.replaced {
            tracing::warn!(type_id = self.type_id, replaced = true, "{}", self);
        } else {
            tracing::trace!(type_id = self.type_id, replaced = false, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("stage_registered", span_name = name, type_id = self.type_id)
    }
}

/// Stage instance created and configured.
///
/// # Log Level
/// `debug!`
pub struct StageInstantiated<'a> {
    pub stage: &'a str,
    pub type_id: &'a str,
}

impl Display for StageInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' instantiated as '{}'", self.stage, self.type_id)
    }
}

impl StructuredLog for StageInstantiated<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, type_id = self.type_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_instantiated",
            span_name = name,
            stage = self.stage,
            type_id = self.type_id,
        )
    }
}

/// Stage execution completed successfully.
///
/// # Log Level
/// `trace!` - One per stage per pass
///
/// # Example
/// ```
/// use stagecraft::observability::messages::stage::StageExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = StageExecutionCompleted {
///     stage: "upper",
///     input_count: 1,
///     duration: Duration::from_micros(40),
/// };
///
/// tracing::trace!("{}", msg);
/// ```
pub struct StageExecutionCompleted<'a> {
    pub stage: &'a str,
    pub input_count: usize,
    pub duration: std::time::Duration,
}

impl Display for StageExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' completed: inputs={}, duration={:?}",
            self.stage, self.input_count, self.duration
        )
    }
}

impl StructuredLog for StageExecutionCompleted<'_> {
    fn log(&self) {
        tracing::trace!(
            stage = self.stage,
            input_count = self.input_count,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("stage_execution", span_name = name, stage = self.stage)
    }
}

/// Stage execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StageExecutionFailed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StageExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' execution failed: {}", self.stage, self.error)
    }
}

impl StructuredLog for StageExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(stage = self.stage, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("stage_failed", span_name = name, stage = self.stage)
    }
}
