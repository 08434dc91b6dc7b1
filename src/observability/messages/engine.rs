// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline construction and forward passes.
//!
//! This module contains message types for logging events related to:
//! * Pipeline instantiation from a bundle
//! * Forward pass lifecycle (start, completion, failure)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline built and ready for forward passes.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use stagecraft::observability::messages::engine::PipelineBuilt;
///
/// let msg = PipelineBuilt {
///     bundle: "shout-backwards",
///     stage_count: 2,
///     output_stage: "reverse",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineBuilt<'a> {
    pub bundle: &'a str,
    pub stage_count: usize,
    pub output_stage: &'a str,
}

impl Display for PipelineBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built pipeline from bundle '{}': {} stages, output='{}'",
            self.bundle, self.stage_count, self.output_stage
        )
    }
}

impl StructuredLog for PipelineBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            bundle = self.bundle,
            stage_count = self.stage_count,
            output_stage = self.output_stage,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_built",
            span_name = name,
            bundle = self.bundle,
            stage_count = self.stage_count,
        )
    }
}

/// Pipeline construction failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct PipelineBuildFailed<'a> {
    pub bundle: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PipelineBuildFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to build pipeline from bundle '{}': {}",
            self.bundle, self.error
        )
    }
}

impl StructuredLog for PipelineBuildFailed<'_> {
    fn log(&self) {
        tracing::error!(
            bundle = self.bundle,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_build_failed",
            span_name = name,
            bundle = self.bundle,
        )
    }
}

/// Forward pass started.
///
/// # Log Level
/// `debug!` - Emitted once per pass, too chatty for `info!`
///
/// # Example
/// ```
/// use stagecraft::observability::messages::engine::ForwardStarted;
///
/// let msg = ForwardStarted {
///     bundle: "shout-backwards",
///     stage_count: 2,
///     input_size: 5,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ForwardStarted<'a> {
    pub bundle: &'a str,
    pub stage_count: usize,
    pub input_size: usize,
}

impl Display for ForwardStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Forward pass started on '{}': {} stages, input_size={} bytes",
            self.bundle, self.stage_count, self.input_size
        )
    }
}

impl StructuredLog for ForwardStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            bundle = self.bundle,
            stage_count = self.stage_count,
            input_size = self.input_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "forward",
            span_name = name,
            bundle = self.bundle,
            stage_count = self.stage_count,
            input_size = self.input_size,
        )
    }
}

/// Forward pass completed.
///
/// # Log Level
/// `debug!`
pub struct ForwardCompleted<'a> {
    pub bundle: &'a str,
    pub output_size: usize,
    pub duration: std::time::Duration,
}

impl Display for ForwardCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Forward pass on '{}' completed: output={} bytes in {:?}",
            self.bundle, self.output_size, self.duration
        )
    }
}

impl StructuredLog for ForwardCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            bundle = self.bundle,
            output_size = self.output_size,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "forward_completed",
            span_name = name,
            bundle = self.bundle,
            duration = ?self.duration,
        )
    }
}

/// Forward pass halted by an error.
///
/// # Log Level
/// `warn!` - The pipeline stays usable; the caller receives the error
pub struct ForwardFailed<'a> {
    pub bundle: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ForwardFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Forward pass on '{}' failed: {}", self.bundle, self.error)
    }
}

impl StructuredLog for ForwardFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            bundle = self.bundle,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("forward_failed", span_name = name, bundle = self.bundle)
    }
}
