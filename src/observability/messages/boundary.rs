// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the runtime lifecycle and the C boundary.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Runtime generation started.
pub struct RuntimeStarted {
    pub generation: u16,
    pub worker_threads: usize,
    pub stage_types: usize,
}

impl Display for RuntimeStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Runtime generation {} started: worker_threads={}, stage_types={}",
            self.generation, self.worker_threads, self.stage_types
        )
    }
}

impl StructuredLog for RuntimeStarted {
    fn log(&self) {
        tracing::info!(
            generation = self.generation,
            worker_threads = self.worker_threads,
            stage_types = self.stage_types,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("runtime", span_name = name, generation = self.generation)
    }
}

/// Runtime generation shut down, dropping every outstanding object.
pub struct RuntimeStopped {
    pub generation: u16,
    pub bundles_dropped: usize,
    pub pipelines_dropped: usize,
}

impl Display for RuntimeStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Runtime generation {} shut down: dropped {} bundles, {} pipelines",
            self.generation, self.bundles_dropped, self.pipelines_dropped
        )
    }
}

impl StructuredLog for RuntimeStopped {
    fn log(&self) {
        tracing::info!(
            generation = self.generation,
            bundles_dropped = self.bundles_dropped,
            pipelines_dropped = self.pipelines_dropped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("runtime_stopped", span_name = name, generation = self.generation)
    }
}

/// A boundary call failed; the message was handed to the caller's callback.
///
/// # Log Level
/// `debug!` - The caller owns the failure; this is only for correlation
pub struct BoundaryCallFailed<'a> {
    pub call: &'a str,
    pub message: &'a str,
}

impl Display for BoundaryCallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.call, self.message)
    }
}

impl StructuredLog for BoundaryCallFailed<'_> {
    fn log(&self) {
        tracing::debug!(call = self.call, message = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("boundary_failure", span_name = name, call = self.call)
    }
}

/// A panic was caught at the boundary.
///
/// # Log Level
/// `error!`
pub struct BoundaryPanic<'a> {
    pub call: &'a str,
    pub message: &'a str,
}

impl Display for BoundaryPanic<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Panic caught in {}: {}", self.call, self.message)
    }
}

impl StructuredLog for BoundaryPanic<'_> {
    fn log(&self) {
        tracing::error!(call = self.call, panic = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("boundary_panic", span_name = name, call = self.call)
    }
}

/// Buffer release refused by the debug ledger.
///
/// # Log Level
/// `error!`
pub struct BufferReleaseRefused<'a> {
    pub address: usize,
    pub len: usize,
    pub reason: &'a str,
}

impl Display for BufferReleaseRefused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Refused release of buffer at {:#x} (len {}): {}",
            self.address, self.len, self.reason
        )
    }
}

impl StructuredLog for BufferReleaseRefused<'_> {
    fn log(&self) {
        tracing::error!(
            address = self.address,
            len = self.len,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("buffer_release_refused", span_name = name, address = self.address)
    }
}
