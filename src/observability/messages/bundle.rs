// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for bundle loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Bundle loaded and validated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use stagecraft::observability::messages::bundle::BundleLoaded;
///
/// let msg = BundleLoaded {
///     name: "shout-backwards",
///     source: "/opt/bundles/shout",
///     stage_count: 2,
///     resource_count: 0,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BundleLoaded<'a> {
    pub name: &'a str,
    pub source: &'a str,
    pub stage_count: usize,
    pub resource_count: usize,
}

impl Display for BundleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded bundle '{}' from {}: {} stages, {} resources",
            self.name, self.source, self.stage_count, self.resource_count
        )
    }
}

impl StructuredLog for BundleLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            bundle = self.name,
            source = self.source,
            stage_count = self.stage_count,
            resource_count = self.resource_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bundle_loaded",
            span_name = name,
            bundle = self.name,
            source = self.source,
        )
    }
}

/// Bundle failed to load.
///
/// # Log Level
/// `error!`
pub struct BundleLoadFailed<'a> {
    pub source: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for BundleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to load bundle from {}: {}", self.source, self.error)
    }
}

impl StructuredLog for BundleLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(source = self.source, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("bundle_load_failed", span_name = name, source = self.source)
    }
}
