// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Umbrella error for runtime and boundary operations.
//!
//! Its `Display` output is exactly the UTF-8 message handed to a foreign
//! caller's error callback.

use thiserror::Error;

use super::{BuildError, BundleLoadError, ExecutionError};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Bundle(#[from] BundleLoadError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Runtime has been shut down")]
    RuntimeShutdown,

    #[error("Invalid or released {kind} handle {id:#x}")]
    InvalidHandle { kind: &'static str, id: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to start runtime: {0}")]
    Startup(#[source] std::io::Error),

    #[error("Panic inside runtime: {0}")]
    Panic(String),
}
