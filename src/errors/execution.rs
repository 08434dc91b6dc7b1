// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::StageError;

/// Errors surfaced by a single forward pass.
///
/// None of these invalidate the pipeline; the next pass starts from scratch.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Invalid encoding: {reason}")]
    InvalidEncoding { reason: String },

    #[error("Stage '{stage}' failed: {cause}")]
    StageFailure {
        stage: String,
        #[source]
        cause: StageError,
    },

    #[error("No external input supplied for stage '{stage}'")]
    MissingExternalInput { stage: String },
}
