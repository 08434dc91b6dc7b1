// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for pipeline construction and stage instantiation.

use thiserror::Error;

use super::GraphValidationError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Graph(#[from] GraphValidationError),

    #[error("Unknown stage type '{type_id}' for stage '{stage}'")]
    UnknownStageType { stage: String, type_id: String },

    #[error("Invalid configuration for stage '{stage}': {reason}")]
    StageConfig { stage: String, reason: String },
}
