// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure reported by a stage, either while configuring or while executing.
///
/// Stages are external collaborators, so the core only carries their message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct StageError(pub String);

impl StageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
