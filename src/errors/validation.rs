// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::value::ValueType;

/// Errors raised while validating the stage graph of a bundle or pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphValidationError {
    /// A stage transitively consumes its own output.
    #[error("Cycle detected: {}", cycle.join(" -> "))]
    CycleDetected {
        /// Participating stages in dependency order, first stage repeated at the end
        cycle: Vec<String>,
    },

    /// A producer's output type cannot feed a consumer's declared input type.
    #[error(
        "Schema mismatch: stage '{consumer}' expects {expected} input but '{producer}' produces {produced}"
    )]
    SchemaMismatch {
        producer: String,
        consumer: String,
        produced: ValueType,
        expected: ValueType,
    },

    /// A stage input (or the pipeline output) names a stage that does not exist.
    #[error("Stage '{stage}' references '{reference}' which is not a declared stage")]
    DanglingReference { stage: String, reference: String },

    #[error("Duplicate stage name: '{stage}'")]
    DuplicateStage { stage: String },
}
