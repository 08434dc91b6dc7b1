// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod builder;
pub mod forward;
pub mod pipeline;
#[cfg(test)]
pub mod integration_tests;

pub use builder::PipelineBuilder;
pub use forward::{ExecutionEngine, Tap};
pub use pipeline::{EdgeSource, PipelineInstance, StageNode};
