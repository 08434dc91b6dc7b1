// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod manifest;
mod registry;
mod runtime;
mod validation;

pub mod consts;

pub use dependency_graph::DependencyGraph;
pub use manifest::{Manifest, ManifestFormat, ResourceSpec, StageSpec};
pub use registry::{StageFactory, StageRegistry};
pub use runtime::{RuntimeConfig, RuntimeOptions};
pub use validation::validate_stage_graph;
