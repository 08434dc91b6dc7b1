// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::bundle::Bundle;
use crate::traits::Stage;
use crate::value::{Encoding, ValueType};

/// Where a stage input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// The pipeline's external input
    External,
    /// Output of the node at this position in execution order
    Stage(usize),
}

/// A bound stage: a configured instance plus its resolved edges and types.
pub struct StageNode {
    pub name: String,
    pub type_id: String,
    pub stage: Arc<dyn Stage>,
    pub inputs: Vec<EdgeSource>,
    pub input_type: ValueType,
    pub output_type: ValueType,
}

impl fmt::Debug for StageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageNode")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("inputs", &self.inputs)
            .field("input_type", &self.input_type)
            .field("output_type", &self.output_type)
            .finish()
    }
}

/// An executable pipeline built from a bundle.
///
/// Nodes are stored in execution order, fixed at build time. The instance is
/// immutable, so forward passes may run on it concurrently. It keeps its
/// bundle alive for as long as it exists.
#[derive(Debug)]
pub struct PipelineInstance {
    bundle: Arc<Bundle>,
    nodes: Vec<StageNode>,
    output: usize,
}

impl PipelineInstance {
    pub(crate) fn new(bundle: Arc<Bundle>, nodes: Vec<StageNode>, output: usize) -> Self {
        Self {
            bundle,
            nodes,
            output,
        }
    }

    pub fn bundle(&self) -> &Arc<Bundle> {
        &self.bundle
    }

    pub fn nodes(&self) -> &[StageNode] {
        &self.nodes
    }

    /// Position of the output node in [`nodes`](Self::nodes).
    pub fn output_index(&self) -> usize {
        self.output
    }

    pub fn output_stage(&self) -> &str {
        self.bundle.output_stage()
    }

    pub fn input_encoding(&self) -> Encoding {
        self.bundle.input_encoding()
    }

    /// Stage names in the order a forward pass runs them.
    pub fn execution_order(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }
}
