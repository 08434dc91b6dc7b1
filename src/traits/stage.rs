// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::bundle::ResourceTable;
use crate::errors::StageError;
use crate::value::{Value, ValueType};

/// Declared input/output contract of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub input: ValueType,
    pub output: ValueType,
}

impl Signature {
    pub const fn new(input: ValueType, output: ValueType) -> Self {
        Self { input, output }
    }
}

/// Everything a stage sees while it is being configured.
pub struct StageContext<'a> {
    /// Name of the stage in the manifest
    pub stage_name: &'a str,
    /// Manifest configuration merged with any runtime override
    pub config: &'a serde_json::Value,
    /// Only the resources this stage declared
    pub resources: &'a ResourceTable,
}

/// One executable unit of a pipeline.
///
/// The runtime only ever sees a stage through this trait. `execute` takes
/// `&self`: a stage may hold read-only resources loaded during `configure`, but
/// must not mutate shared state while executing, since the same instance serves
/// concurrent forward passes.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Apply configuration before the stage joins a pipeline.
    fn configure(&mut self, ctx: &StageContext<'_>) -> Result<(), StageError> {
        let _ = ctx;
        Ok(())
    }

    /// Produce one output from the values on this stage's input edges, in declared order.
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError>;

    fn signature(&self) -> Signature;

    fn name(&self) -> &'static str;
}
