// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Instant;

use tracing::Instrument;

use crate::config::consts::EXTERNAL_INPUT;
use crate::engine::pipeline::{EdgeSource, PipelineInstance, StageNode};
use crate::errors::{ExecutionError, StageError};
use crate::observability::messages::engine::{ForwardCompleted, ForwardFailed, ForwardStarted};
use crate::observability::messages::stage::{StageExecutionCompleted, StageExecutionFailed};
use crate::observability::messages::StructuredLog;
use crate::value::{Encoding, Value};

/// Observes every stage output during a forward pass.
pub trait Tap: Send + Sync {
    fn observe(&self, stage: &str, value: &Value);
}

impl<F> Tap for F
where
    F: Fn(&str, &Value) + Send + Sync,
{
    fn observe(&self, stage: &str, value: &Value) {
        self(stage, value)
    }
}

/// Runs forward passes over pipeline instances.
///
/// Stages execute one at a time in the instance's fixed order. Values produced
/// during a pass live in a pass-local slot vector, so any number of passes may
/// run on the same instance at once. The first failure halts the pass and its
/// partial results are dropped; the instance itself is unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionEngine;

impl ExecutionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decode a boundary payload and run one pass.
    ///
    /// `encoding` must match the pipeline's declared input encoding. `None`
    /// input fails with [`ExecutionError::MissingExternalInput`] once a stage
    /// needs it.
    pub async fn forward(
        &self,
        pipeline: &PipelineInstance,
        input: Option<&[u8]>,
        encoding: Encoding,
    ) -> Result<Value, ExecutionError> {
        if encoding != pipeline.input_encoding() {
            return Err(ExecutionError::InvalidEncoding {
                reason: format!(
                    "pipeline expects {} input, got {}",
                    pipeline.input_encoding(),
                    encoding
                ),
            });
        }

        let external = input
            .map(|bytes| Value::decode(bytes, encoding))
            .transpose()
            .map_err(|e| ExecutionError::InvalidEncoding {
                reason: format!("input is not valid JSON: {}", e),
            })?;

        self.run(pipeline, external, None).await
    }

    /// Run one pass on an already-decoded input value.
    pub async fn forward_value(
        &self,
        pipeline: &PipelineInstance,
        input: Value,
    ) -> Result<Value, ExecutionError> {
        self.check_value_encoding(pipeline, &input)?;
        self.run(pipeline, Some(input), None).await
    }

    /// Like [`forward_value`](Self::forward_value), reporting each stage's output to `tap`.
    pub async fn forward_with_tap(
        &self,
        pipeline: &PipelineInstance,
        input: Value,
        tap: &dyn Tap,
    ) -> Result<Value, ExecutionError> {
        self.check_value_encoding(pipeline, &input)?;
        self.run(pipeline, Some(input), Some(tap)).await
    }

    fn check_value_encoding(
        &self,
        pipeline: &PipelineInstance,
        input: &Value,
    ) -> Result<(), ExecutionError> {
        if pipeline.input_encoding().value_type() != input.value_type() {
            return Err(ExecutionError::InvalidEncoding {
                reason: format!(
                    "pipeline expects {} input, got {}",
                    pipeline.input_encoding(),
                    input.value_type()
                ),
            });
        }
        Ok(())
    }

    async fn run(
        &self,
        pipeline: &PipelineInstance,
        external: Option<Value>,
        tap: Option<&dyn Tap>,
    ) -> Result<Value, ExecutionError> {
        let bundle = pipeline.bundle().name();
        let started = ForwardStarted {
            bundle,
            stage_count: pipeline.nodes().len(),
            input_size: external.as_ref().map(encoded_len).unwrap_or(0),
        };
        let span = started.span("forward");
        started.log();
        let start_time = Instant::now();

        let result = self
            .run_stages(pipeline, external, tap)
            .instrument(span)
            .await;

        match &result {
            Ok(output) => ForwardCompleted {
                bundle,
                output_size: encoded_len(output),
                duration: start_time.elapsed(),
            }
            .log(),
            Err(error) => ForwardFailed { bundle, error }.log(),
        }
        result
    }

    async fn run_stages(
        &self,
        pipeline: &PipelineInstance,
        external: Option<Value>,
        tap: Option<&dyn Tap>,
    ) -> Result<Value, ExecutionError> {
        let nodes = pipeline.nodes();
        let mut slots: Vec<Option<Value>> = vec![None; nodes.len()];

        for (position, node) in nodes.iter().enumerate() {
            let inputs = gather_inputs(node, nodes, &slots, external.as_ref())?;
            let input_count = inputs.len();
            let start_time = Instant::now();

            let output = node
                .stage
                .execute(inputs)
                .await
                .map_err(|cause| stage_failure(node, cause))?;

            if !node.output_type.admits(&output) {
                return Err(stage_failure(
                    node,
                    StageError::new(format!(
                        "produced {} output, declared {}",
                        output.value_type(),
                        node.output_type
                    )),
                ));
            }

            StageExecutionCompleted {
                stage: &node.name,
                input_count,
                duration: start_time.elapsed(),
            }
            .log();

            if let Some(tap) = tap {
                tap.observe(&node.name, &output);
            }
            slots[position] = Some(output);
        }

        slots
            .get_mut(pipeline.output_index())
            .and_then(Option::take)
            .ok_or_else(|| ExecutionError::StageFailure {
                stage: pipeline.output_stage().to_string(),
                cause: StageError::new("output stage produced no value"),
            })
    }
}

fn gather_inputs(
    node: &StageNode,
    nodes: &[StageNode],
    slots: &[Option<Value>],
    external: Option<&Value>,
) -> Result<Vec<Value>, ExecutionError> {
    let mut inputs = Vec::with_capacity(node.inputs.len());

    for edge in &node.inputs {
        let (value, producer) = match *edge {
            EdgeSource::External => (
                external.ok_or_else(|| ExecutionError::MissingExternalInput {
                    stage: node.name.clone(),
                })?,
                EXTERNAL_INPUT,
            ),
            EdgeSource::Stage(position) => (
                slots
                    .get(position)
                    .and_then(Option::as_ref)
                    .ok_or_else(|| {
                        stage_failure(node, StageError::new("upstream value unavailable"))
                    })?,
                nodes[position].name.as_str(),
            ),
        };

        if !node.input_type.admits(value) {
            return Err(stage_failure(
                node,
                StageError::new(format!(
                    "expected {} input from '{}', got {}",
                    node.input_type,
                    producer,
                    value.value_type()
                )),
            ));
        }
        inputs.push(value.clone());
    }

    Ok(inputs)
}

fn stage_failure(node: &StageNode, cause: StageError) -> ExecutionError {
    StageExecutionFailed {
        stage: &node.name,
        error: &cause,
    }
    .log();
    ExecutionError::StageFailure {
        stage: node.name.clone(),
        cause,
    }
}

fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Bytes(bytes) => bytes.len(),
        Value::Structured(document) => document.to_string().len(),
    }
}
