// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::bundle::Bundle;
use crate::config::consts::EXTERNAL_INPUT;
use crate::config::{DependencyGraph, RuntimeConfig, StageRegistry, StageSpec};
use crate::engine::pipeline::{EdgeSource, PipelineInstance, StageNode};
use crate::errors::{BuildError, GraphValidationError};
use crate::observability::messages::engine::{PipelineBuildFailed, PipelineBuilt};
use crate::observability::messages::StructuredLog;
use crate::traits::StageContext;
use crate::value::ValueType;

/// Turns a loaded bundle into an executable [`PipelineInstance`].
///
/// Building fixes the execution order with Kahn's algorithm, ties broken by
/// declaration order, instantiates every stage in that order through the
/// registry and checks every edge's types.
pub struct PipelineBuilder<'r> {
    registry: &'r StageRegistry,
}

impl<'r> PipelineBuilder<'r> {
    pub fn new(registry: &'r StageRegistry) -> Self {
        Self { registry }
    }

    pub fn build(
        &self,
        bundle: Arc<Bundle>,
        config: &RuntimeConfig,
    ) -> Result<PipelineInstance, BuildError> {
        match self.build_nodes(&bundle, config) {
            Ok((nodes, output)) => {
                PipelineBuilt {
                    bundle: bundle.name(),
                    stage_count: nodes.len(),
                    output_stage: bundle.output_stage(),
                }
                .log();
                Ok(PipelineInstance::new(bundle, nodes, output))
            }
            Err(error) => {
                PipelineBuildFailed {
                    bundle: bundle.name(),
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    fn build_nodes(
        &self,
        bundle: &Bundle,
        config: &RuntimeConfig,
    ) -> Result<(Vec<StageNode>, usize), BuildError> {
        for name in config.overridden_stages() {
            if bundle.stage(name).is_none() {
                return Err(BuildError::StageConfig {
                    stage: name.to_string(),
                    reason: "runtime override names a stage the bundle does not declare".to_string(),
                });
            }
        }

        let stages = bundle.stages();
        let order = DependencyGraph::from_stages(stages).topological_order()?;

        // Declaration index -> position in execution order
        let mut position = vec![0; stages.len()];
        for (pos, &decl) in order.iter().enumerate() {
            position[decl] = pos;
        }
        let by_name: HashMap<&str, usize> = stages
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i))
            .collect();

        let external_type = bundle.input_encoding().value_type();
        let mut nodes: Vec<StageNode> = Vec::with_capacity(stages.len());

        for &decl in &order {
            let spec = &stages[decl];
            let mut node = self.instantiate(bundle, spec, config)?;

            for input in &spec.inputs {
                let (edge, producer, produced) = if input == EXTERNAL_INPUT {
                    (EdgeSource::External, EXTERNAL_INPUT, external_type)
                } else {
                    let producer_pos = by_name
                        .get(input.as_str())
                        .map(|&i| position[i])
                        .ok_or_else(|| GraphValidationError::DanglingReference {
                            stage: spec.name.clone(),
                            reference: input.clone(),
                        })?;
                    let producer = &nodes[producer_pos];
                    (
                        EdgeSource::Stage(producer_pos),
                        producer.name.as_str(),
                        producer.output_type,
                    )
                };

                if !node.input_type.accepts(produced) {
                    return Err(GraphValidationError::SchemaMismatch {
                        producer: producer.to_string(),
                        consumer: spec.name.clone(),
                        produced,
                        expected: node.input_type,
                    }
                    .into());
                }
                node.inputs.push(edge);
            }

            nodes.push(node);
        }

        let output = by_name
            .get(bundle.output_stage())
            .map(|&i| position[i])
            .ok_or_else(|| GraphValidationError::DanglingReference {
                stage: EXTERNAL_INPUT.to_string(),
                reference: bundle.output_stage().to_string(),
            })?;

        Ok((nodes, output))
    }

    fn instantiate(
        &self,
        bundle: &Bundle,
        spec: &StageSpec,
        config: &RuntimeConfig,
    ) -> Result<StageNode, BuildError> {
        let merged = RuntimeConfig::merge(&spec.config, config.override_for(&spec.name));
        let resources = bundle.resources().subset(&spec.resources);
        let ctx = StageContext {
            stage_name: &spec.name,
            config: &merged,
            resources: &resources,
        };

        let stage = self.registry.instantiate(&spec.type_id, &ctx)?;
        let signature = stage.signature();
        let input_type = effective_type(&spec.name, "input", spec.input_type, signature.input)?;
        let output_type = effective_type(&spec.name, "output", spec.output_type, signature.output)?;

        Ok(StageNode {
            name: spec.name.clone(),
            type_id: spec.type_id.clone(),
            stage,
            inputs: Vec::with_capacity(spec.inputs.len()),
            input_type,
            output_type,
        })
    }
}

/// Narrow a stage's signature type by the manifest's declaration, if any.
fn effective_type(
    stage: &str,
    direction: &str,
    declared: Option<ValueType>,
    signature: ValueType,
) -> Result<ValueType, BuildError> {
    match declared {
        None | Some(ValueType::Any) => Ok(signature),
        Some(declared) if signature.accepts(declared) => Ok(declared),
        Some(declared) => Err(BuildError::StageConfig {
            stage: stage.to_string(),
            reason: format!(
                "declared {} type {} conflicts with stage type {}",
                direction, declared, signature
            ),
        }),
    }
}
