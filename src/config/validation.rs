// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of a manifest's stage graph.
//!
//! Checks run in a fixed order so the first reported problem is the most
//! fundamental one:
//!
//! 1. **Uniqueness**: every stage name is declared once
//! 2. **References**: every input and the pipeline output name a declared stage
//!    (or `$input`)
//! 3. **Cycles**: iterative depth-first search over an explicit path; a back edge yields
//!    the participating stages in dependency order
//!
//! Cycle detection needs a structurally valid graph, so it only runs once the
//! first two checks pass. Type compatibility is checked later, by the pipeline
//! builder, because effective types depend on the bound stage implementations.

use std::collections::{HashMap, HashSet};

use crate::config::consts::EXTERNAL_INPUT;
use crate::config::manifest::StageSpec;
use crate::errors::GraphValidationError;

/// Validate the stage graph described by `stages` whose output is `output`.
///
/// Returns the first problem found.
///
/// # Examples
///
/// ```rust
/// use stagecraft::config::{validate_stage_graph, StageSpec};
/// use stagecraft::errors::GraphValidationError;
///
/// let stages = vec![
///     StageSpec::new("a", "upper").with_inputs(["b"]),
///     StageSpec::new("b", "reverse").with_inputs(["a"]),
/// ];
///
/// match validate_stage_graph(&stages, "b") {
///     Err(GraphValidationError::CycleDetected { cycle }) => {
///         assert!(cycle.contains(&"a".to_string()));
///         assert!(cycle.contains(&"b".to_string()));
///     }
///     other => panic!("expected a cycle, got {:?}", other),
/// }
/// ```
pub fn validate_stage_graph(stages: &[StageSpec], output: &str) -> Result<(), GraphValidationError> {
    validate_unique_stage_names(stages)?;
    validate_references(stages, output)?;
    validate_acyclic_graph(stages)
}

fn validate_unique_stage_names(stages: &[StageSpec]) -> Result<(), GraphValidationError> {
    let mut seen = HashSet::new();

    for stage in stages {
        if stage.name == EXTERNAL_INPUT || !seen.insert(stage.name.as_str()) {
            return Err(GraphValidationError::DuplicateStage {
                stage: stage.name.clone(),
            });
        }
    }

    Ok(())
}

fn validate_references(stages: &[StageSpec], output: &str) -> Result<(), GraphValidationError> {
    let names: HashSet<&str> = stages.iter().map(|s| s.name.as_str()).collect();

    for stage in stages {
        for reference in stage.upstream_stages() {
            if !names.contains(reference) {
                return Err(GraphValidationError::DanglingReference {
                    stage: stage.name.clone(),
                    reference: reference.to_string(),
                });
            }
        }
    }

    if !names.contains(output) {
        return Err(GraphValidationError::DanglingReference {
            stage: EXTERNAL_INPUT.to_string(),
            reference: output.to_string(),
        });
    }

    Ok(())
}

fn validate_acyclic_graph(stages: &[StageSpec]) -> Result<(), GraphValidationError> {
    // Edges run producer -> consumer
    let mut graph: HashMap<&str, Vec<&str>> = stages
        .iter()
        .map(|s| (s.name.as_str(), Vec::new()))
        .collect();

    for stage in stages {
        for upstream in stage.upstream_stages() {
            if let Some(consumers) = graph.get_mut(upstream) {
                consumers.push(stage.name.as_str());
            }
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    // Declaration order keeps the reported cycle stable between runs
    for stage in stages {
        let name = stage.name.as_str();
        if !visited.contains(name) {
            if let Some(cycle) =
                dfs_cycle_detection(name, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Err(GraphValidationError::CycleDetected { cycle });
            }
        }
    }

    Ok(())
}

/// Iterative depth-first search from `root`.
///
/// Each frame holds a node on the current path and the index of its next
/// consumer to visit; `rec_stack` holds the same nodes as `path`.
fn dfs_cycle_detection<'a>(
    root: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    let mut frames: Vec<(&'a str, usize)> = vec![(root, 0)];
    visited.insert(root);
    rec_stack.insert(root);
    path.push(root);

    while let Some(frame) = frames.last_mut() {
        let (node, next_child) = *frame;
        let consumers = graph.get(node).map(Vec::as_slice).unwrap_or(&[]);

        let Some(&next) = consumers.get(next_child) else {
            frames.pop();
            rec_stack.remove(node);
            path.pop();
            continue;
        };
        frame.1 += 1;

        if rec_stack.contains(next) {
            let start = path.iter().position(|&n| n == next).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(next.to_string());
            return Some(cycle);
        }
        if visited.insert(next) {
            rec_stack.insert(next);
            path.push(next);
            frames.push((next, 0));
        }
    }

    None
}
