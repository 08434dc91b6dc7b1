// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::config::manifest::StageSpec;
use crate::errors::GraphValidationError;

/// Producer -> consumer adjacency over stage declaration indices.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    names: Vec<String>,
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl DependencyGraph {
    /// Build the graph from validated stage declarations.
    ///
    /// References that do not resolve to a declared stage (including `$input`)
    /// are not edges.
    pub fn from_stages(stages: &[StageSpec]) -> Self {
        let index: HashMap<&str, usize> = stages
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i))
            .collect();

        let mut dependents = vec![Vec::new(); stages.len()];
        let mut in_degree = vec![0; stages.len()];

        for (consumer, stage) in stages.iter().enumerate() {
            for upstream in stage.upstream_stages() {
                if let Some(&producer) = index.get(upstream) {
                    dependents[producer].push(consumer);
                    in_degree[consumer] += 1;
                }
            }
        }

        Self {
            names: stages.iter().map(|s| s.name.clone()).collect(),
            dependents,
            in_degree,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Indices of stages consuming `index`'s output.
    pub fn dependents(&self, index: usize) -> &[usize] {
        self.dependents.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kahn's algorithm. Among ready stages the earliest declared goes first,
    /// so the order is a pure function of the manifest.
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphValidationError> {
        let mut in_degree = self.in_degree.clone();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(current)) = ready.pop() {
            order.push(current);
            for &next in &self.dependents[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() != self.len() {
            let cycle = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &d)| d > 0)
                .map(|(i, _)| self.names[i].clone())
                .collect();
            return Err(GraphValidationError::CycleDetected { cycle });
        }

        Ok(order)
    }
}
