// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::BuildError;
use crate::observability::messages::stage::{StageInstantiated, StageTypeRegistered};
use crate::observability::messages::StructuredLog;
use crate::traits::{Stage, StageContext};

/// Creates a fresh, unconfigured stage instance.
pub type StageFactory = Arc<dyn Fn() -> Box<dyn Stage> + Send + Sync>;

/// Maps stage type identifiers to factories.
///
/// A registry is populated once when a runtime starts and then read
/// concurrently; instantiation never mutates it.
///
/// # Examples
///
/// ```
/// use stagecraft::config::StageRegistry;
///
/// let registry = StageRegistry::with_builtins();
/// assert!(registry.contains("upper"));
/// assert!(registry.type_ids().windows(2).all(|w| w[0] <= w[1]));
/// ```
#[derive(Clone, Default)]
pub struct StageRegistry {
    factories: HashMap<String, StageFactory>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in stage type registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::backends::local::register_builtins(&mut registry);
        registry
    }

    /// Add a factory for `type_id`, returning the factory it replaced, if any.
    pub fn register<F>(&mut self, type_id: impl Into<String>, factory: F) -> Option<StageFactory>
    where
        F: Fn() -> Box<dyn Stage> + Send + Sync + 'static,
    {
        let type_id = type_id.into();
        let previous = self.factories.insert(type_id.clone(), Arc::new(factory));
        StageTypeRegistered {
            type_id: &type_id,
            replaced: previous.is_some(),
        }
        .log();
        previous
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// Registered type identifiers, sorted.
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Create and configure a stage of type `type_id`.
    pub fn instantiate(
        &self,
        type_id: &str,
        ctx: &StageContext<'_>,
    ) -> Result<Arc<dyn Stage>, BuildError> {
        let factory = self
            .factories
            .get(type_id)
            .ok_or_else(|| BuildError::UnknownStageType {
                stage: ctx.stage_name.to_string(),
                type_id: type_id.to_string(),
            })?;

        let mut stage = factory();
        stage.configure(ctx).map_err(|e| BuildError::StageConfig {
            stage: ctx.stage_name.to_string(),
            reason: e.to_string(),
        })?;

        StageInstantiated {
            stage: ctx.stage_name,
            type_id,
        }
        .log();

        Ok(Arc::from(stage))
    }
}

impl fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRegistry")
            .field("type_ids", &self.type_ids())
            .finish()
    }
}
