// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage, StageContext};
use crate::value::{Value, ValueType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonFieldConfig {
    field: String,
}

/// Extracts one top-level field of a structured input as bytes.
///
/// String fields yield their text; any other JSON value yields its compact encoding.
#[derive(Default)]
pub struct JsonFieldStage {
    field: String,
}

impl JsonFieldStage {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

#[async_trait]
impl Stage for JsonFieldStage {
    fn configure(&mut self, ctx: &StageContext<'_>) -> Result<(), StageError> {
        let config: JsonFieldConfig = serde_json::from_value(ctx.config.clone())
            .map_err(|e| StageError::new(format!("json_field requires a 'field': {}", e)))?;
        self.field = config.field;
        Ok(())
    }

    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let document = single_input(self.name(), inputs)?.try_into_structured()?;
        match document.get(&self.field) {
            Some(serde_json::Value::String(text)) => Ok(Value::from(text.as_str())),
            Some(other) => serde_json::to_vec(other)
                .map(Value::Bytes)
                .map_err(|e| StageError::new(e.to_string())),
            None => Err(StageError::new(format!(
                "field '{}' not present in input",
                self.field
            ))),
        }
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Structured, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "json_field"
    }
}
