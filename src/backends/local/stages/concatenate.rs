// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use super::parse_config;
use crate::errors::StageError;
use crate::traits::{Signature, Stage, StageContext};
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConcatenateConfig {
    #[serde(default)]
    pub separator: String,
}

/// Joins every byte input, in declared input order, with a separator.
pub struct ConcatenateStage {
    config: ConcatenateConfig,
}

impl ConcatenateStage {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            config: ConcatenateConfig {
                separator: separator.into(),
            },
        }
    }
}

impl Default for ConcatenateStage {
    fn default() -> Self {
        Self::new("")
    }
}

#[async_trait]
impl Stage for ConcatenateStage {
    fn configure(&mut self, ctx: &StageContext<'_>) -> Result<(), StageError> {
        self.config = parse_config(ctx.config)?;
        Ok(())
    }

    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        if inputs.is_empty() {
            return Err(StageError::new("concatenate needs at least one input"));
        }

        let separator = self.config.separator.as_bytes();
        let mut joined = Vec::new();
        for (i, input) in inputs.into_iter().enumerate() {
            let bytes = match input {
                Value::Bytes(bytes) => bytes,
                Value::Structured(_) => {
                    return Err(StageError::new(format!(
                        "input {} is structured, expected bytes",
                        i
                    )))
                }
            };
            if i > 0 {
                joined.extend_from_slice(separator);
            }
            joined.extend_from_slice(&bytes);
        }

        Ok(Value::Bytes(joined))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "concatenate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concatenate() {
        let test_cases = vec![
            ("", vec!["a", "b", "c"], "abc"),
            (" | ", vec!["HELLO", "hello"], "HELLO | hello"),
            (",", vec!["only"], "only"),
        ];

        for (separator, inputs, expected) in test_cases {
            let stage = ConcatenateStage::new(separator);
            let inputs = inputs.into_iter().map(Value::from).collect();
            let output = stage.execute(inputs).await.unwrap();
            assert_eq!(output, Value::from(expected));
        }
    }

    #[tokio::test]
    async fn test_concatenate_rejects_empty_and_structured() {
        let stage = ConcatenateStage::default();
        assert!(stage.execute(vec![]).await.is_err());
        assert!(stage
            .execute(vec![Value::from("a"), Value::Structured(serde_json::json!({}))])
            .await
            .is_err());
    }
}
