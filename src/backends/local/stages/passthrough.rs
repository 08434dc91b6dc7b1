// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage};
use crate::value::{Value, ValueType};

/// Returns its input unchanged, whatever its type.
#[derive(Default)]
pub struct PassthroughStage;

#[async_trait]
impl Stage for PassthroughStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        single_input(self.name(), inputs)
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Any, ValueType::Any)
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_passthrough_any_value() {
        let stage = PassthroughStage;
        for value in [Value::from("bytes"), Value::Structured(json!({"k": [1]}))] {
            assert_eq!(stage.execute(vec![value.clone()]).await.unwrap(), value);
        }
    }
}
