// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage};
use crate::value::{Value, ValueType};

/// Token Counter stage - counts characters, words and lines
pub struct TokenCounterStage;

impl TokenCounterStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokenCounterStage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct TokenCountResult {
    char_count: usize,
    word_count: usize,
    line_count: usize,
}

#[async_trait]
impl Stage for TokenCounterStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let text = single_input(self.name(), inputs)?.try_into_text()?;

        let result = TokenCountResult {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            line_count: text.lines().count().max(1), // At least 1 line even if empty
        };

        serde_json::to_value(&result)
            .map(Value::Structured)
            .map_err(|e| StageError::new(format!("Failed to serialize result: {}", e)))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Structured)
    }

    fn name(&self) -> &'static str {
        "token_counter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_token_counts() {
        let test_cases = vec![
            ("hello world", json!({"char_count": 11, "word_count": 2, "line_count": 1})),
            ("", json!({"char_count": 0, "word_count": 0, "line_count": 1})),
            ("one\ntwo three\n", json!({"char_count": 14, "word_count": 3, "line_count": 2})),
        ];

        let stage = TokenCounterStage::new();
        for (input, expected) in test_cases {
            let output = stage.execute(vec![Value::from(input)]).await.unwrap();
            assert_eq!(output, Value::Structured(expected), "input {:?}", input);
        }
    }
}
