// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage};
use crate::value::{Value, ValueType};

/// Reverse Text stage - reverses the characters of its input
pub struct ReverseTextStage;

impl ReverseTextStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReverseTextStage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for ReverseTextStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let text = single_input(self.name(), inputs)?.try_into_text()?;
        Ok(Value::from(text.chars().rev().collect::<String>()))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "reverse_text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reverse_text() {
        let test_cases = vec![
            ("hello", "olleh"),
            ("HELLO", "OLLEH"),
            ("", ""),
            ("a", "a"),
            ("héllo wörld", "dlröw olléh"),
        ];

        let stage = ReverseTextStage::new();
        for (input, expected) in test_cases {
            let output = stage.execute(vec![Value::from(input)]).await.unwrap();
            assert_eq!(output, Value::from(expected));
        }
    }
}
