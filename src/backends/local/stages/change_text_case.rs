// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage};
use crate::value::{Value, ValueType};

/// Which case transformation to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseType {
    Upper,
    Lower,
    Title,
}

/// Change Text Case stage - converts text to different cases
pub struct ChangeTextCaseStage {
    case_type: CaseType,
}

const SMALL_WORDS: [&str; 14] = [
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

impl ChangeTextCaseStage {
    pub fn new(case_type: CaseType) -> Self {
        Self { case_type }
    }

    pub fn upper() -> Self {
        Self::new(CaseType::Upper)
    }

    pub fn lower() -> Self {
        Self::new(CaseType::Lower)
    }

    pub fn title() -> Self {
        Self::new(CaseType::Title)
    }

    fn capitalize(word: &str) -> String {
        let mut chars = word.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        }
    }

    fn apply(&self, input: &str) -> String {
        match self.case_type {
            CaseType::Upper => input.to_uppercase(),
            CaseType::Lower => input.to_lowercase(),
            // First word always capitalized, small words otherwise kept lowercase
            CaseType::Title => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower_word = word.to_lowercase();
                    if i == 0 || !SMALL_WORDS.contains(&lower_word.as_str()) {
                        Self::capitalize(word)
                    } else {
                        lower_word
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[async_trait]
impl Stage for ChangeTextCaseStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let text = single_input(self.name(), inputs)?.try_into_text()?;
        Ok(Value::from(self.apply(&text)))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "change_text_case"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_change_text_case() {
        let test_cases = vec![
            (ChangeTextCaseStage::upper(), "hello", "HELLO"),
            (ChangeTextCaseStage::lower(), "HeLLo", "hello"),
            (ChangeTextCaseStage::title(), "the quick brown fox", "The Quick Brown Fox"),
            (ChangeTextCaseStage::title(), "war and peace of mind", "War and Peace of Mind"),
            (ChangeTextCaseStage::upper(), "", ""),
            (ChangeTextCaseStage::upper(), "straße", "STRASSE"),
        ];

        for (stage, input, expected) in test_cases {
            let output = stage.execute(vec![Value::from(input)]).await.unwrap();
            assert_eq!(output, Value::from(expected), "input {:?}", input);
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_utf8_and_structured_input() {
        let stage = ChangeTextCaseStage::upper();
        let err = stage
            .execute(vec![Value::Bytes(vec![0xff, 0xfe])])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid UTF-8"));

        assert!(stage
            .execute(vec![Value::Structured(serde_json::json!(1))])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_requires_exactly_one_input() {
        let stage = ChangeTextCaseStage::lower();
        assert!(stage.execute(vec![]).await.is_err());
        assert!(stage
            .execute(vec![Value::from("a"), Value::from("b")])
            .await
            .is_err());
    }
}
