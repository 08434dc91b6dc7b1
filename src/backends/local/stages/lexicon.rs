// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use super::single_input;
use crate::errors::StageError;
use crate::traits::{Signature, Stage, StageContext};
use crate::value::{Value, ValueType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconConfig {
    resource: String,
}

/// Replaces whole words using a JSON `{ "word": "replacement" }` map loaded
/// from a bundle resource. Matching is case-sensitive; everything that is not
/// part of a word passes through untouched.
#[derive(Default)]
pub struct LexiconStage {
    entries: HashMap<String, String>,
}

impl LexiconStage {
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    fn substitute(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut word_start: Option<usize> = None;

        for (i, c) in text.char_indices() {
            let in_word = c.is_alphanumeric() || c == '\'';
            match (in_word, word_start) {
                (true, None) => word_start = Some(i),
                (false, Some(start)) => {
                    self.push_word(&mut output, &text[start..i]);
                    output.push(c);
                    word_start = None;
                }
                (false, None) => output.push(c),
                (true, Some(_)) => {}
            }
        }
        if let Some(start) = word_start {
            self.push_word(&mut output, &text[start..]);
        }

        output
    }

    fn push_word(&self, output: &mut String, word: &str) {
        output.push_str(self.entries.get(word).map(String::as_str).unwrap_or(word));
    }
}

#[async_trait]
impl Stage for LexiconStage {
    fn configure(&mut self, ctx: &StageContext<'_>) -> Result<(), StageError> {
        let config: LexiconConfig = serde_json::from_value(ctx.config.clone())
            .map_err(|e| StageError::new(format!("lexicon requires a 'resource': {}", e)))?;

        let blob = ctx.resources.get(&config.resource).ok_or_else(|| {
            StageError::new(format!(
                "resource '{}' is not declared for stage '{}'",
                config.resource, ctx.stage_name
            ))
        })?;

        self.entries = serde_json::from_slice(blob).map_err(|e| {
            StageError::new(format!(
                "resource '{}' is not a JSON string map: {}",
                config.resource, e
            ))
        })?;
        Ok(())
    }

    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let text = single_input(self.name(), inputs)?.try_into_text()?;
        Ok(Value::from(self.substitute(&text)))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}
