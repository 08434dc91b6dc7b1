// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_config, single_input};
use crate::errors::StageError;
use crate::traits::{Signature, Stage, StageContext};
use crate::value::{Value, ValueType};

/// Configuration for the Prefix/Suffix Adder stage
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixSuffixConfig {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl Default for PrefixSuffixConfig {
    fn default() -> Self {
        Self {
            prefix: Some("[".to_string()),
            suffix: Some("]".to_string()),
        }
    }
}

/// Prefix/Suffix Adder stage - adds prefix and/or suffix to text
///
/// Without configuration the input is wrapped in square brackets.
pub struct PrefixSuffixAdderStage {
    config: PrefixSuffixConfig,
}

impl PrefixSuffixAdderStage {
    pub fn new(config: PrefixSuffixConfig) -> Self {
        Self { config }
    }

    pub fn with_prefix_and_suffix(prefix: String, suffix: String) -> Self {
        Self::new(PrefixSuffixConfig {
            prefix: Some(prefix),
            suffix: Some(suffix),
        })
    }
}

impl Default for PrefixSuffixAdderStage {
    fn default() -> Self {
        Self::new(PrefixSuffixConfig::default())
    }
}

#[async_trait]
impl Stage for PrefixSuffixAdderStage {
    fn configure(&mut self, ctx: &StageContext<'_>) -> Result<(), StageError> {
        self.config = parse_config(ctx.config)?;
        Ok(())
    }

    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        let text = single_input(self.name(), inputs)?.try_into_text()?;

        let prefix = self.config.prefix.as_deref().unwrap_or_default();
        let suffix = self.config.suffix.as_deref().unwrap_or_default();
        let mut result = String::with_capacity(prefix.len() + text.len() + suffix.len());
        result.push_str(prefix);
        result.push_str(&text);
        result.push_str(suffix);

        Ok(Value::from(result))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Bytes, ValueType::Bytes)
    }

    fn name(&self) -> &'static str {
        "prefix_suffix_adder"
    }
}
