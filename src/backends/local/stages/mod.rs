// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod change_text_case;
pub mod concatenate;
pub mod json_field;
pub mod lexicon;
pub mod passthrough;
pub mod prefix_suffix_adder;
pub mod reverse_text;
pub mod token_counter;

pub use change_text_case::*;
pub use concatenate::*;
pub use json_field::*;
pub use lexicon::*;
pub use passthrough::*;
pub use prefix_suffix_adder::*;
pub use reverse_text::*;
pub use token_counter::*;

use serde::de::DeserializeOwned;

use crate::errors::StageError;
use crate::value::Value;

/// Take the only input of a single-input stage.
pub(crate) fn single_input(stage: &str, inputs: Vec<Value>) -> Result<Value, StageError> {
    let count = inputs.len();
    let mut inputs = inputs.into_iter();
    match (inputs.next(), count) {
        (Some(value), 1) => Ok(value),
        _ => Err(StageError::new(format!(
            "{} takes exactly one input, got {}",
            stage, count
        ))),
    }
}

/// Deserialize a stage's configuration; `null` yields the type's default.
pub(crate) fn parse_config<T>(config: &serde_json::Value) -> Result<T, StageError>
where
    T: DeserializeOwned + Default,
{
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config.clone()).map_err(|e| StageError::new(e.to_string()))
}
