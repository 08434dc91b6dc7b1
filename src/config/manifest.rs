// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::consts::EXTERNAL_INPUT;
use crate::value::{Encoding, ValueType};

/// Declarative description of a pipeline, as stored at the root of a bundle.
///
/// # Example
/// ```yaml
/// format_version: 1
/// name: shout-backwards
/// input: bytes
/// output: reverse
/// stages:
///   - name: upper
///     type: upper
///   - name: reverse
///     type: reverse
///     inputs: [upper]
/// resources:
///   lexicon:
///     path: resources/lexicon.json
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Encoding of the external input
    pub input: Encoding,
    /// Stage whose output is the pipeline's output
    pub output: String,
    pub stages: Vec<StageSpec>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceSpec>,
}

/// One stage declaration. Not executable until the pipeline builder binds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    /// Upstream stage names, or `$input` for the external input
    #[serde(default = "default_inputs")]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    /// Names from the bundle's resource table this stage may read
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<ValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<ValueType>,
}

fn default_inputs() -> Vec<String> {
    vec![EXTERNAL_INPUT.to_string()]
}

impl StageSpec {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            inputs: default_inputs(),
            config: serde_json::Value::Null,
            resources: Vec::new(),
            input_type: None,
            output_type: None,
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_types(mut self, input: Option<ValueType>, output: Option<ValueType>) -> Self {
        self.input_type = input;
        self.output_type = output;
        self
    }

    /// Upstream stage names, excluding the external input.
    pub fn upstream_stages(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .map(String::as_str)
            .filter(|input| *input != EXTERNAL_INPUT)
    }

    pub fn consumes_external_input(&self) -> bool {
        self.inputs.iter().any(|input| input == EXTERNAL_INPUT)
    }
}

/// Where a named resource blob comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSpec {
    /// Path relative to the bundle root
    Path(String),
    /// Base64-encoded content embedded in the manifest
    Inline(String),
}

/// Serialization format of a manifest, chosen by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".json") {
            Some(ManifestFormat::Json)
        } else if name.ends_with(".yaml") || name.ends_with(".yml") {
            Some(ManifestFormat::Yaml)
        } else {
            None
        }
    }
}

impl Manifest {
    /// Parse manifest bytes. The error string is the parser's message.
    pub fn parse(bytes: &[u8], format: ManifestFormat) -> Result<Self, String> {
        match format {
            ManifestFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }

    pub fn stage(&self, name: &str) -> Option<&StageSpec> {
        self.stages.iter().find(|stage| stage.name == name)
    }
}
