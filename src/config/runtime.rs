// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;

use crate::config::consts::{DEFAULT_WORKER_THREADS, RUNTIME_CONFIG_SOURCE, WORKER_THREADS_ENV_VAR};
use crate::errors::BuildError;

/// Per-pipeline overrides supplied when a pipeline is created.
///
/// # Example
/// ```json
/// { "stages": { "greet": { "prefix": ">> " } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub stages: HashMap<String, serde_json::Value>,
}

impl RuntimeConfig {
    /// Parse a JSON blob. Empty, whitespace-only or `null` input yields the defaults.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, BuildError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let parsed: Option<Self> =
            serde_json::from_slice(bytes).map_err(|e| BuildError::StageConfig {
                stage: RUNTIME_CONFIG_SOURCE.to_string(),
                reason: e.to_string(),
            })?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn override_for(&self, stage: &str) -> Option<&serde_json::Value> {
        self.stages.get(stage)
    }

    /// Stage names with an override, sorted.
    pub fn overridden_stages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Shallow-merge `overlay` onto `base`: overlay keys win, and a non-object
    /// overlay (or base) means the overlay replaces the base outright.
    pub fn merge(base: &serde_json::Value, overlay: Option<&serde_json::Value>) -> serde_json::Value {
        match (base, overlay) {
            (_, None) => base.clone(),
            (serde_json::Value::Object(base), Some(serde_json::Value::Object(overlay))) => {
                let mut merged = base.clone();
                for (key, value) in overlay {
                    merged.insert(key.clone(), value.clone());
                }
                serde_json::Value::Object(merged)
            }
            (_, Some(overlay)) => overlay.clone(),
        }
    }
}

/// Options for the runtime's async executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub worker_threads: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        let worker_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(DEFAULT_WORKER_THREADS);
        Self { worker_threads }
    }
}

impl RuntimeOptions {
    /// Defaults, with the worker count taken from the environment when set to a positive integer.
    pub fn from_env() -> Self {
        Self::from_worker_threads_var(std::env::var(WORKER_THREADS_ENV_VAR).ok().as_deref())
    }

    fn from_worker_threads_var(value: Option<&str>) -> Self {
        match value.and_then(|v| v.trim().parse::<usize>().ok()) {
            Some(n) if n > 0 => Self { worker_threads: n },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_and_null_blobs_are_defaults() {
        for blob in ["", "   ", "null"] {
            assert_eq!(
                RuntimeConfig::from_json_bytes(blob.as_bytes()).unwrap(),
                RuntimeConfig::default(),
                "blob {:?}",
                blob
            );
        }
    }

    #[test]
    fn test_parse_stage_overrides() {
        let config =
            RuntimeConfig::from_json_bytes(br#"{"stages": {"b": {"x": 1}, "a": "raw"}}"#).unwrap();
        assert_eq!(config.override_for("b"), Some(&json!({"x": 1})));
        assert_eq!(config.overridden_stages(), vec!["a", "b"]);
        assert_eq!(config.override_for("c"), None);
    }

    #[test]
    fn test_rejects_unknown_keys_and_garbage() {
        for blob in [r#"{"stagez": {}}"#, "{not json", "[1,2]"] {
            match RuntimeConfig::from_json_bytes(blob.as_bytes()) {
                Err(BuildError::StageConfig { stage, .. }) => {
                    assert_eq!(stage, RUNTIME_CONFIG_SOURCE)
                }
                other => panic!("Expected StageConfig for {:?}, got {:?}", blob, other),
            }
        }
    }

    #[test]
    fn test_merge_table() {
        let cases = [
            (json!({"a": 1, "b": 2}), Some(json!({"b": 3, "c": 4})), json!({"a": 1, "b": 3, "c": 4})),
            (json!({"a": 1}), None, json!({"a": 1})),
            (json!({"a": 1}), Some(json!("replace")), json!("replace")),
            (json!(null), Some(json!({"a": 1})), json!({"a": 1})),
            (json!({"nested": {"x": 1, "y": 2}}), Some(json!({"nested": {"x": 9}})), json!({"nested": {"x": 9}})),
        ];

        for (base, overlay, expected) in cases {
            assert_eq!(RuntimeConfig::merge(&base, overlay.as_ref()), expected);
        }
    }

    #[test]
    fn test_worker_threads_from_var() {
        assert_eq!(RuntimeOptions::from_worker_threads_var(Some("3")).worker_threads, 3);
        assert_eq!(
            RuntimeOptions::from_worker_threads_var(Some("0")),
            RuntimeOptions::default()
        );
        assert_eq!(
            RuntimeOptions::from_worker_threads_var(Some("lots")),
            RuntimeOptions::default()
        );
        assert!(RuntimeOptions::from_worker_threads_var(None).worker_threads >= 1);
    }
}
