// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backends::stub::{CountingStage, DelayStage, FailingStage, WrongOutputStage};
use crate::bundle::{Bundle, ResourceTable};
use crate::config::{Manifest, RuntimeConfig, StageRegistry, StageSpec};
use crate::engine::{ExecutionEngine, PipelineBuilder, PipelineInstance};
use crate::errors::ExecutionError;
use crate::value::{Encoding, Value, ValueType};

/// Integration tests for building and running pipelines with real local stages
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(input: Encoding, output: &str, stages: Vec<StageSpec>) -> Manifest {
        Manifest {
            format_version: 1,
            name: "integration".to_string(),
            description: None,
            input,
            output: output.to_string(),
            stages,
            resources: BTreeMap::new(),
        }
    }

    fn build(registry: &StageRegistry, manifest: Manifest) -> PipelineInstance {
        let bundle = Arc::new(Bundle::from_manifest(manifest, ResourceTable::new()).unwrap());
        PipelineBuilder::new(registry)
            .build(bundle, &RuntimeConfig::default())
            .unwrap()
    }

    fn load(path: &str) -> PipelineInstance {
        let registry = StageRegistry::with_builtins();
        let bundle = Arc::new(Bundle::from_directory(path).unwrap());
        PipelineBuilder::new(&registry)
            .build(bundle, &RuntimeConfig::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_upper_then_reverse_pipeline() {
        let pipeline = load("bundles/shout-backwards");
        let engine = ExecutionEngine::new();

        let test_cases = vec![("hello", "OLLEH"), ("", ""), ("Rust 2021", "1202 TSUR")];
        for (input, expected) in test_cases {
            let output = engine
                .forward(&pipeline, Some(input.as_bytes()), Encoding::Bytes)
                .await
                .unwrap();
            assert_eq!(output.into_bytes().unwrap(), expected.as_bytes(), "input {:?}", input);
        }
    }

    #[tokio::test]
    async fn test_fan_in_bundle() {
        let pipeline = load("bundles/fan-in");
        let output = ExecutionEngine::new()
            .forward(&pipeline, Some(b"Mixed Case"), Encoding::Bytes)
            .await
            .unwrap();
        assert_eq!(output, Value::from("<<MIXED CASE | mixed case>>"));
    }

    #[tokio::test]
    async fn test_spelling_bundle_uses_resource() {
        let pipeline = load("bundles/spelling");
        let output = ExecutionEngine::new()
            .forward(&pipeline, Some(b"the grey colour of the centre"), Encoding::Bytes)
            .await
            .unwrap();
        assert_eq!(output, Value::from("the gray color of the center"));
    }

    #[tokio::test]
    async fn test_structured_greeting_bundle() {
        let pipeline = load("bundles/greeting");
        let engine = ExecutionEngine::new();

        let output = engine
            .forward(&pipeline, Some(br#"{"name": "Ada"}"#), Encoding::Structured)
            .await
            .unwrap();
        assert_eq!(output, Value::from("Hello, Ada!"));

        let invalid = engine
            .forward(&pipeline, Some(b"{oops"), Encoding::Structured)
            .await;
        assert!(matches!(invalid, Err(ExecutionError::InvalidEncoding { .. })));

        let wrong_encoding = engine
            .forward(&pipeline, Some(b"Ada"), Encoding::Bytes)
            .await;
        assert!(matches!(wrong_encoding, Err(ExecutionError::InvalidEncoding { .. })));
    }

    #[tokio::test]
    async fn test_structured_output_is_compact_json() {
        let registry = StageRegistry::with_builtins();
        let pipeline = build(
            &registry,
            manifest(Encoding::Bytes, "count", vec![StageSpec::new("count", "token_count")]),
        );

        let output = ExecutionEngine::new()
            .forward(&pipeline, Some(b"two words"), Encoding::Bytes)
            .await
            .unwrap();
        assert_eq!(
            output.into_bytes().unwrap(),
            br#"{"char_count":9,"line_count":1,"word_count":2}"#.to_vec()
        );
    }

    #[tokio::test]
    async fn test_missing_external_input_names_first_consumer() {
        let pipeline = load("bundles/shout-backwards");
        match ExecutionEngine::new()
            .forward(&pipeline, None, Encoding::Bytes)
            .await
        {
            Err(ExecutionError::MissingExternalInput { stage }) => assert_eq!(stage, "upper"),
            other => panic!("Expected MissingExternalInput, got {:?}", other),
        }
    }

    /// Same input, same bundle, same config: identical bytes every time
    #[tokio::test]
    async fn test_forward_is_deterministic() {
        let pipeline = load("bundles/fan-in");
        let engine = ExecutionEngine::new();

        let first = engine
            .forward(&pipeline, Some(b"determinism"), Encoding::Bytes)
            .await
            .unwrap();
        for _ in 0..20 {
            let again = engine
                .forward(&pipeline, Some(b"determinism"), Encoding::Bytes)
                .await
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_failure_halts_pass_and_instance_stays_usable() {
        let downstream_calls = Arc::new(AtomicUsize::new(0));
        let mut registry = StageRegistry::with_builtins();
        registry.register("explode", || Box::new(FailingStage::new("kaboom")));
        let calls = Arc::clone(&downstream_calls);
        registry.register("count_calls", move || Box::new(CountingStage::new(Arc::clone(&calls))));

        let pipeline = build(
            &registry,
            manifest(
                Encoding::Bytes,
                "after",
                vec![
                    StageSpec::new("before", "upper"),
                    StageSpec::new("boom", "explode").with_inputs(["before"]),
                    StageSpec::new("after", "count_calls").with_inputs(["boom"]),
                ],
            ),
        );
        let engine = ExecutionEngine::new();

        for _ in 0..2 {
            match engine.forward(&pipeline, Some(b"x"), Encoding::Bytes).await {
                Err(ExecutionError::StageFailure { stage, cause }) => {
                    assert_eq!(stage, "boom");
                    assert_eq!(cause.to_string(), "kaboom");
                }
                other => panic!("Expected StageFailure, got {:?}", other),
            }
        }
        assert_eq!(downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runtime_type_check_on_declared_output() {
        let mut registry = StageRegistry::with_builtins();
        registry.register("liar", || Box::new(WrongOutputStage));

        let pipeline = build(
            &registry,
            manifest(
                Encoding::Bytes,
                "liar",
                vec![StageSpec::new("liar", "liar").with_types(None, Some(ValueType::Bytes))],
            ),
        );

        match ExecutionEngine::new()
            .forward(&pipeline, Some(b"x"), Encoding::Bytes)
            .await
        {
            Err(ExecutionError::StageFailure { stage, cause }) => {
                assert_eq!(stage, "liar");
                assert!(cause.to_string().contains("structured"));
            }
            other => panic!("Expected StageFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tap_sees_every_stage_in_order() {
        let pipeline = load("bundles/fan-in");
        let seen: Mutex<Vec<(String, Value)>> = Mutex::new(Vec::new());
        let tap = |stage: &str, value: &Value| {
            seen.lock().unwrap().push((stage.to_string(), value.clone()));
        };

        let output = ExecutionEngine::new()
            .forward_with_tap(&pipeline, Value::from("ab"), &tap)
            .await
            .unwrap();

        let seen = seen.into_inner().unwrap();
        let names: Vec<&str> = seen.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["upper", "lower", "join", "bracket", "stats"]);
        assert_eq!(seen[3].1, output);
        assert_eq!(seen[4].1, Value::Structured(json!({"char_count": 2, "word_count": 1, "line_count": 1})));
    }

    #[tokio::test]
    async fn test_forward_value_checks_encoding() {
        let pipeline = load("bundles/shout-backwards");
        let result = ExecutionEngine::new()
            .forward_value(&pipeline, Value::Structured(json!("hello")))
            .await;
        assert!(matches!(result, Err(ExecutionError::InvalidEncoding { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_forwards_on_one_instance() {
        let mut registry = StageRegistry::with_builtins();
        registry.register("slow", || {
            Box::new(DelayStage {
                delay: Duration::from_millis(20),
            })
        });

        let pipeline = Arc::new(build(
            &registry,
            manifest(
                Encoding::Bytes,
                "reverse",
                vec![
                    StageSpec::new("slow", "slow"),
                    StageSpec::new("reverse", "reverse").with_inputs(["slow"]),
                ],
            ),
        ));

        let mut handles = Vec::new();
        for i in 0..8 {
            let pipeline = Arc::clone(&pipeline);
            handles.push(tokio::spawn(async move {
                let input = format!("input-{}", i);
                let output = ExecutionEngine::new()
                    .forward(&pipeline, Some(input.as_bytes()), Encoding::Bytes)
                    .await
                    .unwrap();
                (input, output)
            }));
        }

        for handle in handles {
            let (input, output) = handle.await.unwrap();
            let expected: String = input.chars().rev().collect();
            assert_eq!(output, Value::from(expected));
        }
    }
}
