// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::StageError;
use crate::traits::{Signature, Stage, StageContext};
use crate::value::{Value, ValueType};

const ANY: Signature = Signature::new(ValueType::Any, ValueType::Any);

fn first(inputs: Vec<Value>) -> Value {
    inputs
        .into_iter()
        .next()
        .unwrap_or_else(|| Value::Bytes(Vec::new()))
}

/// A stage that always fails for testing failure scenarios
pub struct FailingStage {
    pub message: String,
}

impl FailingStage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn execute(&self, _inputs: Vec<Value>) -> Result<Value, StageError> {
        Err(StageError::new(self.message.clone()))
    }

    fn signature(&self) -> Signature {
        ANY
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// A stage whose `configure` always fails
pub struct RejectingConfigStage;

#[async_trait]
impl Stage for RejectingConfigStage {
    fn configure(&mut self, _ctx: &StageContext<'_>) -> Result<(), StageError> {
        Err(StageError::new("configuration rejected"))
    }

    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        Ok(first(inputs))
    }

    fn signature(&self) -> Signature {
        ANY
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }
}

/// Passes its first input through and counts invocations
pub struct CountingStage {
    pub calls: Arc<AtomicUsize>,
}

impl CountingStage {
    pub fn new(calls: Arc<AtomicUsize>) -> Self {
        Self { calls }
    }
}

#[async_trait]
impl Stage for CountingStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(first(inputs))
    }

    fn signature(&self) -> Signature {
        ANY
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Sleeps before passing its first input through
pub struct DelayStage {
    pub delay: Duration,
}

#[async_trait]
impl Stage for DelayStage {
    async fn execute(&self, inputs: Vec<Value>) -> Result<Value, StageError> {
        tokio::time::sleep(self.delay).await;
        Ok(first(inputs))
    }

    fn signature(&self) -> Signature {
        ANY
    }

    fn name(&self) -> &'static str {
        "delay"
    }
}

/// Declares a byte output but produces a structured value
pub struct WrongOutputStage;

#[async_trait]
impl Stage for WrongOutputStage {
    async fn execute(&self, _inputs: Vec<Value>) -> Result<Value, StageError> {
        Ok(Value::Structured(serde_json::json!({"surprise": true})))
    }

    fn signature(&self) -> Signature {
        Signature::new(ValueType::Any, ValueType::Any)
    }

    fn name(&self) -> &'static str {
        "wrong_output"
    }
}
