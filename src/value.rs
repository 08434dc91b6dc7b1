// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Values that flow along pipeline edges.
//!
//! A [`Value`] is either raw bytes or a structured JSON document. Stages declare
//! which of the two they consume and produce through [`ValueType`]; the pipeline
//! declares the [`Encoding`] of its external input.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::errors::StageError;

/// The unit of data on a pipeline edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bytes(Vec<u8>),
    Structured(serde_json::Value),
}

impl Value {
    /// Decode a boundary byte payload according to the requested encoding.
    pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<Self, serde_json::Error> {
        match encoding {
            Encoding::Bytes => Ok(Value::Bytes(bytes.to_vec())),
            Encoding::Structured => serde_json::from_slice(bytes).map(Value::Structured),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bytes(_) => ValueType::Bytes,
            Value::Structured(_) => ValueType::Structured,
        }
    }

    /// Encode for the boundary: bytes verbatim, structured values as compact JSON.
    pub fn into_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Value::Bytes(bytes) => Ok(bytes),
            Value::Structured(value) => serde_json::to_vec(&value),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            Value::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Structured(value) => Some(value),
            Value::Bytes(_) => None,
        }
    }

    /// Interpret a byte value as UTF-8 text.
    pub fn try_into_text(self) -> Result<String, StageError> {
        match self {
            Value::Bytes(bytes) => String::from_utf8(bytes)
                .map_err(|e| StageError::new(format!("Invalid UTF-8 input: {}", e))),
            Value::Structured(_) => Err(StageError::new(
                "Could not convert structured input to text",
            )),
        }
    }

    pub fn try_into_structured(self) -> Result<serde_json::Value, StageError> {
        match self {
            Value::Structured(value) => Ok(value),
            Value::Bytes(_) => Err(StageError::new(
                "Could not convert byte input to a structured value",
            )),
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Bytes(value.into_bytes())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Bytes(value.as_bytes().to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Structured(value)
    }
}

/// Declared type of a stage input or output.
///
/// `Any` is accepted by, and acceptable to, every other type; the concrete
/// variant is then checked per pass when the value arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bytes,
    Structured,
    Any,
}

impl ValueType {
    /// Whether a consumer declaring `self` can take a value produced as `produced`.
    pub fn accepts(self, produced: ValueType) -> bool {
        matches!(self, ValueType::Any) || matches!(produced, ValueType::Any) || self == produced
    }

    pub fn admits(self, value: &Value) -> bool {
        self.accepts(value.value_type())
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Bytes => write!(f, "bytes"),
            ValueType::Structured => write!(f, "structured"),
            ValueType::Any => write!(f, "any"),
        }
    }
}

/// Encoding of the external input (and of a boundary forward call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Bytes,
    Structured,
}

impl Encoding {
    /// Map the integer code used at the C boundary (0 = bytes, 1 = structured).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Encoding::Bytes),
            1 => Some(Encoding::Structured),
            _ => None,
        }
    }

    pub fn value_type(self) -> ValueType {
        match self {
            Encoding::Bytes => ValueType::Bytes,
            Encoding::Structured => ValueType::Structured,
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value_type())
    }
}
