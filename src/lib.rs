// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stagecraft: run pipelines of named stages described by a bundle.
//!
//! A bundle is a manifest plus resource files, unpacked on disk or packed in
//! a zip archive. Loading it validates the stage graph; building a pipeline
//! resolves each stage type through a [`StageRegistry`] and checks that
//! every edge carries a compatible value type. A pipeline instance then runs
//! any number of forward passes, concurrently if the caller wishes.
//!
//! Foreign callers use the C ABI in [`boundary::ffi`], which hands out
//! integer handles and owned byte buffers.

pub mod backends; // built-in stages
pub mod boundary; // runtime lifecycle + C ABI
pub mod bundle; // manifests and resources
pub mod config; // manifest model, registry, runtime config
pub mod engine; // pipeline build + forward pass
pub mod errors;
pub mod observability;
pub mod traits;
pub mod value;

pub use boundary::Runtime;
pub use bundle::Bundle;
pub use config::{RuntimeConfig, StageRegistry};
pub use engine::{ExecutionEngine, PipelineBuilder, PipelineInstance};
pub use traits::{Signature, Stage, StageContext};
pub use value::{Encoding, Value, ValueType};
