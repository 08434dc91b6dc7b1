// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod build;
mod bundle;
mod execution;
mod runtime;
mod stage;
mod validation;

pub use build::BuildError;
pub use bundle::BundleLoadError;
pub use execution::ExecutionError;
pub use runtime::RuntimeError;
pub use stage::StageError;
pub use validation::GraphValidationError;
