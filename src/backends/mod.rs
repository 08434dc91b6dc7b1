// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage implementations.
//!
//! ## Local Backend
//! In-process Rust stages for text manipulation and analysis, registered by
//! [`local::register_builtins`]:
//! - **Text transformation**: case conversion, reversal, prefix/suffix, lexicon substitution
//! - **Text analysis**: token counting
//! - **Plumbing**: concatenation of several inputs, JSON field extraction, passthrough
//!
//! Hosts embedding the runtime register their own stage types next to these.
//!
//! ## Stub Backend (Test-Only)
//! - **FailingStage**: always fails, for failure propagation tests
//! - **RejectingConfigStage**: rejects any configuration
//! - **CountingStage** / **DelayStage**: observe and slow down execution
//!
//! # Examples
//!
//! ```rust
//! use stagecraft::backends::local::list_available_types;
//! use stagecraft::config::StageRegistry;
//!
//! let mut registry = StageRegistry::new();
//! stagecraft::backends::local::register_builtins(&mut registry);
//! assert_eq!(registry.len(), list_available_types().len());
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
