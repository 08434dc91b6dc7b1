// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The boundary between foreign callers and the runtime.
//!
//! A process has at most one running [`Runtime`]. It starts lazily on the
//! first load and lives until [`shutdown`]; the next load after that starts a
//! fresh generation. Handles carry the generation that issued them, so a
//! handle that outlived a shutdown is reported as such rather than
//! resolving to an unrelated object.
//!
//! [`ffi`] exposes this lifecycle through a C ABI.

pub mod buffer;
pub mod ffi;
pub mod handles;
pub mod runtime;

pub use buffer::sc_slice;
pub use runtime::{BundleLocation, Runtime};

use std::sync::{Arc, Mutex};

use crate::config::consts::LOG_ENV_VAR;
use crate::config::{RuntimeOptions, StageRegistry};
use crate::errors::RuntimeError;
use crate::observability::init_tracing;
use handles::{lock, stale_or_invalid};

enum State {
    Idle { next_generation: u16 },
    Running(Arc<Runtime>),
}

static STATE: Mutex<State> = Mutex::new(State::Idle { next_generation: 1 });

/// The running runtime, starting one if none is running.
pub fn runtime() -> Result<Arc<Runtime>, RuntimeError> {
    let mut state = lock(&STATE);
    match &*state {
        State::Running(runtime) => Ok(Arc::clone(runtime)),
        State::Idle { next_generation } => {
            if let Ok(filter) = std::env::var(LOG_ENV_VAR) {
                init_tracing(&filter);
            }
            let runtime = Arc::new(Runtime::new(
                StageRegistry::with_builtins(),
                &RuntimeOptions::from_env(),
                *next_generation,
            )?);
            *state = State::Running(Arc::clone(&runtime));
            Ok(runtime)
        }
    }
}

/// The running runtime, for a call made with an existing `handle`.
///
/// Never starts a runtime: without one, no handle can be valid.
pub fn runtime_for(kind: &'static str, handle: u64) -> Result<Arc<Runtime>, RuntimeError> {
    match &*lock(&STATE) {
        State::Running(runtime) => Ok(Arc::clone(runtime)),
        State::Idle { next_generation } => Err(stale_or_invalid(kind, *next_generation, handle)),
    }
}

/// Stop the running runtime, dropping every bundle and pipeline it owns.
///
/// Returns whether a runtime was running. Calls already in flight finish
/// against the old generation.
pub fn shutdown() -> bool {
    let mut state = lock(&STATE);
    let generation = match &*state {
        State::Running(runtime) => runtime.generation(),
        State::Idle { .. } => return false,
    };

    let next_generation = match generation.wrapping_add(1) {
        0 => 1,
        next => next,
    };
    let previous = std::mem::replace(&mut *state, State::Idle { next_generation });
    drop(state);
    drop(previous);
    true
}
