// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::RuntimeError;

const GENERATION_SHIFT: u32 = 48;
const SEQUENCE_MASK: u64 = (1 << GENERATION_SHIFT) - 1;

/// Generation a handle was issued under. Zero for the null handle.
pub fn generation_of(handle: u64) -> u16 {
    (handle >> GENERATION_SHIFT) as u16
}

/// Runtime-owned objects addressed by opaque 64-bit handles.
///
/// A handle packs the issuing runtime generation into its top 16 bits and a
/// per-table sequence number below that. Sequence numbers are never reused
/// within a generation, so a released handle stays invalid, and a handle from
/// an earlier generation is recognisable as such after a shutdown.
#[derive(Debug)]
pub struct HandleTable<T> {
    kind: &'static str,
    generation: u16,
    next_sequence: u64,
    entries: HashMap<u64, Arc<T>>,
}

impl<T> HandleTable<T> {
    pub fn new(kind: &'static str, generation: u16) -> Self {
        Self {
            kind,
            generation,
            next_sequence: 1,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn insert(&mut self, value: Arc<T>) -> Result<u64, RuntimeError> {
        if self.next_sequence > SEQUENCE_MASK {
            return Err(RuntimeError::InvalidArgument(format!(
                "{} handle space exhausted",
                self.kind
            )));
        }
        let handle = (u64::from(self.generation) << GENERATION_SHIFT) | self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert(handle, value);
        Ok(handle)
    }

    pub fn get(&self, handle: u64) -> Result<Arc<T>, RuntimeError> {
        self.entries
            .get(&handle)
            .cloned()
            .ok_or_else(|| self.missing(handle))
    }

    pub fn remove(&mut self, handle: u64) -> Result<Arc<T>, RuntimeError> {
        self.entries
            .remove(&handle)
            .ok_or_else(|| self.missing(handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn missing(&self, handle: u64) -> RuntimeError {
        stale_or_invalid(self.kind, self.generation, handle)
    }
}

/// Error for a handle not found in a table of generation `current`.
///
/// Any other non-zero generation was issued by an earlier runtime; generations
/// wrap, so this is an inequality rather than an ordering.
pub fn stale_or_invalid(kind: &'static str, current: u16, handle: u64) -> RuntimeError {
    let issued = generation_of(handle);
    if handle != 0 && issued != 0 && issued != current {
        RuntimeError::RuntimeShutdown
    } else {
        RuntimeError::InvalidHandle { kind, id: handle }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Boundary calls catch panics, so a poisoned table is still consistent:
/// every mutation is a single map operation.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
