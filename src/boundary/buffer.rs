// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#![allow(non_camel_case_types)]

use std::ptr;

use crate::errors::RuntimeError;

/// A runtime-allocated byte buffer handed to the caller.
///
/// On success `data` is never null, even for an empty buffer. A null `data`
/// is the failure sentinel. The caller owns the buffer until it passes it to
/// `sc_buffer_release`.
#[repr(C)]
#[derive(Debug)]
pub struct sc_slice {
    pub data: *mut u8,
    pub len: usize,
}

impl sc_slice {
    pub fn null() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// Transfer ownership of `bytes` to a caller-visible buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let mut data = bytes.into_boxed_slice();
        let slice = Self {
            data: data.as_mut_ptr(),
            len: data.len(),
        };
        std::mem::forget(data);
        ledger::record(slice.data, slice.len);
        slice
    }

    /// View the buffer's bytes.
    ///
    /// # Safety
    /// `self` must come from [`sc_slice::from_vec`] and not yet be released.
    pub unsafe fn as_bytes(&self) -> &[u8] {
        if self.data.is_null() {
            return &[];
        }
        std::slice::from_raw_parts(self.data, self.len)
    }
}

/// Free a buffer previously returned to the caller. Null buffers are ignored.
///
/// # Safety
/// `slice` must be null or come from [`sc_slice::from_vec`] with its `len`
/// unchanged. Debug builds refuse a second release, a release with the wrong
/// length and a pointer they never issued; release builds cannot.
pub unsafe fn release(slice: sc_slice) -> Result<(), RuntimeError> {
    if slice.data.is_null() {
        return Ok(());
    }
    match ledger::retire(slice.data, slice.len) {
        Disposal::Free => {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(slice.data, slice.len)));
            Ok(())
        }
        Disposal::Quarantine => {
            ptr::write_bytes(slice.data, RELEASED_FILL, slice.len);
            Ok(())
        }
        Disposal::Refuse(reason) => Err(RuntimeError::InvalidArgument(format!(
            "buffer {:p} (len {}) {}",
            slice.data, slice.len, reason
        ))),
    }
}

/// Buffers currently held by callers, as tracked by the debug ledger.
pub fn outstanding() -> usize {
    ledger::outstanding()
}

/// Byte pattern written over quarantined buffers.
const RELEASED_FILL: u8 = 0xDD;

/// What `release` does with a buffer after the ledger has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(debug_assertions), allow(dead_code))]
enum Disposal {
    Free,
    /// Keep the allocation so its address is never issued again
    Quarantine,
    Refuse(&'static str),
}

// Debug builds never hand a released address back to the allocator, so a
// stale copy of a released buffer cannot alias a newer one.
#[cfg(debug_assertions)]
mod ledger {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::Disposal;
    use crate::boundary::handles::lock;
    use crate::observability::messages::boundary::BufferReleaseRefused;
    use crate::observability::messages::StructuredLog;

    #[derive(Debug, Clone, Copy)]
    enum Entry {
        Live { len: usize },
        Quarantined,
        // Empty buffers share one dangling address and own no memory
        Empty { count: usize },
    }

    static LEDGER: Mutex<BTreeMap<usize, Entry>> = Mutex::new(BTreeMap::new());

    pub fn record(data: *mut u8, len: usize) {
        let mut ledger = lock(&LEDGER);
        let address = data as usize;
        if len == 0 {
            let count = match ledger.get(&address) {
                Some(Entry::Empty { count }) => *count,
                _ => 0,
            };
            ledger.insert(address, Entry::Empty { count: count + 1 });
        } else {
            ledger.insert(address, Entry::Live { len });
        }
    }

    pub fn retire(data: *mut u8, len: usize) -> Disposal {
        let mut ledger = lock(&LEDGER);
        let address = data as usize;

        let reason = match ledger.get(&address).copied() {
            Some(Entry::Live { len: issued }) if issued == len => {
                ledger.insert(address, Entry::Quarantined);
                return Disposal::Quarantine;
            }
            Some(Entry::Empty { count }) if len == 0 && count > 0 => {
                ledger.insert(address, Entry::Empty { count: count - 1 });
                return Disposal::Free;
            }
            Some(Entry::Live { .. }) => "length does not match the issued buffer",
            Some(Entry::Empty { .. }) if len != 0 => "length does not match the issued buffer",
            Some(Entry::Empty { .. }) | Some(Entry::Quarantined) => "was already released",
            None => "was not issued by this runtime",
        };

        BufferReleaseRefused {
            address,
            len,
            reason,
        }
        .log();
        Disposal::Refuse(reason)
    }

    pub fn outstanding() -> usize {
        lock(&LEDGER)
            .values()
            .map(|entry| match entry {
                Entry::Live { .. } => 1,
                Entry::Empty { count } => *count,
                Entry::Quarantined => 0,
            })
            .sum()
    }
}

#[cfg(not(debug_assertions))]
mod ledger {
    use super::Disposal;

    pub fn record(_data: *mut u8, _len: usize) {}

    pub fn retire(_data: *mut u8, _len: usize) -> Disposal {
        Disposal::Free
    }

    pub fn outstanding() -> usize {
        0
    }
}
