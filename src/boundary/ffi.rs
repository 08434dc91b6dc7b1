// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! C ABI for the runtime.
//!
//! Conventions shared by every entry point:
//! * Objects are `uint64_t` handles; `0` is the null handle.
//! * Buffers are returned as [`sc_slice`] and must be released with
//!   [`sc_buffer_release`]. A successful call never returns a null buffer,
//!   even when it is empty.
//! * On failure the optional error callback is invoked exactly once, before
//!   the call returns its sentinel (`0` or a null buffer). The message is
//!   UTF-8, not NUL-terminated, and only valid for the duration of the
//!   callback.
//! * Panics never cross the boundary; they are reported like any other error.
#![allow(non_camel_case_types)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::any::Any;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use crate::boundary::buffer::{self, sc_slice};
use crate::boundary::runtime::BundleLocation;
use crate::boundary::{runtime, runtime_for, shutdown};
use crate::errors::{ExecutionError, RuntimeError};
use crate::observability::messages::boundary::{BoundaryCallFailed, BoundaryPanic};
use crate::observability::messages::StructuredLog;
use crate::value::Encoding;

pub type sc_bundle_t = u64;
pub type sc_pipeline_t = u64;

/// Receives an error message as a pointer and byte length.
pub type sc_error_cb = Option<unsafe extern "C" fn(message: *const u8, len: usize)>;

const NULL_HANDLE: u64 = 0;

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Load an unpacked bundle from a directory or manifest file path (NUL-terminated UTF-8).
#[no_mangle]
pub extern "C" fn sc_bundle_from_path(path: *const c_char, on_error: sc_error_cb) -> sc_bundle_t {
    guard("sc_bundle_from_path", on_error, NULL_HANDLE, || {
        let path = path_arg(path)?;
        runtime()?.load_bundle(BundleLocation::Directory(&path))
    })
}

/// Load a zip-packed bundle from a file path (NUL-terminated UTF-8).
#[no_mangle]
pub extern "C" fn sc_bundle_from_archive(
    path: *const c_char,
    on_error: sc_error_cb,
) -> sc_bundle_t {
    guard("sc_bundle_from_archive", on_error, NULL_HANDLE, || {
        let path = path_arg(path)?;
        runtime()?.load_bundle(BundleLocation::Archive(&path))
    })
}

/// Load a zip-packed bundle from memory. The bytes are copied.
#[no_mangle]
pub extern "C" fn sc_bundle_from_archive_bytes(
    data: *const u8,
    len: usize,
    on_error: sc_error_cb,
) -> sc_bundle_t {
    guard("sc_bundle_from_archive_bytes", on_error, NULL_HANDLE, || {
        let bytes = bytes_arg(data, len)
            .ok_or_else(|| RuntimeError::InvalidArgument("archive data is null".to_string()))?;
        runtime()?.load_bundle(BundleLocation::ArchiveBytes(bytes))
    })
}

/// Bundle summary as a JSON buffer.
#[no_mangle]
pub extern "C" fn sc_bundle_metadata(bundle: sc_bundle_t, on_error: sc_error_cb) -> sc_slice {
    guard("sc_bundle_metadata", on_error, sc_slice::null(), || {
        let json = runtime_for("bundle", bundle)?.bundle_metadata(bundle)?;
        Ok(sc_slice::from_vec(json))
    })
}

/// Build a pipeline from a bundle. `config_json` may be null for defaults.
#[no_mangle]
pub extern "C" fn sc_pipeline_create(
    bundle: sc_bundle_t,
    config_json: *const u8,
    config_len: usize,
    on_error: sc_error_cb,
) -> sc_pipeline_t {
    guard("sc_pipeline_create", on_error, NULL_HANDLE, || {
        let config = bytes_arg(config_json, config_len).unwrap_or_default();
        runtime_for("bundle", bundle)?.create_pipeline(bundle, config)
    })
}

/// Run one forward pass. `encoding` is 0 for bytes, 1 for structured (JSON).
#[no_mangle]
pub extern "C" fn sc_pipeline_forward(
    pipeline: sc_pipeline_t,
    input: *const u8,
    input_len: usize,
    encoding: u32,
    on_error: sc_error_cb,
) -> sc_slice {
    guard("sc_pipeline_forward", on_error, sc_slice::null(), || {
        let encoding = encoding_arg(encoding)?;
        let input = bytes_arg(input, input_len);
        let output = runtime_for("pipeline", pipeline)?.forward(pipeline, input, encoding)?;
        Ok(sc_slice::from_vec(output))
    })
}

/// Build a transient pipeline from `bundle`, run it once and drop it.
#[no_mangle]
pub extern "C" fn sc_bundle_run_pipeline(
    bundle: sc_bundle_t,
    input: *const u8,
    input_len: usize,
    encoding: u32,
    config_json: *const u8,
    config_len: usize,
    on_error: sc_error_cb,
) -> sc_slice {
    guard("sc_bundle_run_pipeline", on_error, sc_slice::null(), || {
        let encoding = encoding_arg(encoding)?;
        let input = bytes_arg(input, input_len);
        let config = bytes_arg(config_json, config_len).unwrap_or_default();
        let output =
            runtime_for("bundle", bundle)?.run_pipeline(bundle, input, encoding, config)?;
        Ok(sc_slice::from_vec(output))
    })
}

/// Release a bundle handle. Pipelines built from it remain usable. `0` is ignored.
#[no_mangle]
pub extern "C" fn sc_bundle_release(bundle: sc_bundle_t, on_error: sc_error_cb) {
    guard("sc_bundle_release", on_error, (), || {
        if bundle == NULL_HANDLE {
            return Ok(());
        }
        runtime_for("bundle", bundle)?.release_bundle(bundle)
    })
}

/// Release a pipeline handle. `0` is ignored.
#[no_mangle]
pub extern "C" fn sc_pipeline_release(pipeline: sc_pipeline_t, on_error: sc_error_cb) {
    guard("sc_pipeline_release", on_error, (), || {
        if pipeline == NULL_HANDLE {
            return Ok(());
        }
        runtime_for("pipeline", pipeline)?.release_pipeline(pipeline)
    })
}

/// Release a buffer returned by this library. Null buffers are ignored.
#[no_mangle]
pub extern "C" fn sc_buffer_release(buf: sc_slice, on_error: sc_error_cb) {
    guard("sc_buffer_release", on_error, (), || unsafe { buffer::release(buf) })
}

/// Stop the runtime, dropping every bundle and pipeline. Buffers already
/// returned stay valid until released.
#[no_mangle]
pub extern "C" fn sc_shutdown() {
    let _ = panic::catch_unwind(shutdown);
}

/// Library version as a static NUL-terminated string. Do not release.
#[no_mangle]
pub extern "C" fn sc_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

fn guard<T, F>(call: &'static str, on_error: sc_error_cb, sentinel: T, body: F) -> T
where
    F: FnOnce() -> Result<T, RuntimeError>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(error)) => {
            report(call, on_error, &error.to_string());
            sentinel
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            BoundaryPanic {
                call,
                message: &message,
            }
            .log();
            report(call, on_error, &RuntimeError::Panic(message).to_string());
            sentinel
        }
    }
}

fn report(call: &str, on_error: sc_error_cb, message: &str) {
    BoundaryCallFailed { call, message }.log();
    if let Some(callback) = on_error {
        unsafe { callback(message.as_ptr(), message.len()) };
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn path_arg(path: *const c_char) -> Result<PathBuf, RuntimeError> {
    if path.is_null() {
        return Err(RuntimeError::InvalidArgument("path is null".to_string()));
    }
    let path = unsafe { CStr::from_ptr(path) }
        .to_str()
        .map_err(|_| RuntimeError::InvalidArgument("path is not valid UTF-8".to_string()))?;
    Ok(PathBuf::from(path))
}

fn bytes_arg<'a>(data: *const u8, len: usize) -> Option<&'a [u8]> {
    if data.is_null() {
        return None;
    }
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

fn encoding_arg(code: u32) -> Result<Encoding, RuntimeError> {
    Encoding::from_code(code).ok_or_else(|| {
        ExecutionError::InvalidEncoding {
            reason: format!("unknown encoding code {}", code),
        }
        .into()
    })
}
