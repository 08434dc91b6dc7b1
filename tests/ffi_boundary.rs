// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Drives the C ABI the way a foreign host would.

use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::Mutex;

use serial_test::serial;
use stagecraft::boundary::ffi::*;
use stagecraft::boundary::{buffer, sc_slice};

static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

unsafe extern "C" fn capture(message: *const u8, len: usize) {
    let bytes = std::slice::from_raw_parts(message, len);
    MESSAGES
        .lock()
        .unwrap()
        .push(String::from_utf8(bytes.to_vec()).unwrap());
}

fn take_messages() -> Vec<String> {
    std::mem::take(&mut *MESSAGES.lock().unwrap())
}

fn load(path: &str) -> sc_bundle_t {
    let path = CString::new(path).unwrap();
    sc_bundle_from_path(path.as_ptr(), Some(capture))
}

fn read_and_release(buf: sc_slice) -> Vec<u8> {
    assert!(!buf.is_null());
    let bytes = unsafe { buf.as_bytes() }.to_vec();
    sc_buffer_release(buf, Some(capture));
    bytes
}

fn forward(pipeline: sc_pipeline_t, input: &[u8], encoding: u32) -> sc_slice {
    sc_pipeline_forward(pipeline, input.as_ptr(), input.len(), encoding, Some(capture))
}

#[test]
#[serial]
fn test_nonexistent_path_reports_once_and_returns_null_handle() {
    take_messages();
    let handle = load("bundles/does-not-exist");

    assert_eq!(handle, 0);
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("bundles/does-not-exist"), "{}", messages[0]);
}

#[test]
#[serial]
fn test_forward_round_trip() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    assert_ne!(bundle, 0);
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));
    assert_ne!(pipeline, 0);

    assert_eq!(read_and_release(forward(pipeline, b"hello", 0)), b"OLLEH");

    let empty = forward(pipeline, b"", 0);
    assert!(!empty.is_null());
    assert_eq!(empty.len, 0);
    assert!(read_and_release(empty).is_empty());
    assert_eq!(buffer::outstanding(), 0);

    sc_pipeline_release(pipeline, Some(capture));
    sc_bundle_release(bundle, Some(capture));
    assert!(take_messages().is_empty());
}

#[cfg(debug_assertions)]
#[test]
#[serial]
fn test_buffer_double_release_is_reported() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));

    let output = forward(pipeline, b"hello", 0);
    let stale = sc_slice {
        data: output.data,
        len: output.len,
    };
    sc_buffer_release(output, Some(capture));
    assert!(take_messages().is_empty());

    sc_buffer_release(stale, Some(capture));
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("already released"), "{}", messages[0]);
    assert_eq!(buffer::outstanding(), 0);

    sc_pipeline_release(pipeline, Some(capture));
    sc_bundle_release(bundle, Some(capture));
}

#[test]
#[serial]
fn test_runtime_config_overrides_stage() {
    take_messages();
    let bundle = load("bundles/fan-in");
    let config = br#"{"stages": {"join": {"separator": "+"}}}"#;
    let pipeline = sc_pipeline_create(bundle, config.as_ptr(), config.len(), Some(capture));
    assert_ne!(pipeline, 0);

    assert_eq!(read_and_release(forward(pipeline, b"Ab", 0)), b"<<AB+ab>>");

    sc_pipeline_release(pipeline, Some(capture));
    sc_bundle_release(bundle, Some(capture));
    assert!(take_messages().is_empty());
}

#[test]
#[serial]
fn test_invalid_runtime_config_returns_null_handle() {
    take_messages();
    let bundle = load("bundles/fan-in");
    let config = br#"{"stages": {"nope": {}}}"#;
    let pipeline = sc_pipeline_create(bundle, config.as_ptr(), config.len(), Some(capture));

    assert_eq!(pipeline, 0);
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("nope"), "{}", messages[0]);

    sc_bundle_release(bundle, Some(capture));
}

#[test]
#[serial]
fn test_double_release_is_reported() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));

    sc_pipeline_release(pipeline, Some(capture));
    assert!(take_messages().is_empty());

    sc_pipeline_release(pipeline, Some(capture));
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("pipeline handle"), "{}", messages[0]);

    let buf = forward(pipeline, b"hello", 0);
    assert!(buf.is_null());
    assert_eq!(take_messages().len(), 1);

    sc_bundle_release(bundle, Some(capture));
}

#[test]
#[serial]
fn test_null_handle_release_is_ignored() {
    take_messages();
    sc_bundle_release(0, Some(capture));
    sc_pipeline_release(0, Some(capture));
    sc_buffer_release(
        sc_slice {
            data: ptr::null_mut(),
            len: 0,
        },
        Some(capture),
    );
    assert!(take_messages().is_empty());
}

#[test]
#[serial]
fn test_pipeline_survives_bundle_release() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));
    sc_bundle_release(bundle, Some(capture));

    assert_eq!(read_and_release(forward(pipeline, b"abc", 0)), b"CBA");

    sc_pipeline_release(pipeline, Some(capture));
    assert!(take_messages().is_empty());
}

#[test]
#[serial]
fn test_unknown_encoding_code() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));

    assert!(forward(pipeline, b"hello", 42).is_null());
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Invalid encoding"), "{}", messages[0]);

    sc_pipeline_release(pipeline, Some(capture));
    sc_bundle_release(bundle, Some(capture));
}

#[test]
#[serial]
fn test_missing_input_names_consuming_stage() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));

    let buf = sc_pipeline_forward(pipeline, ptr::null(), 0, 0, Some(capture));
    assert!(buf.is_null());
    let messages = take_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("'upper'"), "{}", messages[0]);

    sc_pipeline_release(pipeline, Some(capture));
    sc_bundle_release(bundle, Some(capture));
}

#[test]
#[serial]
fn test_errors_without_callback_still_return_sentinel() {
    let path = CString::new("bundles/does-not-exist").unwrap();
    assert_eq!(sc_bundle_from_path(path.as_ptr(), None), 0);
    assert_eq!(sc_bundle_from_path(ptr::null(), None), 0);
}

#[test]
#[serial]
fn test_bundle_metadata_and_one_shot_run() {
    take_messages();
    let bundle = load("bundles/greeting");

    let metadata: serde_json::Value =
        serde_json::from_slice(&read_and_release(sc_bundle_metadata(bundle, Some(capture))))
            .unwrap();
    assert_eq!(metadata["name"], "greeting");
    assert_eq!(metadata["input"], "structured");
    assert_eq!(metadata["output"], "greet");

    let input = br#"{"name": "Grace"}"#;
    let output = sc_bundle_run_pipeline(
        bundle,
        input.as_ptr(),
        input.len(),
        1,
        ptr::null(),
        0,
        Some(capture),
    );
    assert_eq!(read_and_release(output), b"Hello, Grace!");

    sc_bundle_release(bundle, Some(capture));
    assert!(take_messages().is_empty());
}

#[test]
#[serial]
fn test_archive_bytes_bundle() {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    take_messages();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("manifest.yaml", options).unwrap();
    writer
        .write_all(
            b"format_version: 1\nname: packed\ninput: bytes\noutput: rev\nstages:\n  - name: rev\n    type: reverse\n",
        )
        .unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let bundle = sc_bundle_from_archive_bytes(archive.as_ptr(), archive.len(), Some(capture));
    assert_ne!(bundle, 0);
    let input = b"zip";
    let output = sc_bundle_run_pipeline(
        bundle,
        input.as_ptr(),
        input.len(),
        0,
        ptr::null(),
        0,
        Some(capture),
    );
    assert_eq!(read_and_release(output), b"piz");

    sc_bundle_release(bundle, Some(capture));
    assert!(take_messages().is_empty());
}

#[test]
#[serial]
fn test_shutdown_invalidates_old_handles() {
    take_messages();
    let bundle = load("bundles/shout-backwards");
    let pipeline = sc_pipeline_create(bundle, ptr::null(), 0, Some(capture));
    assert_ne!(pipeline, 0);

    sc_shutdown();

    assert!(forward(pipeline, b"hello", 0).is_null());
    assert_eq!(sc_pipeline_create(bundle, ptr::null(), 0, Some(capture)), 0);
    let messages = take_messages();
    assert_eq!(
        messages,
        vec!["Runtime has been shut down", "Runtime has been shut down"]
    );

    // Loading again starts a fresh generation; old handles stay dead.
    let fresh = load("bundles/shout-backwards");
    assert_ne!(fresh, 0);
    assert_ne!(fresh, bundle);
    sc_bundle_release(bundle, Some(capture));
    assert_eq!(take_messages(), vec!["Runtime has been shut down"]);

    let fresh_pipeline = sc_pipeline_create(fresh, ptr::null(), 0, Some(capture));
    assert_eq!(read_and_release(forward(fresh_pipeline, b"hello", 0)), b"OLLEH");

    sc_pipeline_release(fresh_pipeline, Some(capture));
    sc_bundle_release(fresh, Some(capture));
    assert!(take_messages().is_empty());
}

#[test]
fn test_version_matches_crate() {
    let version = unsafe { CStr::from_ptr(sc_version()) };
    assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
}
