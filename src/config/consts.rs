// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Bundle manifest format version this runtime understands
pub const FORMAT_VERSION: u32 = 1;
/// Input reference naming the pipeline's external input edge
pub const EXTERNAL_INPUT: &str = "$input";
/// Manifest file names probed at the bundle root, in order
pub const MANIFEST_FILE_NAMES: [&str; 3] = ["manifest.json", "manifest.yaml", "manifest.yml"];
/// Stage name used in errors about the runtime configuration blob itself
pub const RUNTIME_CONFIG_SOURCE: &str = "<runtime config>";
/// Fallback worker thread count when parallelism cannot be detected
pub const DEFAULT_WORKER_THREADS: usize = 4;
/// Environment variable holding a tracing filter for the C boundary
pub const LOG_ENV_VAR: &str = "STAGECRAFT_LOG";
/// Environment variable overriding the executor's worker thread count
pub const WORKER_THREADS_ENV_VAR: &str = "STAGECRAFT_WORKER_THREADS";
