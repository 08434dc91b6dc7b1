// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for bundle loading.

use std::path::PathBuf;
use thiserror::Error;

use super::GraphValidationError;

#[derive(Debug, Error)]
pub enum BundleLoadError {
    #[error("Bundle not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("Malformed manifest in '{}': {reason}", path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("Unresolved resource '{resource}': {reason}")]
    UnresolvedResource { resource: String, reason: String },

    #[error("Unsupported bundle format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Failed to read bundle '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open bundle archive '{}': {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error(transparent)]
    Graph(#[from] GraphValidationError),
}
