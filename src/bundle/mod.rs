// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bundle loading and inspection.
//!
//! A bundle is a manifest plus the resource blobs its stages read. Loading
//! parses the manifest, validates the stage graph and resolves every declared
//! resource, but never instantiates a stage; that is the pipeline builder's job.
//! A loaded [`Bundle`] is immutable and shared between pipelines via `Arc`.

mod resources;
mod source;

pub use resources::ResourceTable;
pub use source::{check_relative_path, ArchiveSource, BundleSource, DirectorySource};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::config::consts::FORMAT_VERSION;
use crate::config::{validate_stage_graph, Manifest, ResourceSpec, StageSpec};
use crate::errors::BundleLoadError;
use crate::observability::messages::bundle::{BundleLoadFailed, BundleLoaded};
use crate::observability::messages::StructuredLog;
use crate::value::Encoding;

/// A validated, immutable pipeline description and its resources.
#[derive(Debug)]
pub struct Bundle {
    manifest: Manifest,
    resources: ResourceTable,
    location: PathBuf,
}

/// Summary of a bundle, serialized as JSON for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleMetadata {
    pub name: String,
    pub format_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input: Encoding,
    pub output: String,
    pub stages: Vec<String>,
    pub resources: Vec<String>,
}

impl Bundle {
    /// Load an unpacked bundle. `path` may name the bundle directory or its manifest file.
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, BundleLoadError> {
        let path = path.as_ref();
        let result = DirectorySource::open(path).and_then(|mut source| Self::from_source(&mut source));
        log_outcome(path, result)
    }

    /// Load a packed (zip) bundle from disk.
    pub fn from_archive(path: impl AsRef<Path>) -> Result<Self, BundleLoadError> {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(|_| BundleLoadError::NotFound {
                path: path.to_path_buf(),
            })
            .and_then(|file| ArchiveSource::new(BufReader::new(file), path.to_path_buf()))
            .and_then(|mut source| Self::from_source(&mut source));
        log_outcome(path, result)
    }

    /// Load a packed (zip) bundle already in memory.
    pub fn from_archive_bytes(bytes: &[u8]) -> Result<Self, BundleLoadError> {
        let location = PathBuf::from("<memory>");
        let result = ArchiveSource::new(Cursor::new(bytes), location.clone())
            .and_then(|mut source| Self::from_source(&mut source));
        log_outcome(&location, result)
    }

    /// Parse, validate and resolve a bundle from any source.
    pub fn from_source(source: &mut dyn BundleSource) -> Result<Self, BundleLoadError> {
        let (bytes, format) = source.read_manifest()?;
        let manifest = Manifest::parse(&bytes, format).map_err(|reason| {
            BundleLoadError::MalformedManifest {
                path: source.location().to_path_buf(),
                reason,
            }
        })?;

        check_format_version(&manifest)?;
        validate_stage_graph(&manifest.stages, &manifest.output)?;
        check_stage_resources(&manifest)?;

        let mut resources = ResourceTable::new();
        for (name, spec) in &manifest.resources {
            let blob = match spec {
                ResourceSpec::Path(relative) => source.read_resource(relative),
                ResourceSpec::Inline(encoded) => STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| format!("invalid base64: {}", e)),
            }
            .map_err(|reason| BundleLoadError::UnresolvedResource {
                resource: name.clone(),
                reason,
            })?;
            resources.insert(name.clone(), blob);
        }

        Ok(Self {
            manifest,
            resources,
            location: source.location().to_path_buf(),
        })
    }

    /// Build a bundle from an in-memory manifest and already-resolved resources.
    pub fn from_manifest(
        manifest: Manifest,
        resources: ResourceTable,
    ) -> Result<Self, BundleLoadError> {
        check_format_version(&manifest)?;
        validate_stage_graph(&manifest.stages, &manifest.output)?;
        check_stage_resources(&manifest)?;

        for name in manifest.resources.keys() {
            if !resources.contains(name) {
                return Err(BundleLoadError::UnresolvedResource {
                    resource: name.clone(),
                    reason: "no blob supplied".to_string(),
                });
            }
        }

        Ok(Self {
            manifest,
            resources,
            location: PathBuf::from("<memory>"),
        })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.manifest.stages
    }

    pub fn stage(&self, name: &str) -> Option<&StageSpec> {
        self.manifest.stage(name)
    }

    pub fn output_stage(&self) -> &str {
        &self.manifest.output
    }

    pub fn input_encoding(&self) -> Encoding {
        self.manifest.input
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn metadata(&self) -> BundleMetadata {
        BundleMetadata {
            name: self.manifest.name.clone(),
            format_version: self.manifest.format_version,
            description: self.manifest.description.clone(),
            input: self.manifest.input,
            output: self.manifest.output.clone(),
            stages: self.manifest.stages.iter().map(|s| s.name.clone()).collect(),
            resources: self.resources.names().map(str::to_string).collect(),
        }
    }
}

fn check_format_version(manifest: &Manifest) -> Result<(), BundleLoadError> {
    if manifest.format_version != FORMAT_VERSION {
        return Err(BundleLoadError::UnsupportedVersion {
            found: manifest.format_version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(())
}

fn check_stage_resources(manifest: &Manifest) -> Result<(), BundleLoadError> {
    let declared: HashSet<&str> = manifest.resources.keys().map(String::as_str).collect();
    for stage in &manifest.stages {
        for resource in &stage.resources {
            if !declared.contains(resource.as_str()) {
                return Err(BundleLoadError::UnresolvedResource {
                    resource: resource.clone(),
                    reason: format!("referenced by stage '{}' but not declared", stage.name),
                });
            }
        }
    }
    Ok(())
}

fn log_outcome(
    path: &Path,
    result: Result<Bundle, BundleLoadError>,
) -> Result<Bundle, BundleLoadError> {
    let source = path.display().to_string();
    match &result {
        Ok(bundle) => BundleLoaded {
            name: bundle.name(),
            source: &source,
            stage_count: bundle.stages().len(),
            resource_count: bundle.resources().len(),
        }
        .log(),
        Err(error) => BundleLoadFailed {
            source: &source,
            error,
        }
        .log(),
    }
    result
}
