// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Where bundle bytes come from: an unpacked directory or a zip archive.

use std::fs;
use std::io::{Read, Seek};
use std::path::{Component, Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::consts::MANIFEST_FILE_NAMES;
use crate::config::ManifestFormat;
use crate::errors::BundleLoadError;

/// Read access to the files of one bundle.
pub trait BundleSource {
    /// Path used in error messages and logs.
    fn location(&self) -> &Path;

    /// Raw manifest bytes and the format implied by its file name.
    fn read_manifest(&mut self) -> Result<(Vec<u8>, ManifestFormat), BundleLoadError>;

    /// Read a resource by its path relative to the bundle root.
    fn read_resource(&mut self, relative: &str) -> Result<Vec<u8>, String>;
}

/// Reject resource paths that could escape the bundle root.
pub fn check_relative_path(relative: &str) -> Result<(), String> {
    let path = Path::new(relative);
    if relative.is_empty() {
        return Err("empty resource path".to_string());
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(format!(
                    "resource path '{}' must be relative to the bundle root",
                    relative
                ))
            }
        }
    }
    Ok(())
}

/// An unpacked bundle on disk.
pub struct DirectorySource {
    root: PathBuf,
    manifest: Option<PathBuf>,
}

impl DirectorySource {
    /// `path` is either the bundle directory or its manifest file.
    pub fn open(path: &Path) -> Result<Self, BundleLoadError> {
        let metadata = fs::metadata(path).map_err(|_| BundleLoadError::NotFound {
            path: path.to_path_buf(),
        })?;

        if metadata.is_dir() {
            return Ok(Self {
                root: path.to_path_buf(),
                manifest: None,
            });
        }

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            root,
            manifest: Some(path.to_path_buf()),
        })
    }

    fn manifest_candidates(&self) -> Vec<PathBuf> {
        match &self.manifest {
            Some(path) => vec![path.clone()],
            None => MANIFEST_FILE_NAMES
                .iter()
                .map(|name| self.root.join(name))
                .collect(),
        }
    }
}

impl BundleSource for DirectorySource {
    fn location(&self) -> &Path {
        self.manifest.as_deref().unwrap_or(&self.root)
    }

    fn read_manifest(&mut self) -> Result<(Vec<u8>, ManifestFormat), BundleLoadError> {
        for candidate in self.manifest_candidates() {
            if !candidate.is_file() {
                continue;
            }
            let file_name = candidate
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let format = ManifestFormat::from_file_name(file_name).ok_or_else(|| {
                BundleLoadError::MalformedManifest {
                    path: candidate.clone(),
                    reason: "manifest must be a .json, .yaml or .yml file".to_string(),
                }
            })?;
            let bytes = fs::read(&candidate).map_err(|source| BundleLoadError::Io {
                path: candidate.clone(),
                source,
            })?;
            return Ok((bytes, format));
        }

        Err(BundleLoadError::MalformedManifest {
            path: self.root.clone(),
            reason: format!("no manifest found (expected one of {})", MANIFEST_FILE_NAMES.join(", ")),
        })
    }

    fn read_resource(&mut self, relative: &str) -> Result<Vec<u8>, String> {
        check_relative_path(relative)?;
        let path = self.root.join(relative);
        fs::read(&path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))
    }
}

/// A packed bundle: a zip archive with the manifest at its root.
pub struct ArchiveSource<R: Read + Seek> {
    archive: ZipArchive<R>,
    location: PathBuf,
}

impl<R: Read + Seek> ArchiveSource<R> {
    pub fn new(reader: R, location: PathBuf) -> Result<Self, BundleLoadError> {
        let archive = ZipArchive::new(reader).map_err(|e| BundleLoadError::Archive {
            path: location.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { archive, location })
    }

    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, String> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
        Ok(Some(bytes))
    }
}

impl<R: Read + Seek> BundleSource for ArchiveSource<R> {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read_manifest(&mut self) -> Result<(Vec<u8>, ManifestFormat), BundleLoadError> {
        for name in MANIFEST_FILE_NAMES {
            let entry = self.read_entry(name).map_err(|reason| BundleLoadError::Archive {
                path: self.location.clone(),
                reason,
            })?;
            if let (Some(bytes), Some(format)) = (entry, ManifestFormat::from_file_name(name)) {
                return Ok((bytes, format));
            }
        }

        Err(BundleLoadError::MalformedManifest {
            path: self.location.clone(),
            reason: format!(
                "no manifest at archive root (expected one of {})",
                MANIFEST_FILE_NAMES.join(", ")
            ),
        })
    }

    fn read_resource(&mut self, relative: &str) -> Result<Vec<u8>, String> {
        check_relative_path(relative)?;
        let name = relative.trim_start_matches("./");
        self.read_entry(name)?
            .ok_or_else(|| format!("'{}' not present in archive", relative))
    }
}
