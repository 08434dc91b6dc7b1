// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

/// Named, read-only resource blobs resolved from a bundle.
///
/// Blobs are reference counted so that a stage's view of its declared
/// resources shares memory with the bundle.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    entries: BTreeMap<String, Arc<[u8]>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        self.entries.insert(name.into(), data.into());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|blob| blob.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A table holding only `names`. Names not present are skipped.
    pub fn subset<'a, I>(&self, names: I) -> ResourceTable
    where
        I: IntoIterator<Item = &'a String>,
    {
        let entries = names
            .into_iter()
            .filter_map(|name| {
                self.entries
                    .get(name)
                    .map(|blob| (name.clone(), Arc::clone(blob)))
            })
            .collect();
        ResourceTable { entries }
    }
}
