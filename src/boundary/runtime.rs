// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::boundary::handles::{lock, HandleTable};
use crate::bundle::Bundle;
use crate::config::{RuntimeConfig, RuntimeOptions, StageRegistry};
use crate::engine::{ExecutionEngine, PipelineBuilder, PipelineInstance};
use crate::errors::RuntimeError;
use crate::observability::messages::boundary::{RuntimeStarted, RuntimeStopped};
use crate::observability::messages::StructuredLog;
use crate::value::Encoding;

/// Where to load a bundle from.
#[derive(Debug, Clone, Copy)]
pub enum BundleLocation<'a> {
    /// Unpacked bundle directory, or its manifest file
    Directory(&'a Path),
    /// Zip archive on disk
    Archive(&'a Path),
    /// Zip archive in memory
    ArchiveBytes(&'a [u8]),
}

/// One generation of the runtime: registry, object tables and async executor.
///
/// Every method is synchronous; forward passes block on the runtime's own
/// multi-threaded executor. Objects are addressed by handles that are only
/// meaningful to the generation that issued them.
pub struct Runtime {
    generation: u16,
    registry: StageRegistry,
    executor: tokio::runtime::Runtime,
    engine: ExecutionEngine,
    bundles: Mutex<HandleTable<Bundle>>,
    pipelines: Mutex<HandleTable<PipelineInstance>>,
}

impl Runtime {
    pub fn new(
        registry: StageRegistry,
        options: &RuntimeOptions,
        generation: u16,
    ) -> Result<Self, RuntimeError> {
        let executor = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(options.worker_threads.max(1))
            .thread_name("stagecraft-worker")
            .enable_all()
            .build()
            .map_err(RuntimeError::Startup)?;

        RuntimeStarted {
            generation,
            worker_threads: options.worker_threads.max(1),
            stage_types: registry.len(),
        }
        .log();

        Ok(Self {
            generation,
            registry,
            executor,
            engine: ExecutionEngine::new(),
            bundles: Mutex::new(HandleTable::new("bundle", generation)),
            pipelines: Mutex::new(HandleTable::new("pipeline", generation)),
        })
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn load_bundle(&self, location: BundleLocation<'_>) -> Result<u64, RuntimeError> {
        let bundle = match location {
            BundleLocation::Directory(path) => Bundle::from_directory(path)?,
            BundleLocation::Archive(path) => Bundle::from_archive(path)?,
            BundleLocation::ArchiveBytes(bytes) => Bundle::from_archive_bytes(bytes)?,
        };
        lock(&self.bundles).insert(Arc::new(bundle))
    }

    pub fn bundle(&self, handle: u64) -> Result<Arc<Bundle>, RuntimeError> {
        lock(&self.bundles).get(handle)
    }

    /// Bundle summary as JSON.
    pub fn bundle_metadata(&self, handle: u64) -> Result<Vec<u8>, RuntimeError> {
        let bundle = self.bundle(handle)?;
        Ok(serde_json::to_vec(&bundle.metadata())?)
    }

    /// Build a pipeline from a loaded bundle. `config_json` may be empty.
    pub fn create_pipeline(&self, bundle: u64, config_json: &[u8]) -> Result<u64, RuntimeError> {
        let pipeline = self.build(bundle, config_json)?;
        lock(&self.pipelines).insert(Arc::new(pipeline))
    }

    pub fn pipeline(&self, handle: u64) -> Result<Arc<PipelineInstance>, RuntimeError> {
        lock(&self.pipelines).get(handle)
    }

    /// Run one forward pass and encode its output for the caller.
    pub fn forward(
        &self,
        pipeline: u64,
        input: Option<&[u8]>,
        encoding: Encoding,
    ) -> Result<Vec<u8>, RuntimeError> {
        // The table lock is not held while stages run
        let pipeline = self.pipeline(pipeline)?;
        self.forward_instance(&pipeline, input, encoding)
    }

    /// Build a transient pipeline, run it once and drop it.
    pub fn run_pipeline(
        &self,
        bundle: u64,
        input: Option<&[u8]>,
        encoding: Encoding,
        config_json: &[u8],
    ) -> Result<Vec<u8>, RuntimeError> {
        let pipeline = self.build(bundle, config_json)?;
        self.forward_instance(&pipeline, input, encoding)
    }

    pub fn release_bundle(&self, handle: u64) -> Result<(), RuntimeError> {
        lock(&self.bundles).remove(handle).map(drop)
    }

    pub fn release_pipeline(&self, handle: u64) -> Result<(), RuntimeError> {
        lock(&self.pipelines).remove(handle).map(drop)
    }

    /// Live (bundle, pipeline) handle counts.
    pub fn outstanding(&self) -> (usize, usize) {
        (lock(&self.bundles).len(), lock(&self.pipelines).len())
    }

    fn build(&self, bundle: u64, config_json: &[u8]) -> Result<PipelineInstance, RuntimeError> {
        let bundle = self.bundle(bundle)?;
        let config = RuntimeConfig::from_json_bytes(config_json)?;
        Ok(PipelineBuilder::new(&self.registry).build(bundle, &config)?)
    }

    fn forward_instance(
        &self,
        pipeline: &PipelineInstance,
        input: Option<&[u8]>,
        encoding: Encoding,
    ) -> Result<Vec<u8>, RuntimeError> {
        let output = self
            .executor
            .block_on(self.engine.forward(pipeline, input, encoding))?;
        Ok(output.into_bytes()?)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let (bundles_dropped, pipelines_dropped) = self.outstanding();
        RuntimeStopped {
            generation: self.generation,
            bundles_dropped,
            pipelines_dropped,
        }
        .log();
    }
}
