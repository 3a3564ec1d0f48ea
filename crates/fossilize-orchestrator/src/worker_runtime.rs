// SPDX-License-Identifier: Apache-2.0
//! What a worker subprocess actually runs: replay the archive, but dispatch only the pipeline
//! indices this worker was assigned, skip anything depending on an already-banned module, and
//! narrate progress to the master over stdout.
//!
//! [`run_worker`] is the entry point an embedding worker binary calls after opening its archive
//! and installing [`crate::signal_unix::install`] (on unix). Everything here runs inside the
//! subprocess [`crate::master::Master`] is watching, never inside the master itself.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use fossilize_db::Archive;
use fossilize_model::{
 ComputePipelineInfo, GraphicsPipelineInfo, Hash, RaytracingPipelineInfo, ResourceTag,
};
use fossilize_replay::{CreateOutcome, CreatorError, Replayer, ReplayStats, StateCreatorInterface};

use crate::fault_set::FaultSet;
use crate::message::{PipelineKind, WorkerMessage};
use crate::partition::Partition;

/// An inner [`StateCreatorInterface`] returns this error to signal "the driver's validation layer
/// rejected this pipeline" rather than a real crash-worthy failure. [`PartitionedCreator`]
/// recognizes it via downcast and turns it into a [`WorkerMessage::ValidationFailed`] instead of
/// aborting the whole replay.
#[derive(Debug)]
pub struct ValidationRejected;

impl std::fmt::Display for ValidationRejected {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.write_str("pipeline rejected by validation")
 }
}

impl std::error::Error for ValidationRejected {}

/// Builds a boxed [`ValidationRejected`], for an inner creator to return from an
/// `enqueue_create_*_pipeline` method.
#[must_use]
pub fn validation_rejected() -> CreatorError {
 Box::new(ValidationRejected)
}

/// Precomputes, for one pipeline-bearing [`ResourceTag`], the index each hash occupies in the
/// archive's own ordering — the same ordering [`crate::partition::partition_evenly`] sliced
/// across workers.
fn index_of(archive: &Archive, tag: ResourceTag) -> HashMap<Hash, u64> {
 archive
.get_hash_list_for_resource_tag(tag)
.iter()
.enumerate()
.map(|(index, &hash)| (hash, index as u64))
.collect()
}

/// Wraps a real [`StateCreatorInterface`] so only this worker's assigned pipeline indices are
/// dispatched, modules already known to crash the driver are skipped outright, and every
/// dispatch (or validation rejection) is narrated to the master as a [`WorkerMessage`].
pub struct PartitionedCreator<'a, C: StateCreatorInterface> {
 inner: &'a C,
 partitions: [Partition; 3],
 index_of: [HashMap<Hash, u64>; 3],
 fault_set: &'a FaultSet,
 sink: Mutex<Box<dyn Write + Send + 'a>>,
}

impl<'a, C: StateCreatorInterface> PartitionedCreator<'a, C> {
 /// Builds a creator wrapper for one archive's replay, given the per-kind index partitions
 /// this worker owns and the modules already known to crash the driver.
 pub fn new(
 archive: &Archive,
 inner: &'a C,
 partitions: [Partition; 3],
 fault_set: &'a FaultSet,
 sink: Box<dyn Write + Send + 'a>,
 ) -> Self {
 Self {
 inner,
 partitions,
 index_of: [
 index_of(archive, ResourceTag::GraphicsPipeline),
 index_of(archive, ResourceTag::ComputePipeline),
 index_of(archive, ResourceTag::RaytracingPipeline),
 ],
 fault_set,
 sink: Mutex::new(sink),
 }
 }

 fn emit(&self, message: &WorkerMessage) {
 let mut sink = self.sink.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
 let _ = sink.write_all(message.encode().as_bytes());
 let _ = sink.flush();
 }

 /// `Some(true)` if `hash`'s index under `kind` falls inside this worker's partition;
 /// `Some(false)` if it's outside it; `None` if the hash isn't in the archive's own ordering
 /// at all (defensive — `Replayer` only ever calls with hashes it read from the archive).
 fn owns(&self, kind: PipelineKind, hash: Hash) -> Option<bool> {
 let slot = crate::control_block::pipeline_kind_index(kind);
 let index = *self.index_of[slot].get(&hash)?;
 Some(self.partitions[slot].as_range().contains(&(index as usize)))
 }

 fn banned(&self, modules: &[Hash]) -> bool {
 modules.iter().any(|module| self.fault_set.contains(*module))
 }

 /// Runs `dispatch` for a pipeline this worker owns and isn't banned, narrating the outcome.
 /// Pipelines outside this worker's partition are silently skipped — another worker (or a
 /// previous generation, already credited in [`crate::master::Master::finish`]) owns them.
 fn dispatch_pipeline(
 &self,
 kind: PipelineKind,
 hash: Hash,
 dependencies: &[Hash],
 dispatch: impl FnOnce() -> Result<CreateOutcome, CreatorError>,
 ) -> Result<CreateOutcome, CreatorError> {
 match self.owns(kind, hash) {
 Some(true) => {}
 _ => return Ok(CreateOutcome::Skipped),
 }
 if self.banned(dependencies) {
 return Ok(CreateOutcome::Skipped);
 }

 #[cfg(unix)]
 crate::signal_unix::set_current_dependencies(dependencies);

 let index = self.index_of[crate::control_block::pipeline_kind_index(kind)][&hash];
 let outcome = dispatch();

 #[cfg(unix)]
 crate::signal_unix::clear_current_dependencies();

 match outcome {
 Ok(CreateOutcome::Created) => {
 self.emit(&WorkerMessage::Progress { kind, index, hash });
 Ok(CreateOutcome::Created)
 }
 Ok(CreateOutcome::Skipped) => {
 self.emit(&WorkerMessage::Progress { kind, index, hash });
 Ok(CreateOutcome::Skipped)
 }
 Err(error) if error.downcast_ref::<ValidationRejected>().is_some() => {
 self.emit(&WorkerMessage::ValidationFailed { kind, hash });
 Ok(CreateOutcome::Skipped)
 }
 Err(error) => Err(error),
 }
 }
}

impl<C: StateCreatorInterface> StateCreatorInterface for PartitionedCreator<'_, C> {
 fn enqueue_create_application_info(
 &self,
 hash: Hash,
 info: &fossilize_model::ApplicationInfoInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_application_info(hash, info)
 }

 fn enqueue_create_application_blob_link(
 &self,
 hash: Hash,
 info: &fossilize_model::ApplicationBlobLinkInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_application_blob_link(hash, info)
 }

 fn enqueue_create_shader_module(
 &self,
 hash: Hash,
 info: &fossilize_model::ShaderModuleInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_shader_module(hash, info)
 }

 fn enqueue_create_sampler(
 &self,
 hash: Hash,
 info: &fossilize_model::SamplerInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_sampler(hash, info)
 }

 fn enqueue_create_descriptor_set_layout(
 &self,
 hash: Hash,
 info: &fossilize_model::DescriptorSetLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_descriptor_set_layout(hash, info)
 }

 fn enqueue_create_pipeline_layout(
 &self,
 hash: Hash,
 info: &fossilize_model::PipelineLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_pipeline_layout(hash, info)
 }

 fn enqueue_create_render_pass(
 &self,
 hash: Hash,
 info: &fossilize_model::RenderPassInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 self.inner.enqueue_create_render_pass(hash, info)
 }

 fn enqueue_create_graphics_pipeline(
 &self,
 hash: Hash,
 info: &GraphicsPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 let deps: Vec<Hash> = info.stages.iter().map(|stage| stage.module).collect();
 self.dispatch_pipeline(PipelineKind::Graphics, hash, &deps, || {
 self.inner.enqueue_create_graphics_pipeline(hash, info)
 })
 }

 fn enqueue_create_compute_pipeline(
 &self,
 hash: Hash,
 info: &ComputePipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 let deps = [info.stage.module];
 self.dispatch_pipeline(PipelineKind::Compute, hash, &deps, || {
 self.inner.enqueue_create_compute_pipeline(hash, info)
 })
 }

 fn enqueue_create_raytracing_pipeline(
 &self,
 hash: Hash,
 info: &RaytracingPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 let deps: Vec<Hash> = info.stages.iter().map(|stage| stage.module).collect();
 self.dispatch_pipeline(PipelineKind::Raytrace, hash, &deps, || {
 self.inner.enqueue_create_raytracing_pipeline(hash, info)
 })
 }

 fn sync_threads(&self) -> Result<(), CreatorError> {
 self.inner.sync_threads()
 }
}

/// Replays `archive` against `creator`, restricted to `partitions`, emitting
/// [`WorkerMessage`]s to `output` as pipelines complete and a [`WorkerMessage::Heartbeat`] every
/// `heartbeat_interval` while replay is in flight.
///
/// # Errors
///
/// Returns whatever [`fossilize_replay::ReplayError`] the underlying replay hits — a decode
/// failure, an unsatisfiable dependency, or a hard (non-validation) creator error.
pub fn run_worker<C: StateCreatorInterface>(
 archive: &Archive,
 creator: &C,
 partitions: [Partition; 3],
 fault_set: &FaultSet,
 output: Box<dyn Write + Send>,
 heartbeat_interval: Duration,
) -> Result<ReplayStats, fossilize_replay::ReplayError> {
 let stop = AtomicBool::new(false);
 let heartbeat_sink = Mutex::new(output);

 std::thread::scope(|scope| {
 scope.spawn(|| {
 while !stop.load(Ordering::Relaxed) {
 std::thread::sleep(heartbeat_interval);
 if stop.load(Ordering::Relaxed) {
 break;
 }
 let mut sink = heartbeat_sink.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
 let _ = sink.write_all(WorkerMessage::Heartbeat.encode().as_bytes());
 let _ = sink.flush();
 }
 });

 let sink: Box<dyn Write + Send> = Box::new(HeartbeatSinkHandle(&heartbeat_sink));
 let partitioned = PartitionedCreator::new(archive, creator, partitions, fault_set, sink);
 let result = Replayer::new(archive).replay(&partitioned);
 stop.store(true, Ordering::Relaxed);
 result
 })
}

/// A `Write` adapter over the shared heartbeat sink, so both the heartbeat thread and the
/// replay's own progress messages serialize through the same locked handle instead of
/// interleaving partial writes.
struct HeartbeatSinkHandle<'a>(&'a Mutex<Box<dyn Write + Send>>);

impl Write for HeartbeatSinkHandle<'_> {
 fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
 self.0
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.write(buf)
 }

 fn flush(&mut self) -> std::io::Result<()> {
 self.0
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.flush()
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use fossilize_codec::encode_blob;
 use fossilize_db::AccessMode;
 use fossilize_model::{NormalizedObject, SamplerInfo, ShaderModuleInfo, ShaderStage};
 use std::sync::Mutex as StdMutex;

 #[derive(Default)]
 struct CountingCreator {
 compute_created: StdMutex<Vec<Hash>>,
 reject_hash: Option<Hash>,
 }

 impl StateCreatorInterface for CountingCreator {
 fn enqueue_create_application_info(
 &self,
 _hash: Hash,
 _info: &fossilize_model::ApplicationInfoInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_application_blob_link(
 &self,
 _hash: Hash,
 _info: &fossilize_model::ApplicationBlobLinkInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_shader_module(
 &self,
 _hash: Hash,
 _info: &ShaderModuleInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_sampler(
 &self,
 _hash: Hash,
 _info: &SamplerInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_descriptor_set_layout(
 &self,
 _hash: Hash,
 _info: &fossilize_model::DescriptorSetLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_pipeline_layout(
 &self,
 _hash: Hash,
 _info: &fossilize_model::PipelineLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_render_pass(
 &self,
 _hash: Hash,
 _info: &fossilize_model::RenderPassInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_graphics_pipeline(
 &self,
 _hash: Hash,
 _info: &GraphicsPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_compute_pipeline(
 &self,
 hash: Hash,
 _info: &ComputePipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 if self.reject_hash == Some(hash) {
 return Err(validation_rejected());
 }
 self.compute_created.lock().unwrap().push(hash);
 Ok(CreateOutcome::Created)
 }
 fn enqueue_create_raytracing_pipeline(
 &self,
 _hash: Hash,
 _info: &RaytracingPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 Ok(CreateOutcome::Created)
 }
 fn sync_threads(&self) -> Result<(), CreatorError> {
 Ok(())
 }
 }

 fn temp_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!("fossilize-worker-runtime-{name}-{}.foz", std::process::id()));
 path
 }

 fn write_compute_pipeline(archive: &mut Archive, hash: Hash, module: Hash) {
 let info = ComputePipelineInfo {
 flags: 0,
 stage: ShaderStage { stage: 0, module, entry_point: "main".into() },
 layout: 0,
 base_pipeline: None,
 };
 let bytes = encode_blob(&NormalizedObject::ComputePipeline(info));
 archive.write_entry(ResourceTag::ComputePipeline, hash, &bytes, false).unwrap();
 }

 #[test]
 fn only_owned_indices_are_dispatched() {
 let path = temp_path("partition");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 write_compute_pipeline(&mut archive, 10, 0);
 write_compute_pipeline(&mut archive, 20, 0);
 write_compute_pipeline(&mut archive, 30, 0);

 let creator = CountingCreator::default();
 let fault_set = FaultSet::new();
 let partitions = [Partition { start: 0, end: 0 }, Partition { start: 1, end: 2 }, Partition { start: 0, end: 0 }];
 let stats = run_worker(
 &archive,
 &creator,
 partitions,
 &fault_set,
 Box::new(std::io::sink()),
 Duration::from_secs(3600),
 )
.unwrap();

 assert_eq!(creator.compute_created.lock().unwrap().as_slice(), &[20]);
 assert_eq!(stats.created, 1);
 assert_eq!(stats.skipped, 2);

 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn banned_module_skips_the_dependent_pipeline() {
 let path = temp_path("banned");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 write_compute_pipeline(&mut archive, 10, 0xbad);

 let creator = CountingCreator::default();
 let fault_set = FaultSet::new();
 fault_set.insert(0xbad);
 let partitions = [Partition { start: 0, end: 0 }, Partition { start: 0, end: 1 }, Partition { start: 0, end: 0 }];
 let stats = run_worker(
 &archive,
 &creator,
 partitions,
 &fault_set,
 Box::new(std::io::sink()),
 Duration::from_secs(3600),
 )
.unwrap();

 assert!(creator.compute_created.lock().unwrap().is_empty());
 assert_eq!(stats.skipped, 1);

 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn validation_rejection_is_reported_not_fatal() {
 let path = temp_path("rejected");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 write_compute_pipeline(&mut archive, 10, 0);

 let creator = CountingCreator { reject_hash: Some(10),.CountingCreator::default() };
 let fault_set = FaultSet::new();
 let partitions = [Partition { start: 0, end: 0 }, Partition { start: 0, end: 1 }, Partition { start: 0, end: 0 }];
 let stats = run_worker(
 &archive,
 &creator,
 partitions,
 &fault_set,
 Box::new(std::io::sink()),
 Duration::from_secs(3600),
 )
.unwrap();

 assert!(creator.compute_created.lock().unwrap().is_empty());
 assert_eq!(stats.skipped, 1);

 std::fs::remove_file(&path).ok();
 }
}
