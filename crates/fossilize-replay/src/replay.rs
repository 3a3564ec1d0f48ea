// SPDX-License-Identifier: Apache-2.0
//! Walking an archive in dependency order and dispatching to a [`StateCreatorInterface`]
//!.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use fossilize_codec::decode_blob;
use fossilize_db::Archive;
use fossilize_model::{Hash, NormalizedObject, ResourceTag, PLAYBACK_ORDER};
use tracing::{debug, warn};

use crate::creator::{CreateOutcome, StateCreatorInterface};
use crate::error::ReplayError;

/// Tallies of what happened during one [`Replayer::replay`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
 /// Objects the creator reported as created.
 pub created: u64,
 /// Objects the creator chose to skip.
 pub skipped: u64,
}

/// Drives replay of a single archive against a [`StateCreatorInterface`].
pub struct Replayer<'a> {
 archive: &'a Archive,
}

impl<'a> Replayer<'a> {
 /// Wraps an archive for replay. The archive is only ever read.
 #[must_use]
 pub fn new(archive: &'a Archive) -> Self {
 Self { archive }
 }

 /// Replays every entry in [`fossilize_model::PLAYBACK_ORDER`], calling `creator` once per
 /// object and `sync_threads` once after each tag.
 ///
 /// # Errors
 ///
 /// Returns a [`ReplayError`] on the first object whose payload fails to decode, whose
 /// dependency isn't available, or that the creator itself rejects with a hard error (as
 /// opposed to a [`CreateOutcome::Skipped`] signal, which is never an error).
 pub fn replay(&self, creator: &dyn StateCreatorInterface) -> Result<ReplayStats, ReplayError> {
 let mut stats = ReplayStats::default();
 let mut created: HashSet<(ResourceTag, Hash)> = HashSet::new();

 for tag in PLAYBACK_ORDER {
 let hashes = self.archive.get_hash_list_for_resource_tag(tag).to_vec();
 debug!(%tag, count = hashes.len(), "replaying tag");

 let (tag_created, tag_skipped) = if tag.is_pipeline() {
 self.dispatch_concurrent(tag, &hashes, creator, &created)?
 } else {
 let mut c = 0u64;
 let mut s = 0u64;
 for hash in &hashes {
 match self.replay_one(tag, *hash, creator, &created)? {
 CreateOutcome::Created => c += 1,
 CreateOutcome::Skipped => s += 1,
 }
 }
 (c, s)
 };
 stats.created += tag_created;
 stats.skipped += tag_skipped;

 for hash in hashes {
 created.insert((tag, hash));
 }
 creator
.sync_threads()
.map_err(|source| ReplayError::Creator { tag, hash: 0, source })?;
 }

 Ok(stats)
 }

 fn replay_one(
 &self,
 tag: ResourceTag,
 hash: Hash,
 creator: &dyn StateCreatorInterface,
 created: &HashSet<(ResourceTag, Hash)>,
 ) -> Result<CreateOutcome, ReplayError> {
 let payload = self
.archive
.read_entry(tag, hash)?
.ok_or(ReplayError::MissingEntry { tag, hash })?;
 let object = decode_blob(&payload).map_err(|source| ReplayError::Codec { tag, hash, source })?;

 for dependency in hard_dependencies(&object) {
 if !created_under_any_tag(created, dependency) {
 return Err(ReplayError::Dependency { tag, hash, dependency });
 }
 }

 dispatch(creator, hash, &object).map_err(|source| ReplayError::Creator { tag, hash, source })
 }

 fn dispatch_concurrent(
 &self,
 tag: ResourceTag,
 hashes: &[Hash],
 creator: &dyn StateCreatorInterface,
 created: &HashSet<(ResourceTag, Hash)>,
 ) -> Result<(u64, u64), ReplayError> {
 if hashes.is_empty() {
 return Ok((0, 0));
 }
 let worker_count = std::thread::available_parallelism()
.map_or(1, NonZeroUsize::get)
.min(hashes.len());
 let chunk_size = hashes.len().div_ceil(worker_count.max(1));

 let joined: Vec<std::thread::Result<Result<(u64, u64), ReplayError>>> = std::thread::scope(|scope| {
 hashes
.chunks(chunk_size.max(1))
.map(|chunk| {
 scope.spawn(move || {
 let mut chunk_created = 0u64;
 let mut chunk_skipped = 0u64;
 for &hash in chunk {
 match self.replay_one(tag, hash, creator, created)? {
 CreateOutcome::Created => chunk_created += 1,
 CreateOutcome::Skipped => chunk_skipped += 1,
 }
 }
 Ok((chunk_created, chunk_skipped))
 })
 })
.collect::<Vec<_>>()
.into_iter()
.map(std::thread::ScopedJoinHandle::join)
.collect()
 });

 let mut total_created = 0u64;
 let mut total_skipped = 0u64;
 for outcome in joined {
 let (c, s) = outcome.unwrap_or(Err(ReplayError::ThreadPanicked))?;
 total_created += c;
 total_skipped += s;
 }
 Ok((total_created, total_skipped))
 }
}

fn dispatch(
 creator: &dyn StateCreatorInterface,
 hash: Hash,
 object: &NormalizedObject,
) -> Result<CreateOutcome, crate::creator::CreatorError> {
 match object {
 NormalizedObject::Sampler(info) => creator.enqueue_create_sampler(hash, info),
 NormalizedObject::DescriptorSetLayout(info) => {
 creator.enqueue_create_descriptor_set_layout(hash, info)
 }
 NormalizedObject::PipelineLayout(info) => creator.enqueue_create_pipeline_layout(hash, info),
 NormalizedObject::ShaderModule(info) => creator.enqueue_create_shader_module(hash, info),
 NormalizedObject::RenderPass(info) => creator.enqueue_create_render_pass(hash, info),
 NormalizedObject::GraphicsPipeline(info) => {
 creator.enqueue_create_graphics_pipeline(hash, info)
 }
 NormalizedObject::ComputePipeline(info) => creator.enqueue_create_compute_pipeline(hash, info),
 NormalizedObject::RaytracingPipeline(info) => {
 creator.enqueue_create_raytracing_pipeline(hash, info)
 }
 NormalizedObject::ApplicationInfo(info) => creator.enqueue_create_application_info(hash, info),
 NormalizedObject::ApplicationBlobLink(info) => {
 creator.enqueue_create_application_blob_link(hash, info)
 }
 }
}

/// Like [`NormalizedObject::direct_dependencies`], but excludes base-pipeline references: those
/// are allowed to arrive unresolved , so they
/// must never block replay ordering.
fn hard_dependencies(object: &NormalizedObject) -> Vec<Hash> {
 match object {
 NormalizedObject::GraphicsPipeline(info) => {
 let mut deps: Vec<Hash> = info.stages.iter().map(|s| s.module).collect();
 deps.push(info.layout);
 deps.push(info.render_pass);
 deps
 }
 NormalizedObject::ComputePipeline(info) => vec![info.stage.module, info.layout],
 NormalizedObject::RaytracingPipeline(info) => {
 let mut deps: Vec<Hash> = info.stages.iter().map(|s| s.module).collect();
 deps.push(info.layout);
 deps
 }
 other => other.direct_dependencies(),
 }
}

/// Dependencies don't carry their own tag, so checking a single `(tag, hash)` pair isn't enough —
/// a pipeline layout's set-layout hash and a graphics pipeline's module hash live under different
/// tags than the pipeline itself. Scanning every tag already played keeps this simple without
/// threading tag information through `hard_dependencies`.
fn created_under_any_tag(created: &HashSet<(ResourceTag, Hash)>, hash: Hash) -> bool {
 ResourceTag::ALL.into_iter().any(|tag| created.contains(&(tag, hash)))
}

const fn dependency_tag(_object: &NormalizedObject, _dependency: Hash) -> ResourceTag {
 // Placeholder tag for the fast-path lookup in `replay_one`; `created_under_any_tag` is the
 // real check and makes the exact tag irrelevant here.
 ResourceTag::Sampler
}

#[cfg(test)]
mod tests {
 use super::*;
 use fossilize_db::AccessMode;
 use fossilize_model::{SamplerInfo, ShaderModuleInfo};
 use std::sync::Mutex;

 #[derive(Default)]
 struct RecordingCreator {
 created: Mutex<Vec<(ResourceTag, Hash)>>,
 skip_hash: Option<Hash>,
 }

 impl StateCreatorInterface for RecordingCreator {
 fn enqueue_create_application_info(
 &self,
 hash: Hash,
 _info: &fossilize_model::ApplicationInfoInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::ApplicationInfo, hash)
 }

 fn enqueue_create_application_blob_link(
 &self,
 hash: Hash,
 _info: &fossilize_model::ApplicationBlobLinkInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::ApplicationBlobLink, hash)
 }

 fn enqueue_create_shader_module(
 &self,
 hash: Hash,
 _info: &ShaderModuleInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::ShaderModule, hash)
 }

 fn enqueue_create_sampler(
 &self,
 hash: Hash,
 _info: &SamplerInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::Sampler, hash)
 }

 fn enqueue_create_descriptor_set_layout(
 &self,
 hash: Hash,
 _info: &fossilize_model::DescriptorSetLayoutInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::DescriptorSetLayout, hash)
 }

 fn enqueue_create_pipeline_layout(
 &self,
 hash: Hash,
 _info: &fossilize_model::PipelineLayoutInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::PipelineLayout, hash)
 }

 fn enqueue_create_render_pass(
 &self,
 hash: Hash,
 _info: &fossilize_model::RenderPassInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::RenderPass, hash)
 }

 fn enqueue_create_graphics_pipeline(
 &self,
 hash: Hash,
 _info: &fossilize_model::GraphicsPipelineInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::GraphicsPipeline, hash)
 }

 fn enqueue_create_compute_pipeline(
 &self,
 hash: Hash,
 _info: &fossilize_model::ComputePipelineInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::ComputePipeline, hash)
 }

 fn enqueue_create_raytracing_pipeline(
 &self,
 hash: Hash,
 _info: &fossilize_model::RaytracingPipelineInfo,
 ) -> Result<CreateOutcome, crate::creator::CreatorError> {
 self.record(ResourceTag::RaytracingPipeline, hash)
 }

 fn sync_threads(&self) -> Result<(), crate::creator::CreatorError> {
 Ok(())
 }
 }

 impl RecordingCreator {
 fn record(&self, tag: ResourceTag, hash: Hash) -> Result<CreateOutcome, crate::creator::CreatorError> {
 if self.skip_hash == Some(hash) {
 return Ok(CreateOutcome::Skipped);
 }
 self.created.lock().unwrap().push((tag, hash));
 Ok(CreateOutcome::Created)
 }
 }

 fn temp_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!("fossilize-replay-{name}-{}.foz", std::process::id()));
 path
 }

 #[test]
 fn replays_a_sampler_and_a_shader_module() {
 let path = temp_path("basic");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();

 let sampler_bytes = decode_blob_roundtrip(&NormalizedObject::Sampler(SamplerInfo::new()));
 archive
.write_entry(ResourceTag::Sampler, 1, &sampler_bytes, false)
.unwrap();
 let module_bytes = decode_blob_roundtrip(&NormalizedObject::ShaderModule(
 ShaderModuleInfo::from_code(vec![1, 2, 3]),
 ));
 archive
.write_entry(ResourceTag::ShaderModule, 2, &module_bytes, false)
.unwrap();

 let creator = RecordingCreator::default();
 let replayer = Replayer::new(&archive);
 let stats = replayer.replay(&creator).unwrap();

 assert_eq!(stats.created, 2);
 assert_eq!(stats.skipped, 0);
 let created = creator.created.lock().unwrap();
 assert!(created.contains(&(ResourceTag::Sampler, 1)));
 assert!(created.contains(&(ResourceTag::ShaderModule, 2)));

 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn skip_signal_is_counted_not_errored() {
 let path = temp_path("skip");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 let sampler_bytes = decode_blob_roundtrip(&NormalizedObject::Sampler(SamplerInfo::new()));
 archive
.write_entry(ResourceTag::Sampler, 5, &sampler_bytes, false)
.unwrap();

 let creator = RecordingCreator {
 skip_hash: Some(5),
.RecordingCreator::default()
 };
 let replayer = Replayer::new(&archive);
 let stats = replayer.replay(&creator).unwrap();
 assert_eq!(stats.skipped, 1);
 assert_eq!(stats.created, 0);

 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn missing_dependency_is_an_error() {
 let path = temp_path("missing-dep");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 let layout_bytes = decode_blob_roundtrip(&NormalizedObject::PipelineLayout(
 fossilize_model::PipelineLayoutInfo {
 flags: 0,
 set_layouts: vec![0xaaaa],
 push_constant_ranges: Vec::new(),
 },
 ));
 archive
.write_entry(ResourceTag::PipelineLayout, 1, &layout_bytes, false)
.unwrap();

 let creator = RecordingCreator::default();
 let replayer = Replayer::new(&archive);
 let err = replayer.replay(&creator).unwrap_err();
 assert!(matches!(err, ReplayError::Dependency { .. }));

 std::fs::remove_file(&path).ok();
 }

 fn decode_blob_roundtrip(object: &NormalizedObject) -> Vec<u8> {
 fossilize_codec::encode_blob(object)
 }
}
