// SPDX-License-Identifier: Apache-2.0
//! The pluggable state-creator capability set : one method per resource tag, plus a
//! synchronization hook the replayer calls between tags.
//!
//! Every method takes `&self` rather than `&mut self` so a [`crate::Replayer`] can call into the
//! same creator concurrently from several threads while replaying the pipeline tags — the creator
//! owns whatever interior synchronization it needs (a work queue and condition variable, in the
//! shape the original driver-facing implementation used).

use fossilize_model::{
 ApplicationBlobLinkInfo, ApplicationInfoInfo, ComputePipelineInfo, DescriptorSetLayoutInfo,
 GraphicsPipelineInfo, Hash, PipelineLayoutInfo, RaytracingPipelineInfo, RenderPassInfo,
 SamplerInfo, ShaderModuleInfo,
};

/// What happened when a creator was asked to build one object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
 /// The object was created (or already existed, from the creator's own perspective).
 Created,
 /// The creator chose to skip this object. Playback continues; the skip is counted but never
 /// treated as a failure.
 Skipped,
}

/// A boxed, type-erased error from a creator's own domain (driver error codes, compiler
/// diagnostics, …), wrapped by [`crate::ReplayError::Creator`].
pub type CreatorError = Box<dyn std::error::Error + Send + Sync>;

/// The capability set a replay target implements.
///
/// Dependency handles embedded in an info struct may be either the dependency's real,
/// already-resolved handle, or — for base-pipeline and shader-module references specifically —
/// the dependency's [`Hash`] reinterpreted as a not-yet-resolved handle, left for the creator to
/// resolve on its own schedule.
pub trait StateCreatorInterface: Send + Sync {
 /// Records application identity metadata.
 fn enqueue_create_application_info(
 &self,
 hash: Hash,
 info: &ApplicationInfoInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Records an application-defined opaque blob link.
 fn enqueue_create_application_blob_link(
 &self,
 hash: Hash,
 info: &ApplicationBlobLinkInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a shader module.
 fn enqueue_create_shader_module(
 &self,
 hash: Hash,
 info: &ShaderModuleInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a sampler.
 fn enqueue_create_sampler(
 &self,
 hash: Hash,
 info: &SamplerInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a descriptor set layout.
 fn enqueue_create_descriptor_set_layout(
 &self,
 hash: Hash,
 info: &DescriptorSetLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a pipeline layout.
 fn enqueue_create_pipeline_layout(
 &self,
 hash: Hash,
 info: &PipelineLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a render pass.
 fn enqueue_create_render_pass(
 &self,
 hash: Hash,
 info: &RenderPassInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a graphics pipeline. The replayer may call this concurrently with other graphics
 /// pipeline creations, but never before this pipeline's own dependencies have completed.
 fn enqueue_create_graphics_pipeline(
 &self,
 hash: Hash,
 info: &GraphicsPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a compute pipeline, under the same concurrency contract as graphics pipelines.
 fn enqueue_create_compute_pipeline(
 &self,
 hash: Hash,
 info: &ComputePipelineInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Creates a ray tracing pipeline, under the same concurrency contract as graphics pipelines.
 fn enqueue_create_raytracing_pipeline(
 &self,
 hash: Hash,
 info: &RaytracingPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError>;

 /// Flushes any in-flight compilations the creator queued for the tag just finished, so the
 /// next tag in playback order can rely on everything before it being fully built.
 fn sync_threads(&self) -> Result<(), CreatorError>;
}
