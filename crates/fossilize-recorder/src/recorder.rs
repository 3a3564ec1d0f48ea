// SPDX-License-Identifier: Apache-2.0
//! The [`Recorder`] itself: interning, handle resolution, and the pending-object queue the
//! recording worker (`fossilize-worker`) drains.

use std::collections::{HashMap, VecDeque};

use fossilize_model::{
 ApplicationBlobLinkInfo, ApplicationInfoInfo, ComputePipelineInfo, DescriptorSetLayoutBinding,
 DescriptorSetLayoutInfo, GraphicsPipelineInfo, Hash, InternedObject, NormalizedObject,
 PipelineLayoutInfo, RaytracingPipelineInfo, RenderPassInfo, ResourceTag, SamplerInfo,
 ShaderModuleInfo, ShaderStage,
};

use crate::arena::{Arena, ArenaIndex};
use crate::error::RecorderError;
use crate::handle::Handle;
use crate::input::{
 BasePipelineInput, ComputePipelineInput, DescriptorSetLayoutInput, GraphicsPipelineInput,
 PipelineLayoutInput, RaytracingPipelineInput, ShaderStageInput,
};

/// Canonicalizes and interns create-infos, assigning each a [`Hash`] and remembering which hash
/// a live [`Handle`] currently maps to.
///
/// A `Recorder` is single-writer: it is meant to be driven from one background recording worker
/// (`fossilize-worker`), not called concurrently from multiple threads. Everything it interns
/// lives in its [`Arena`] until the `Recorder` itself is dropped.
#[derive(Debug, Default)]
pub struct Recorder {
 arena: Arena,
 by_tag_hash: HashMap<(ResourceTag, Hash), ArenaIndex>,
 handle_to_hash: HashMap<(ResourceTag, Handle), Hash>,
 pending: VecDeque<InternedObject>,
}

impl Recorder {
 /// A fresh recorder with nothing interned.
 #[must_use]
 pub fn new() -> Self {
 Self::default()
 }

 /// Number of distinct objects interned so far (after deduplication).
 #[must_use]
 pub fn len(&self) -> usize {
 self.arena.len()
 }

 /// `true` if nothing has been interned yet.
 #[must_use]
 pub fn is_empty(&self) -> bool {
 self.arena.is_empty()
 }

 /// The hash a given handle currently resolves to, if it has been recorded under `tag`.
 #[must_use]
 pub fn hash_of(&self, tag: ResourceTag, handle: Handle) -> Option<Hash> {
 self.handle_to_hash.get(&(tag, handle)).copied()
 }

 /// Looks up a previously interned object by tag and hash.
 #[must_use]
 pub fn get(&self, tag: ResourceTag, hash: Hash) -> Option<&InternedObject> {
 self.by_tag_hash
.get(&(tag, hash))
.and_then(|&index| self.arena.get(index))
 }

 /// Drains every object interned since the last call — what the recording worker enqueues for
 /// encoding and archival. Idempotent re-interns of an already-known hash are
 /// never placed here; only genuinely new objects are.
 pub fn drain_pending(&mut self) -> Vec<InternedObject> {
 self.pending.drain(.).collect()
 }

 /// Iterates every object ever interned, in intern order, regardless of whether it has already
 /// been drained by [`Recorder::drain_pending`].
 pub fn iter(&self) -> impl Iterator<Item = &InternedObject> {
 self.arena.iter()
 }

 fn resolve(&self, tag: ResourceTag, handle: Handle) -> Result<Hash, RecorderError> {
 self.hash_of(tag, handle)
.ok_or(RecorderError::UnresolvedHandle { tag, handle })
 }

 fn resolve_base(
 &self,
 tag: ResourceTag,
 base: Option<BasePipelineInput>,
 ) -> Result<Option<Hash>, RecorderError> {
 match base {
 None => Ok(None),
 Some(BasePipelineInput::Hash(hash)) => Ok(Some(hash)),
 Some(BasePipelineInput::Handle(handle)) => self.resolve(tag, handle).map(Some),
 }
 }

 fn resolve_stage(&self, input: ShaderStageInput) -> Result<ShaderStage, RecorderError> {
 Ok(ShaderStage {
 stage: input.stage,
 module: self.resolve(ResourceTag::ShaderModule, input.module)?,
 entry_point: input.entry_point,
 })
 }

 /// Interns `object` under `tag`/`handle`, computing its hash via `fossilize-hash` unless
 /// `custom_hash` overrides it.
 ///
 /// # Errors
 ///
 /// Returns [`RecorderError::DuplicateHandle`] if `(tag, handle)` has already been recorded —
 /// per spec.md §4.2, recording the same handle twice is an error, never a silent overwrite.
 fn intern(
 &mut self,
 tag: ResourceTag,
 handle: Handle,
 object: NormalizedObject,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 if self.handle_to_hash.contains_key(&(tag, handle)) {
 return Err(RecorderError::DuplicateHandle { tag, handle });
 }
 let hash = custom_hash.unwrap_or_else(|| fossilize_hash::fingerprint(&object));
 if !self.by_tag_hash.contains_key(&(tag, hash)) {
 let interned = InternedObject::new(hash, object);
 let index = self.arena.push(interned.clone());
 self.by_tag_hash.insert((tag, hash), index);
 self.pending.push_back(interned);
 tracing::trace!(%tag, hash = %fossilize_model::format_hash(hash), "interned new object");
 } else {
 tracing::trace!(%tag, hash = %fossilize_model::format_hash(hash), "duplicate content, reusing existing hash");
 }
 self.handle_to_hash.insert((tag, handle), hash);
 Ok(hash)
 }

 /// Records a sampler. Samplers have no dependencies.
 ///
 /// # Errors
 ///
 /// See [`Recorder::intern`].
 pub fn record_sampler(
 &mut self,
 handle: Handle,
 info: SamplerInfo,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 self.intern(
 ResourceTag::Sampler,
 handle,
 NormalizedObject::Sampler(info),
 custom_hash,
 )
 }

 /// Records a shader module, whether code-backed or driver-identifier-backed.
 ///
 /// # Errors
 ///
 /// See [`Recorder::intern`].
 pub fn record_shader_module(
 &mut self,
 handle: Handle,
 info: ShaderModuleInfo,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 self.intern(
 ResourceTag::ShaderModule,
 handle,
 NormalizedObject::ShaderModule(info),
 custom_hash,
 )
 }

 /// Records a render pass. Render passes reference no other object kind.
 ///
 /// # Errors
 ///
 /// See [`Recorder::intern`].
 pub fn record_render_pass(
 &mut self,
 handle: Handle,
 info: RenderPassInfo,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 self.intern(
 ResourceTag::RenderPass,
 handle,
 NormalizedObject::RenderPass(info),
 custom_hash,
 )
 }

 /// Records application identity metadata.
 ///
 /// # Errors
 ///
 /// See [`Recorder::intern`].
 pub fn record_application_info(
 &mut self,
 handle: Handle,
 info: ApplicationInfoInfo,
 ) -> Result<Hash, RecorderError> {
 self.intern(
 ResourceTag::ApplicationInfo,
 handle,
 NormalizedObject::ApplicationInfo(info),
 None,
 )
 }

 /// Records an application-defined opaque blob link.
 ///
 /// # Errors
 ///
 /// See [`Recorder::intern`].
 pub fn record_application_blob_link(
 &mut self,
 handle: Handle,
 info: ApplicationBlobLinkInfo,
 ) -> Result<Hash, RecorderError> {
 self.intern(
 ResourceTag::ApplicationBlobLink,
 handle,
 NormalizedObject::ApplicationBlobLink(info),
 None,
 )
 }

 /// Records a descriptor set layout, resolving any immutable-sampler handles to hashes
 ///.
 ///
 /// # Errors
 ///
 /// Returns [`RecorderError::UnresolvedHandle`] if an immutable sampler has not yet been
 /// recorded, or [`RecorderError::DuplicateHandle`] per [`Recorder::intern`].
 pub fn record_descriptor_set_layout(
 &mut self,
 handle: Handle,
 input: DescriptorSetLayoutInput,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 let mut bindings = Vec::with_capacity(input.bindings.len());
 for binding in input.bindings {
 let mut immutable_samplers = Vec::with_capacity(binding.immutable_samplers.len());
 for sampler_handle in binding.immutable_samplers {
 immutable_samplers.push(self.resolve(ResourceTag::Sampler, sampler_handle)?);
 }
 bindings.push(DescriptorSetLayoutBinding {
 binding: binding.binding,
 descriptor_type: binding.descriptor_type,
 descriptor_count: binding.descriptor_count,
 stage_flags: binding.stage_flags,
 immutable_samplers,
 });
 }
 let info = DescriptorSetLayoutInfo {
 flags: input.flags,
 bindings,
 pnext: input.pnext,
 };
 self.intern(
 ResourceTag::DescriptorSetLayout,
 handle,
 NormalizedObject::DescriptorSetLayout(info),
 custom_hash,
 )
 }

 /// Records a pipeline layout, resolving its set-layout handles to hashes.
 ///
 /// # Errors
 ///
 /// Returns [`RecorderError::UnresolvedHandle`] if a set layout has not yet been recorded.
 pub fn record_pipeline_layout(
 &mut self,
 handle: Handle,
 input: PipelineLayoutInput,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 let mut set_layouts = Vec::with_capacity(input.set_layouts.len());
 for set_handle in input.set_layouts {
 set_layouts.push(self.resolve(ResourceTag::DescriptorSetLayout, set_handle)?);
 }
 let info = PipelineLayoutInfo {
 flags: input.flags,
 set_layouts,
 push_constant_ranges: input.push_constant_ranges,
 };
 self.intern(
 ResourceTag::PipelineLayout,
 handle,
 NormalizedObject::PipelineLayout(info),
 custom_hash,
 )
 }

 /// Records a graphics pipeline, resolving shader module, layout, render pass, and base
 /// pipeline dependencies.
 ///
 /// # Errors
 ///
 /// Returns [`RecorderError::UnresolvedHandle`] for any dependency that has not yet been
 /// recorded (and whose base pipeline, if any, was not supplied as an explicit hash fallback).
 pub fn record_graphics_pipeline(
 &mut self,
 handle: Handle,
 input: GraphicsPipelineInput,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 let mut stages = Vec::with_capacity(input.stages.len());
 for stage in input.stages {
 stages.push(self.resolve_stage(stage)?);
 }
 let layout = self.resolve(ResourceTag::PipelineLayout, input.layout)?;
 let render_pass = self.resolve(ResourceTag::RenderPass, input.render_pass)?;
 let base_pipeline = self.resolve_base(ResourceTag::GraphicsPipeline, input.base_pipeline)?;
 let info = GraphicsPipelineInfo {
 flags: input.flags,
 stages,
 vertex_input: input.vertex_input,
 topology: input.topology,
 primitive_restart_enable: input.primitive_restart_enable,
 viewport_state: input.viewport_state,
 rasterization: input.rasterization,
 multisample: input.multisample,
 depth_stencil: input.depth_stencil,
 color_blend: input.color_blend,
 dynamic_state: input.dynamic_state,
 layout,
 render_pass,
 subpass: input.subpass,
 base_pipeline,
 pnext: input.pnext,
 };
 self.intern(
 ResourceTag::GraphicsPipeline,
 handle,
 NormalizedObject::GraphicsPipeline(info),
 custom_hash,
 )
 }

 /// Records a compute pipeline, resolving its shader module, layout, and base pipeline.
 ///
 /// # Errors
 ///
 /// See [`Recorder::record_graphics_pipeline`].
 pub fn record_compute_pipeline(
 &mut self,
 handle: Handle,
 input: ComputePipelineInput,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 let stage = self.resolve_stage(input.stage)?;
 let layout = self.resolve(ResourceTag::PipelineLayout, input.layout)?;
 let base_pipeline = self.resolve_base(ResourceTag::ComputePipeline, input.base_pipeline)?;
 let info = ComputePipelineInfo {
 flags: input.flags,
 stage,
 layout,
 base_pipeline,
 };
 self.intern(
 ResourceTag::ComputePipeline,
 handle,
 NormalizedObject::ComputePipeline(info),
 custom_hash,
 )
 }

 /// Records a ray tracing pipeline, resolving its shader modules, layout, and base pipeline.
 ///
 /// # Errors
 ///
 /// See [`Recorder::record_graphics_pipeline`].
 pub fn record_raytracing_pipeline(
 &mut self,
 handle: Handle,
 input: RaytracingPipelineInput,
 custom_hash: Option<Hash>,
 ) -> Result<Hash, RecorderError> {
 let mut stages = Vec::with_capacity(input.stages.len());
 for stage in input.stages {
 stages.push(self.resolve_stage(stage)?);
 }
 let layout = self.resolve(ResourceTag::PipelineLayout, input.layout)?;
 let base_pipeline =
 self.resolve_base(ResourceTag::RaytracingPipeline, input.base_pipeline)?;
 let info = RaytracingPipelineInfo {
 flags: input.flags,
 stages,
 groups: input.groups,
 max_recursion_depth: input.max_recursion_depth,
 layout,
 base_pipeline,
 };
 self.intern(
 ResourceTag::RaytracingPipeline,
 handle,
 NormalizedObject::RaytracingPipeline(info),
 custom_hash,
 )
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::input::{DescriptorSetLayoutBindingInput, ShaderStageInput};
 use fossilize_model::{
 ColorBlendState, MultisampleState, RasterizationState, VertexInputState, ViewportState,
 };

 fn sampler(recorder: &mut Recorder, handle: u64) -> Hash {
 recorder
.record_sampler(Handle::new(handle), SamplerInfo::new(), None)
.unwrap()
 }

 #[test]
 fn recording_the_same_handle_twice_is_an_error() {
 let mut recorder = Recorder::new();
 sampler(&mut recorder, 1);
 let err = recorder.record_sampler(Handle::new(1), SamplerInfo::new(), None);
 assert!(matches!(err, Err(RecorderError::DuplicateHandle { .. })));
 }

 #[test]
 fn duplicate_content_under_different_handles_reuses_the_hash() {
 let mut recorder = Recorder::new();
 let a = sampler(&mut recorder, 1);
 let b = sampler(&mut recorder, 2);
 assert_eq!(a, b);
 assert_eq!(recorder.len(), 1, "only one distinct object was interned");
 }

 #[test]
 fn unresolved_dependency_is_an_error() {
 let mut recorder = Recorder::new();
 let input = DescriptorSetLayoutInput {
 flags: 0,
 bindings: vec![DescriptorSetLayoutBindingInput {
 binding: 0,
 descriptor_type: 1,
 descriptor_count: 1,
 stage_flags: 0,
 immutable_samplers: vec![Handle::new(99)],
 }],
 pnext: Vec::new(),
 };
 let err = recorder.record_descriptor_set_layout(Handle::new(1), input, None);
 assert!(matches!(err, Err(RecorderError::UnresolvedHandle { .. })));
 }

 #[test]
 fn immutable_samplers_expand_to_hashes() {
 let mut recorder = Recorder::new();
 let sampler_hash = sampler(&mut recorder, 1);
 let input = DescriptorSetLayoutInput {
 flags: 0,
 bindings: vec![DescriptorSetLayoutBindingInput {
 binding: 8,
 descriptor_type: 1,
 descriptor_count: 2,
 stage_flags: 0,
 immutable_samplers: vec![Handle::new(1), Handle::new(1)],
 }],
 pnext: Vec::new(),
 };
 let layout_hash = recorder
.record_descriptor_set_layout(Handle::new(2), input, None)
.unwrap();
 let object = recorder
.get(ResourceTag::DescriptorSetLayout, layout_hash)
.unwrap();
 match &object.object {
 NormalizedObject::DescriptorSetLayout(info) => {
 assert_eq!(
 info.bindings[0].immutable_samplers,
 vec![sampler_hash, sampler_hash]
 );
 }
 _ => panic!("wrong variant"),
 }
 }

 #[test]
 fn base_pipeline_falls_back_to_caller_supplied_hash_when_unresolved() {
 let mut recorder = Recorder::new();
 let module = recorder
.record_shader_module(Handle::new(1), ShaderModuleInfo::from_code(vec![1]), None)
.unwrap();
 let layout = recorder
.record_pipeline_layout(Handle::new(2), PipelineLayoutInput::default(), None)
.unwrap();
 let input = ComputePipelineInput {
 flags: 0,
 stage: ShaderStageInput {
 stage: 1,
 module: Handle::new(1),
 entry_point: "main".to_owned(),
 },
 layout: Handle::new(2),
 base_pipeline: Some(BasePipelineInput::Hash(0xabcd)),
 };
 let hash = recorder
.record_compute_pipeline(Handle::new(3), input, None)
.unwrap();
 let object = recorder.get(ResourceTag::ComputePipeline, hash).unwrap();
 match &object.object {
 NormalizedObject::ComputePipeline(info) => {
 assert_eq!(info.base_pipeline, Some(0xabcd));
 assert_eq!(info.layout, layout);
 assert_eq!(info.stage.module, module);
 }
 _ => panic!("wrong variant"),
 }
 }

 #[test]
 fn drain_pending_only_returns_genuinely_new_objects() {
 let mut recorder = Recorder::new();
 sampler(&mut recorder, 1);
 sampler(&mut recorder, 2); // same content, same hash, not newly interned
 let pending = recorder.drain_pending();
 assert_eq!(pending.len(), 1);
 assert!(recorder.drain_pending().is_empty());
 }

 #[allow(dead_code)]
 fn full_graphics_pipeline_smoke(recorder: &mut Recorder) -> Hash {
 let module = recorder
.record_shader_module(Handle::new(10), ShaderModuleInfo::from_code(vec![1]), None)
.unwrap();
 let _ = module;
 let layout = recorder
.record_pipeline_layout(Handle::new(11), PipelineLayoutInput::default(), None)
.unwrap();
 let _ = layout;
 let render_pass = recorder
.record_render_pass(Handle::new(12), RenderPassInfo::new(), None)
.unwrap();
 let _ = render_pass;
 let input = GraphicsPipelineInput {
 flags: 0,
 stages: vec![ShaderStageInput {
 stage: 1,
 module: Handle::new(10),
 entry_point: "main".to_owned(),
 }],
 vertex_input: VertexInputState::default(),
 topology: 0,
 primitive_restart_enable: false,
 viewport_state: ViewportState::default(),
 rasterization: RasterizationState {
 depth_clamp_enable: false,
 rasterizer_discard_enable: false,
 polygon_mode: 0,
 cull_mode: 0,
 front_face: 0,
 depth_bias_enable: false,
 depth_bias_constant_factor: 0.0,
 depth_bias_clamp: 0.0,
 depth_bias_slope_factor: 0.0,
 line_width: 1.0,
 },
 multisample: MultisampleState {
 rasterization_samples: 1,
 sample_shading_enable: false,
 min_sample_shading: 0.0,
 sample_mask: Vec::new(),
 alpha_to_coverage_enable: false,
 alpha_to_one_enable: false,
 },
 depth_stencil: None,
 color_blend: ColorBlendState {
 logic_op_enable: false,
 logic_op: 0,
 attachments: Vec::new(),
 blend_constants: [0.0; 4],
 },
 dynamic_state: Vec::new(),
 layout: Handle::new(11),
 render_pass: Handle::new(12),
 subpass: 0,
 base_pipeline: None,
 pnext: Vec::new(),
 };
 recorder
.record_graphics_pipeline(Handle::new(13), input, None)
.unwrap()
 }

 #[test]
 fn full_graphics_pipeline_records_end_to_end() {
 let mut recorder = Recorder::new();
 let hash = full_graphics_pipeline_smoke(&mut recorder);
 assert!(recorder.get(ResourceTag::GraphicsPipeline, hash).is_some());
 assert_eq!(recorder.len(), 4);
 }
}
