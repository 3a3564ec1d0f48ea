// SPDX-License-Identifier: Apache-2.0
//! Fossilize's fingerprint engine.
//!
//! Turns a [`NormalizedObject`] into a 64-bit fingerprint such that the fingerprint depends only
//! on externally observable semantics: fields that another field makes irrelevant (dynamic-state
//! masking, unused blend constants, disabled stencil masks) are never mixed in, and embedded
//! object references already carry their dependency's hash rather than a live handle. There is no
//! failure mode here — an object this crate cannot hash is a programmer error in whatever built
//! it, not a recoverable condition.
//!
//! # Hash domain policy
//!
//! Unlike `echo-cas`'s content-only BLAKE3 policy, Fossilize's fingerprint is *semantic*, not
//! byte-identical: two create-infos with different bytes in an irrelevant field hash the same.
//! This is deliberate — it is the entire point of the masking logic below — and it means this
//! hash must never be used as a generic content-addressing primitive for arbitrary bytes.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

use fossilize_model::{
 ColorBlendAttachment, ColorBlendState, DepthStencilState, DynamicState, GraphicsPipelineInfo,
 NormalizedObject, PNextRecord, SamplerInfo,
};

/// The 64-bit FNV-1a-style seed every fingerprint starts from.
pub const SEED: u64 = 0xcbf2_9ce4_8422_2325;

/// The FNV-1a-style multiplicative constant used by [`mix`].
const PRIME: u64 = 0x0000_0001_0000_01b3;

/// Sentinel mixed in after every variable-length string or byte string, so that `"abc"` followed
/// by `"d"` cannot collide with `"ab"` followed by `"cd"`.
const STRING_TERMINATOR: u64 = 0xff;

/// One step of the rolling mix: `h = (h * 0x100000001b3) ^ word`.
#[must_use]
pub const fn mix(h: u64, word: u64) -> u64 {
 h.wrapping_mul(PRIME) ^ word
}

/// Accumulates a fingerprint over a sequence of mixed words.
///
/// This is the only state the engine needs — it is not reusable as a general hasher (no
/// `std::hash::Hasher` impl), because Fossilize's mixing order is semantically meaningful: fields
/// must be mixed in a fixed, documented order, not whatever order a derive macro would pick.
#[derive(Clone, Copy, Debug)]
pub struct Fingerprint(u64);

impl Fingerprint {
 /// Starts a new fingerprint at [`SEED`].
 #[must_use]
 pub const fn new() -> Self {
 Self(SEED)
 }

 /// Mixes in one 64-bit word.
 pub fn mix_u64(&mut self, word: u64) -> &mut Self {
 self.0 = mix(self.0, word);
 self
 }

 /// Mixes in one 32-bit word, zero-extended.
 pub fn mix_u32(&mut self, word: u32) -> &mut Self {
 self.mix_u64(u64::from(word))
 }

 /// Mixes in a `bool` as `0` or `1`.
 pub fn mix_bool(&mut self, value: bool) -> &mut Self {
 self.mix_u64(u64::from(value))
 }

 /// Mixes in an `f32` by its raw bit pattern — never its numeric value, so that `0.0` and
 /// `-0.0` (which compare equal but are not bit-identical) are distinguished the same way the
 /// rest of the engine distinguishes any other field.
 pub fn mix_f32(&mut self, value: f32) -> &mut Self {
 self.mix_u32(value.to_bits())
 }

 /// Mixes in a length-prefixed sequence of words, terminated by [`STRING_TERMINATOR`].
 ///
 /// Used for anything variable-length: byte strings, `Vec<u32>` payloads, and — via
 /// [`Fingerprint::mix_bytes`] — UTF-8 strings. The terminator is what prevents the
 /// concatenation ambiguity described in the module docs.
 pub fn mix_words<I: IntoIterator<Item = u64>>(&mut self, words: I) -> &mut Self {
 for word in words {
 self.mix_u64(word);
 }
 self.mix_u64(STRING_TERMINATOR)
 }

 /// Mixes in a byte slice, one byte per word, terminated.
 pub fn mix_bytes(&mut self, bytes: &[u8]) -> &mut Self {
 self.mix_words(bytes.iter().map(|&b| u64::from(b)))
 }

 /// Mixes in a UTF-8 string's bytes, terminated.
 pub fn mix_str(&mut self, s: &str) -> &mut Self {
 self.mix_bytes(s.as_bytes())
 }

 /// Finishes the fingerprint.
 #[must_use]
 pub const fn finish(self) -> u64 {
 self.0
 }
}

impl Default for Fingerprint {
 fn default() -> Self {
 Self::new()
 }
}

/// Computes the fingerprint of a normalized object.
///
/// Per spec.md invariant 2, the result depends only on `object`'s own fields and the already-hash-
/// substituted references it carries — never on a handle, pointer, or allocation address.
#[must_use]
pub fn fingerprint(object: &NormalizedObject) -> u64 {
 let mut f = Fingerprint::new();
 f.mix_u64(u64::from(object.tag().as_u8()));
 match object {
 NormalizedObject::Sampler(info) => mix_sampler(&mut f, info),
 NormalizedObject::DescriptorSetLayout(info) => {
 f.mix_u32(info.flags);
 for binding in &info.bindings {
 f.mix_u32(binding.binding);
 f.mix_u32(binding.descriptor_type);
 f.mix_u32(binding.descriptor_count);
 f.mix_u32(binding.stage_flags);
 f.mix_words(binding.immutable_samplers.iter().copied());
 }
 mix_pnext(&mut f, &info.pnext);
 }
 NormalizedObject::PipelineLayout(info) => {
 f.mix_u32(info.flags);
 f.mix_words(info.set_layouts.iter().copied());
 for range in &info.push_constant_ranges {
 f.mix_u32(range.stage_flags);
 f.mix_u32(range.offset);
 f.mix_u32(range.size);
 }
 }
 NormalizedObject::ShaderModule(info) => mix_shader_module(&mut f, info),
 NormalizedObject::RenderPass(info) => {
 f.mix_u32(info.flags);
 for attachment in &info.attachments {
 f.mix_u32(attachment.format);
 f.mix_u32(attachment.samples);
 f.mix_u32(attachment.load_op);
 f.mix_u32(attachment.store_op);
 f.mix_u32(attachment.stencil_load_op);
 f.mix_u32(attachment.stencil_store_op);
 f.mix_u32(attachment.initial_layout);
 f.mix_u32(attachment.final_layout);
 }
 for subpass in &info.subpasses {
 f.mix_u32(subpass.pipeline_bind_point);
 f.mix_words(subpass.input_attachments.iter().map(|&i| u64::from(i)));
 f.mix_words(subpass.color_attachments.iter().map(|&i| u64::from(i)));
 f.mix_words(subpass.resolve_attachments.iter().map(|&i| u64::from(i)));
 f.mix_u32(subpass.depth_stencil_attachment.unwrap_or(u32::MAX));
 f.mix_words(subpass.preserve_attachments.iter().map(|&i| u64::from(i)));
 }
 mix_pnext(&mut f, &info.pnext);
 }
 NormalizedObject::GraphicsPipeline(info) => mix_graphics_pipeline(&mut f, info),
 NormalizedObject::ComputePipeline(info) => {
 f.mix_u32(info.flags);
 f.mix_u32(info.stage.stage);
 f.mix_u64(info.stage.module);
 f.mix_str(&info.stage.entry_point);
 f.mix_u64(info.layout);
 f.mix_u64(info.base_pipeline.unwrap_or(0));
 }
 NormalizedObject::RaytracingPipeline(info) => {
 f.mix_u32(info.flags);
 for stage in &info.stages {
 f.mix_u32(stage.stage);
 f.mix_u64(stage.module);
 f.mix_str(&stage.entry_point);
 }
 for group in &info.groups {
 f.mix_u32(group.group_type);
 f.mix_u32(group.general_shader);
 f.mix_u32(group.closest_hit_shader);
 f.mix_u32(group.any_hit_shader);
 f.mix_u32(group.intersection_shader);
 }
 f.mix_u32(info.max_recursion_depth);
 f.mix_u64(info.layout);
 f.mix_u64(info.base_pipeline.unwrap_or(0));
 }
 NormalizedObject::ApplicationInfo(info) => {
 f.mix_str(&info.application_name);
 f.mix_u32(info.application_version);
 f.mix_str(&info.engine_name);
 f.mix_u32(info.engine_version);
 f.mix_u32(info.api_version);
 }
 NormalizedObject::ApplicationBlobLink(info) => {
 f.mix_u32(info.tag);
 f.mix_bytes(&info.data);
 }
 }
 f.finish()
}

fn mix_sampler(f: &mut Fingerprint, info: &SamplerInfo) {
 f.mix_u32(info.mag_filter);
 f.mix_u32(info.min_filter);
 f.mix_u32(info.mipmap_mode);
 f.mix_u32(info.address_mode_u);
 f.mix_u32(info.address_mode_v);
 f.mix_u32(info.address_mode_w);
 f.mix_f32(info.mip_lod_bias);
 f.mix_bool(info.anisotropy_enable);
 f.mix_f32(info.max_anisotropy);
 f.mix_bool(info.compare_enable);
 f.mix_u32(info.compare_op);
 f.mix_f32(info.min_lod);
 f.mix_f32(info.max_lod);
 f.mix_u32(info.border_color);
 f.mix_bool(info.unnormalized_coordinates);
 mix_pnext(f, &info.pnext);
}

fn mix_shader_module(f: &mut Fingerprint, info: &fossilize_model::ShaderModuleInfo) {
 match info {
 fossilize_model::ShaderModuleInfo::Code(words) => {
 f.mix_bool(false);
 f.mix_words(words.iter().map(|&w| u64::from(w)));
 }
 fossilize_model::ShaderModuleInfo::Identifier {
 algorithm_uuid,
 identifier,
 } => {
 f.mix_bool(true);
 f.mix_bytes(algorithm_uuid);
 f.mix_bytes(identifier);
 }
 }
}

fn mix_pnext(f: &mut Fingerprint, chain: &[PNextRecord]) {
 for record in chain {
 f.mix_u32(record.type_tag());
 match record {
 PNextRecord::SamplerReductionMode { mode } => f.mix_u32(*mode),
 PNextRecord::RenderPassMultiview { view_masks } => {
 f.mix_words(view_masks.iter().map(|&m| u64::from(m)));
 }
 }
 }
 f.mix_u64(STRING_TERMINATOR);
}

/// Mixes a [`GraphicsPipelineInfo`], omitting every field spec.md §4.1 designates irrelevant given
/// the rest of the struct — this function is the masking logic's home.
fn mix_graphics_pipeline(f: &mut Fingerprint, info: &GraphicsPipelineInfo) {
 f.mix_u32(info.flags);
 for stage in &info.stages {
 f.mix_u32(stage.stage);
 f.mix_u64(stage.module);
 f.mix_str(&stage.entry_point);
 }
 for &(binding, stride, input_rate) in &info.vertex_input.bindings {
 f.mix_u32(binding);
 f.mix_u32(stride);
 f.mix_u32(input_rate);
 }
 for &(location, binding, format, offset) in &info.vertex_input.attributes {
 f.mix_u32(location);
 f.mix_u32(binding);
 f.mix_u32(format);
 f.mix_u32(offset);
 }
 f.mix_u32(info.topology);
 f.mix_bool(info.primitive_restart_enable);

 if info.viewport_array_relevant() {
 for viewport in &info.viewport_state.viewports {
 f.mix_f32(viewport.x);
 f.mix_f32(viewport.y);
 f.mix_f32(viewport.width);
 f.mix_f32(viewport.height);
 f.mix_f32(viewport.min_depth);
 f.mix_f32(viewport.max_depth);
 }
 }
 if info.scissor_array_relevant() {
 for scissor in &info.viewport_state.scissors {
 f.mix_u32(scissor.x as u32);
 f.mix_u32(scissor.y as u32);
 f.mix_u32(scissor.width);
 f.mix_u32(scissor.height);
 }
 }

 mix_rasterization(f, &info.rasterization, &info.dynamic_state);

 f.mix_u32(info.multisample.rasterization_samples);
 f.mix_bool(info.multisample.sample_shading_enable);
 if info.multisample.sample_shading_enable {
 f.mix_f32(info.multisample.min_sample_shading);
 }
 f.mix_words(info.multisample.sample_mask.iter().map(|&m| u64::from(m)));
 f.mix_bool(info.multisample.alpha_to_coverage_enable);
 f.mix_bool(info.multisample.alpha_to_one_enable);

 if let Some(ds) = &info.depth_stencil {
 f.mix_bool(true);
 mix_depth_stencil(f, ds, &info.dynamic_state);
 } else {
 f.mix_bool(false);
 }

 mix_color_blend(f, &info.color_blend, &info.dynamic_state);

 for state in &info.dynamic_state {
 f.mix_u32(*state as u32);
 }
 f.mix_u64(STRING_TERMINATOR);

 f.mix_u64(info.layout);
 f.mix_u64(info.render_pass);
 f.mix_u32(info.subpass);
 f.mix_u64(info.base_pipeline.unwrap_or(0));
 mix_pnext(f, &info.pnext);
}

fn mix_rasterization(
 f: &mut Fingerprint,
 state: &fossilize_model::RasterizationState,
 dynamic: &[DynamicState],
) {
 f.mix_bool(state.depth_clamp_enable);
 f.mix_bool(state.rasterizer_discard_enable);
 f.mix_u32(state.polygon_mode);
 f.mix_u32(state.cull_mode);
 f.mix_u32(state.front_face);
 f.mix_bool(state.depth_bias_enable);
 if state.depth_bias_enable && !dynamic.contains(&DynamicState::DepthBias) {
 f.mix_f32(state.depth_bias_constant_factor);
 f.mix_f32(state.depth_bias_clamp);
 f.mix_f32(state.depth_bias_slope_factor);
 }
 if !dynamic.contains(&DynamicState::LineWidth) {
 f.mix_f32(state.line_width);
 }
}

fn mix_depth_stencil(f: &mut Fingerprint, state: &DepthStencilState, dynamic: &[DynamicState]) {
 f.mix_bool(state.depth_test_enable);
 if state.depth_test_enable {
 f.mix_bool(state.depth_write_enable);
 f.mix_u32(state.depth_compare_op);
 }
 f.mix_bool(state.depth_bounds_test_enable);
 if state.depth_bounds_test_enable && !dynamic.contains(&DynamicState::DepthBounds) {
 f.mix_f32(state.min_depth_bounds);
 f.mix_f32(state.max_depth_bounds);
 }
 f.mix_bool(state.stencil_test_enable);
 if state.stencil_test_enable {
 mix_stencil_op(f, &state.front, dynamic);
 mix_stencil_op(f, &state.back, dynamic);
 }
}

fn mix_stencil_op(f: &mut Fingerprint, state: &fossilize_model::StencilOpState, dynamic: &[DynamicState]) {
 f.mix_u32(state.fail_op);
 f.mix_u32(state.pass_op);
 f.mix_u32(state.depth_fail_op);
 f.mix_u32(state.compare_op);
 if !dynamic.contains(&DynamicState::StencilCompareMask) {
 f.mix_u32(state.compare_mask);
 }
 if !dynamic.contains(&DynamicState::StencilWriteMask) {
 f.mix_u32(state.write_mask);
 }
 if !dynamic.contains(&DynamicState::StencilReference) {
 f.mix_u32(state.reference);
 }
}

fn mix_color_blend(f: &mut Fingerprint, state: &ColorBlendState, dynamic: &[DynamicState]) {
 f.mix_bool(state.logic_op_enable);
 if state.logic_op_enable {
 f.mix_u32(state.logic_op);
 }
 for attachment in &state.attachments {
 mix_color_blend_attachment(f, attachment);
 }
 if state.blend_constants_relevant() && !dynamic.contains(&DynamicState::BlendConstants) {
 for constant in state.blend_constants {
 f.mix_f32(constant);
 }
 }
}

fn mix_color_blend_attachment(f: &mut Fingerprint, attachment: &ColorBlendAttachment) {
 f.mix_bool(attachment.blend_enable);
 if attachment.blend_enable {
 f.mix_u32(attachment.src_color_blend_factor);
 f.mix_u32(attachment.dst_color_blend_factor);
 f.mix_u32(attachment.color_blend_op);
 f.mix_u32(attachment.src_alpha_blend_factor);
 f.mix_u32(attachment.dst_alpha_blend_factor);
 f.mix_u32(attachment.alpha_blend_op);
 }
 f.mix_u32(attachment.color_write_mask);
}
