// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`GraphicsPipelineInfo`].
//!
//! Unlike `fossilize-hash`, this module never omits a field: the codec's job is lossless
//! round-trip, not fingerprint minimality. Masking only happens when a
//! fingerprint is computed from the decoded struct, not here.

use crate::error::CodecError;
use crate::pnext;
use crate::wire::{Reader, Writer};
use fossilize_model::{
 ColorBlendAttachment, ColorBlendState, DepthStencilState, DynamicState, GraphicsPipelineInfo,
 MultisampleState, RasterizationState, Rect2D, ShaderStage, StencilOpState, VertexInputState,
 Viewport, ViewportState,
};

fn encode_stage(stage: &ShaderStage, w: &mut Writer) {
 w.u32(stage.stage).u64(stage.module).string(&stage.entry_point);
}

fn decode_stage(r: &mut Reader<'_>) -> Result<ShaderStage, CodecError> {
 Ok(ShaderStage {
 stage: r.u32()?,
 module: r.u64()?,
 entry_point: r.string()?,
 })
}

fn encode_vertex_input(state: &VertexInputState, w: &mut Writer) {
 w.len_prefix(state.bindings.len());
 for &(binding, stride, input_rate) in &state.bindings {
 w.u32(binding).u32(stride).u32(input_rate);
 }
 w.len_prefix(state.attributes.len());
 for &(location, binding, format, offset) in &state.attributes {
 w.u32(location).u32(binding).u32(format).u32(offset);
 }
}

fn decode_vertex_input(r: &mut Reader<'_>) -> Result<VertexInputState, CodecError> {
 let binding_count = r.len_prefix()?;
 let mut bindings = Vec::with_capacity(binding_count.min(1 << 12));
 for _ in 0..binding_count {
 bindings.push((r.u32()?, r.u32()?, r.u32()?));
 }
 let attribute_count = r.len_prefix()?;
 let mut attributes = Vec::with_capacity(attribute_count.min(1 << 12));
 for _ in 0..attribute_count {
 attributes.push((r.u32()?, r.u32()?, r.u32()?, r.u32()?));
 }
 Ok(VertexInputState { bindings, attributes })
}

fn encode_viewport_state(state: &ViewportState, w: &mut Writer) {
 w.len_prefix(state.viewports.len());
 for v in &state.viewports {
 w.f32(v.x).f32(v.y).f32(v.width).f32(v.height).f32(v.min_depth).f32(v.max_depth);
 }
 w.len_prefix(state.scissors.len());
 for s in &state.scissors {
 w.i32(s.x).i32(s.y).u32(s.width).u32(s.height);
 }
}

fn decode_viewport_state(r: &mut Reader<'_>) -> Result<ViewportState, CodecError> {
 let viewport_count = r.len_prefix()?;
 let mut viewports = Vec::with_capacity(viewport_count.min(1 << 12));
 for _ in 0..viewport_count {
 viewports.push(Viewport {
 x: r.f32()?,
 y: r.f32()?,
 width: r.f32()?,
 height: r.f32()?,
 min_depth: r.f32()?,
 max_depth: r.f32()?,
 });
 }
 let scissor_count = r.len_prefix()?;
 let mut scissors = Vec::with_capacity(scissor_count.min(1 << 12));
 for _ in 0..scissor_count {
 scissors.push(Rect2D {
 x: r.i32()?,
 y: r.i32()?,
 width: r.u32()?,
 height: r.u32()?,
 });
 }
 Ok(ViewportState { viewports, scissors })
}

fn encode_rasterization(state: &RasterizationState, w: &mut Writer) {
 w.bool(state.depth_clamp_enable)
.bool(state.rasterizer_discard_enable)
.u32(state.polygon_mode)
.u32(state.cull_mode)
.u32(state.front_face)
.bool(state.depth_bias_enable)
.f32(state.depth_bias_constant_factor)
.f32(state.depth_bias_clamp)
.f32(state.depth_bias_slope_factor)
.f32(state.line_width);
}

fn decode_rasterization(r: &mut Reader<'_>) -> Result<RasterizationState, CodecError> {
 Ok(RasterizationState {
 depth_clamp_enable: r.bool()?,
 rasterizer_discard_enable: r.bool()?,
 polygon_mode: r.u32()?,
 cull_mode: r.u32()?,
 front_face: r.u32()?,
 depth_bias_enable: r.bool()?,
 depth_bias_constant_factor: r.f32()?,
 depth_bias_clamp: r.f32()?,
 depth_bias_slope_factor: r.f32()?,
 line_width: r.f32()?,
 })
}

fn encode_multisample(state: &MultisampleState, w: &mut Writer) {
 w.u32(state.rasterization_samples).bool(state.sample_shading_enable).f32(state.min_sample_shading);
 w.len_prefix(state.sample_mask.len());
 for &mask in &state.sample_mask {
 w.u32(mask);
 }
 w.bool(state.alpha_to_coverage_enable).bool(state.alpha_to_one_enable);
}

fn decode_multisample(r: &mut Reader<'_>) -> Result<MultisampleState, CodecError> {
 let rasterization_samples = r.u32()?;
 let sample_shading_enable = r.bool()?;
 let min_sample_shading = r.f32()?;
 let mask_count = r.len_prefix()?;
 let mut sample_mask = Vec::with_capacity(mask_count.min(1 << 12));
 for _ in 0..mask_count {
 sample_mask.push(r.u32()?);
 }
 Ok(MultisampleState {
 rasterization_samples,
 sample_shading_enable,
 min_sample_shading,
 sample_mask,
 alpha_to_coverage_enable: r.bool()?,
 alpha_to_one_enable: r.bool()?,
 })
}

fn encode_stencil_op(state: &StencilOpState, w: &mut Writer) {
 w.u32(state.fail_op)
.u32(state.pass_op)
.u32(state.depth_fail_op)
.u32(state.compare_op)
.u32(state.compare_mask)
.u32(state.write_mask)
.u32(state.reference);
}

fn decode_stencil_op(r: &mut Reader<'_>) -> Result<StencilOpState, CodecError> {
 Ok(StencilOpState {
 fail_op: r.u32()?,
 pass_op: r.u32()?,
 depth_fail_op: r.u32()?,
 compare_op: r.u32()?,
 compare_mask: r.u32()?,
 write_mask: r.u32()?,
 reference: r.u32()?,
 })
}

fn encode_depth_stencil(state: &DepthStencilState, w: &mut Writer) {
 w.bool(state.depth_test_enable)
.bool(state.depth_write_enable)
.u32(state.depth_compare_op)
.bool(state.depth_bounds_test_enable)
.f32(state.min_depth_bounds)
.f32(state.max_depth_bounds)
.bool(state.stencil_test_enable);
 encode_stencil_op(&state.front, w);
 encode_stencil_op(&state.back, w);
}

fn decode_depth_stencil(r: &mut Reader<'_>) -> Result<DepthStencilState, CodecError> {
 Ok(DepthStencilState {
 depth_test_enable: r.bool()?,
 depth_write_enable: r.bool()?,
 depth_compare_op: r.u32()?,
 depth_bounds_test_enable: r.bool()?,
 min_depth_bounds: r.f32()?,
 max_depth_bounds: r.f32()?,
 stencil_test_enable: r.bool()?,
 front: decode_stencil_op(r)?,
 back: decode_stencil_op(r)?,
 })
}

fn encode_color_blend_attachment(a: &ColorBlendAttachment, w: &mut Writer) {
 w.bool(a.blend_enable)
.u32(a.src_color_blend_factor)
.u32(a.dst_color_blend_factor)
.u32(a.color_blend_op)
.u32(a.src_alpha_blend_factor)
.u32(a.dst_alpha_blend_factor)
.u32(a.alpha_blend_op)
.u32(a.color_write_mask);
}

fn decode_color_blend_attachment(r: &mut Reader<'_>) -> Result<ColorBlendAttachment, CodecError> {
 Ok(ColorBlendAttachment {
 blend_enable: r.bool()?,
 src_color_blend_factor: r.u32()?,
 dst_color_blend_factor: r.u32()?,
 color_blend_op: r.u32()?,
 src_alpha_blend_factor: r.u32()?,
 dst_alpha_blend_factor: r.u32()?,
 alpha_blend_op: r.u32()?,
 color_write_mask: r.u32()?,
 })
}

fn encode_color_blend(state: &ColorBlendState, w: &mut Writer) {
 w.bool(state.logic_op_enable).u32(state.logic_op);
 w.len_prefix(state.attachments.len());
 for attachment in &state.attachments {
 encode_color_blend_attachment(attachment, w);
 }
 for &constant in &state.blend_constants {
 w.f32(constant);
 }
}

fn decode_color_blend(r: &mut Reader<'_>) -> Result<ColorBlendState, CodecError> {
 let logic_op_enable = r.bool()?;
 let logic_op = r.u32()?;
 let count = r.len_prefix()?;
 let mut attachments = Vec::with_capacity(count.min(1 << 12));
 for _ in 0..count {
 attachments.push(decode_color_blend_attachment(r)?);
 }
 let blend_constants = [r.f32()?, r.f32()?, r.f32()?, r.f32()?];
 Ok(ColorBlendState {
 logic_op_enable,
 logic_op,
 attachments,
 blend_constants,
 })
}

const DYNAMIC_STATES: [DynamicState; 9] = [
 DynamicState::Viewport,
 DynamicState::Scissor,
 DynamicState::LineWidth,
 DynamicState::DepthBias,
 DynamicState::BlendConstants,
 DynamicState::DepthBounds,
 DynamicState::StencilCompareMask,
 DynamicState::StencilWriteMask,
 DynamicState::StencilReference,
];

fn decode_dynamic_state(raw: u32) -> Result<DynamicState, CodecError> {
 DYNAMIC_STATES
.into_iter()
.find(|state| *state as u32 == raw)
.ok_or(CodecError::UnknownDynamicState(raw))
}

/// Encodes a [`GraphicsPipelineInfo`].
pub fn encode(info: &GraphicsPipelineInfo, w: &mut Writer) {
 w.u32(info.flags);
 w.len_prefix(info.stages.len());
 for stage in &info.stages {
 encode_stage(stage, w);
 }
 encode_vertex_input(&info.vertex_input, w);
 w.u32(info.topology).bool(info.primitive_restart_enable);
 encode_viewport_state(&info.viewport_state, w);
 encode_rasterization(&info.rasterization, w);
 encode_multisample(&info.multisample, w);
 match &info.depth_stencil {
 Some(ds) => {
 w.bool(true);
 encode_depth_stencil(ds, w);
 }
 None => {
 w.bool(false);
 }
 }
 encode_color_blend(&info.color_blend, w);
 w.len_prefix(info.dynamic_state.len());
 for state in &info.dynamic_state {
 w.u32(*state as u32);
 }
 w.u64(info.layout).u64(info.render_pass).u32(info.subpass);
 w.option_u64(info.base_pipeline);
 pnext::encode(&info.pnext, w);
}

/// Decodes a [`GraphicsPipelineInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<GraphicsPipelineInfo, CodecError> {
 let flags = r.u32()?;
 let stage_count = r.len_prefix()?;
 let mut stages = Vec::with_capacity(stage_count.min(1 << 12));
 for _ in 0..stage_count {
 stages.push(decode_stage(r)?);
 }
 let vertex_input = decode_vertex_input(r)?;
 let topology = r.u32()?;
 let primitive_restart_enable = r.bool()?;
 let viewport_state = decode_viewport_state(r)?;
 let rasterization = decode_rasterization(r)?;
 let multisample = decode_multisample(r)?;
 let depth_stencil = if r.bool()? {
 Some(decode_depth_stencil(r)?)
 } else {
 None
 };
 let color_blend = decode_color_blend(r)?;
 let dynamic_count = r.len_prefix()?;
 let mut dynamic_state = Vec::with_capacity(dynamic_count.min(1 << 12));
 for _ in 0..dynamic_count {
 dynamic_state.push(decode_dynamic_state(r.u32()?)?);
 }
 let layout = r.u64()?;
 let render_pass = r.u64()?;
 let subpass = r.u32()?;
 let base_pipeline = r.option_u64()?;
 Ok(GraphicsPipelineInfo {
 flags,
 stages,
 vertex_input,
 topology,
 primitive_restart_enable,
 viewport_state,
 rasterization,
 multisample,
 depth_stencil,
 color_blend,
 dynamic_state,
 layout,
 render_pass,
 subpass,
 base_pipeline,
 pnext: pnext::decode(r)?,
 })
}

#[cfg(test)]
mod tests {
 use super::*;

 fn sample() -> GraphicsPipelineInfo {
 GraphicsPipelineInfo {
 flags: 0,
 stages: vec![ShaderStage {
 stage: 1,
 module: 42,
 entry_point: "main".to_owned(),
 }],
 vertex_input: VertexInputState::default(),
 topology: 3,
 primitive_restart_enable: false,
 viewport_state: ViewportState::default(),
 rasterization: RasterizationState {
 depth_clamp_enable: false,
 rasterizer_discard_enable: false,
 polygon_mode: 0,
 cull_mode: 0,
 front_face: 0,
 depth_bias_enable: true,
 depth_bias_constant_factor: 1.5,
 depth_bias_clamp: 0.0,
 depth_bias_slope_factor: 2.0,
 line_width: 1.0,
 },
 multisample: MultisampleState {
 rasterization_samples: 4,
 sample_shading_enable: false,
 min_sample_shading: 0.0,
 sample_mask: vec![0xffff_ffff],
 alpha_to_coverage_enable: false,
 alpha_to_one_enable: false,
 },
 depth_stencil: None,
 color_blend: ColorBlendState {
 logic_op_enable: false,
 logic_op: 0,
 attachments: vec![],
 blend_constants: [0.0; 4],
 },
 dynamic_state: vec![DynamicState::Viewport, DynamicState::Scissor],
 layout: 7,
 render_pass: 9,
 subpass: 0,
 base_pipeline: Some(123),
 pnext: Vec::new(),
 }
 }

 #[test]
 fn round_trips() {
 let info = sample();
 let mut w = Writer::new();
 encode(&info, &mut w);
 let bytes = w.into_bytes();
 let mut r = Reader::new(&bytes);
 assert_eq!(decode(&mut r).unwrap(), info);
 }

 #[test]
 fn round_trips_without_base_pipeline() {
 let mut info = sample();
 info.base_pipeline = None;
 let mut w = Writer::new();
 encode(&info, &mut w);
 let bytes = w.into_bytes();
 let mut r = Reader::new(&bytes);
 assert_eq!(decode(&mut r).unwrap(), info);
 }
}
