// SPDX-License-Identifier: Apache-2.0
//! Create-info shapes the capture layer hands the recorder: identical to
//! [`fossilize_model`]'s normalized structs except that every embedded object reference is a live
//! [`Handle`] instead of an already-resolved [`Hash`] — resolving those handles is exactly what
//! [`crate::Recorder::record_graphics_pipeline`] and friends do.

use crate::handle::Handle;
use fossilize_model::{
 ColorBlendState, DynamicState, Hash, MultisampleState, PNextRecord, PushConstantRange,
 RasterizationState, RtShaderGroup, VertexInputState, ViewportState,
};

/// One shader stage, referencing its module by live handle.
#[derive(Clone, Debug)]
pub struct ShaderStageInput {
 /// `VkShaderStageFlagBits`.
 pub stage: u32,
 /// Handle of the shader module this stage runs.
 pub module: Handle,
 /// Entry point name.
 pub entry_point: String,
}

/// One descriptor-set-layout binding, referencing any immutable samplers by live handle.
#[derive(Clone, Debug)]
pub struct DescriptorSetLayoutBindingInput {
 /// `binding`.
 pub binding: u32,
 /// `descriptorType`.
 pub descriptor_type: u32,
 /// `descriptorCount`.
 pub descriptor_count: u32,
 /// `stageFlags`.
 pub stage_flags: u32,
 /// Immutable sampler handles, in declaration order.
 pub immutable_samplers: Vec<Handle>,
}

/// A descriptor set layout create-info as the capture layer sees it.
#[derive(Clone, Debug, Default)]
pub struct DescriptorSetLayoutInput {
 /// `flags`.
 pub flags: u32,
 /// Binding declarations.
 pub bindings: Vec<DescriptorSetLayoutBindingInput>,
 /// Extension chain.
 pub pnext: Vec<PNextRecord>,
}

/// A pipeline layout create-info, referencing its set layouts by live handle.
#[derive(Clone, Debug, Default)]
pub struct PipelineLayoutInput {
 /// `flags`.
 pub flags: u32,
 /// Set layout handles, in set-index order.
 pub set_layouts: Vec<Handle>,
 /// Push constant ranges.
 pub push_constant_ranges: Vec<PushConstantRange>,
}

/// How the capture layer identifies a pipeline's base-pipeline dependency.
#[derive(Clone, Copy, Debug)]
pub enum BasePipelineInput {
 /// The base pipeline's own handle — it must already have been recorded under the same
 /// resource tag as the pipeline being recorded now.
 Handle(Handle),
 /// The base pipeline's hash, supplied directly by the caller because the base was created
 /// *after* the derived pipeline and so has no handle the recorder can resolve yet.
 Hash(Hash),
}

/// A graphics pipeline create-info, referencing its dependencies by live handle.
#[derive(Clone, Debug)]
pub struct GraphicsPipelineInput {
 /// `flags`.
 pub flags: u32,
 /// Shader stages.
 pub stages: Vec<ShaderStageInput>,
 /// `pVertexInputState`.
 pub vertex_input: VertexInputState,
 /// `topology`.
 pub topology: u32,
 /// `primitiveRestartEnable`.
 pub primitive_restart_enable: bool,
 /// `pViewportState`.
 pub viewport_state: ViewportState,
 /// `pRasterizationState`.
 pub rasterization: RasterizationState,
 /// `pMultisampleState`.
 pub multisample: MultisampleState,
 /// `pDepthStencilState`.
 pub depth_stencil: Option<fossilize_model::DepthStencilState>,
 /// `pColorBlendState`.
 pub color_blend: ColorBlendState,
 /// `pDynamicState`.
 pub dynamic_state: Vec<DynamicState>,
 /// Handle of the pipeline layout.
 pub layout: Handle,
 /// Handle of the render pass.
 pub render_pass: Handle,
 /// `subpass`.
 pub subpass: u32,
 /// Base pipeline dependency, if any.
 pub base_pipeline: Option<BasePipelineInput>,
 /// Extension chain.
 pub pnext: Vec<PNextRecord>,
}

/// A compute pipeline create-info, referencing its dependencies by live handle.
#[derive(Clone, Debug)]
pub struct ComputePipelineInput {
 /// `flags`.
 pub flags: u32,
 /// The single compute shader stage.
 pub stage: ShaderStageInput,
 /// Handle of the pipeline layout.
 pub layout: Handle,
 /// Base pipeline dependency, if any.
 pub base_pipeline: Option<BasePipelineInput>,
}

/// A ray tracing pipeline create-info, referencing its dependencies by live handle.
#[derive(Clone, Debug)]
pub struct RaytracingPipelineInput {
 /// `flags`.
 pub flags: u32,
 /// Shader stages.
 pub stages: Vec<ShaderStageInput>,
 /// Shader groups.
 pub groups: Vec<RtShaderGroup>,
 /// `maxPipelineRayRecursionDepth`.
 pub max_recursion_depth: u32,
 /// Handle of the pipeline layout.
 pub layout: Handle,
 /// Base pipeline dependency, if any.
 pub base_pipeline: Option<BasePipelineInput>,
}
