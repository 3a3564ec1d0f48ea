// SPDX-License-Identifier: Apache-2.0
//! `VkRenderPassCreateInfo` and `VkGraphicsPipelineCreateInfo`, normalized.
//!
//! This module carries the spec's single most subtle requirement (spec.md §4.1): several fields
//! here are only semantically meaningful conditional on another field's value (an attachment's
//! blend factors, a dynamic viewport/scissor array, stencil masks with stencil testing disabled).
//! The structs keep every field regardless — `fossilize-hash` is what decides which ones to mix.

use crate::{Hash, PNextRecord};

/// One shader stage attached to a pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderStage {
    /// `VkShaderStageFlagBits` — exactly one bit set.
    pub stage: u32,
    /// Hash of the referenced [`crate::ShaderModuleInfo`].
    pub module: Hash,
    /// Entry point name, e.g. `"main"`.
    pub entry_point: String,
}

/// `VkVertexInputBindingDescription` + `VkVertexInputAttributeDescription`, flattened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexInputState {
    /// `(binding, stride, input_rate)` triples.
    pub bindings: Vec<(u32, u32, u32)>,
    /// `(location, binding, format, offset)` quadruples.
    pub attributes: Vec<(u32, u32, u32, u32)>,
}

/// `VkViewport`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// `x`.
    pub x: f32,
    /// `y`.
    pub y: f32,
    /// `width`.
    pub width: f32,
    /// `height`.
    pub height: f32,
    /// `minDepth`.
    pub min_depth: f32,
    /// `maxDepth`.
    pub max_depth: f32,
}

/// `VkRect2D`, used both as a scissor rectangle and as a render-pass render area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect2D {
    /// `offset.x`.
    pub x: i32,
    /// `offset.y`.
    pub y: i32,
    /// `extent.width`.
    pub width: u32,
    /// `extent.height`.
    pub height: u32,
}

/// `VkPipelineViewportStateCreateInfo`.
///
/// Whether this state's arrays participate in the fingerprint depends on whether
/// `DynamicState::Viewport` / `DynamicState::Scissor` is present in the owning pipeline's dynamic
/// state list — see spec.md §4.1. The struct always carries whatever the caller supplied; masking
/// happens in `fossilize-hash`, not here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportState {
    /// Static viewports. Irrelevant (and normally empty) when viewport state is dynamic.
    pub viewports: Vec<Viewport>,
    /// Static scissors. Irrelevant (and normally empty) when scissor state is dynamic.
    pub scissors: Vec<Rect2D>,
}

/// `VkPipelineRasterizationStateCreateInfo`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterizationState {
    /// `depthClampEnable`.
    pub depth_clamp_enable: bool,
    /// `rasterizerDiscardEnable`.
    pub rasterizer_discard_enable: bool,
    /// `polygonMode`.
    pub polygon_mode: u32,
    /// `cullMode`.
    pub cull_mode: u32,
    /// `frontFace`.
    pub front_face: u32,
    /// `depthBiasEnable`.
    pub depth_bias_enable: bool,
    /// `depthBiasConstantFactor`. Irrelevant when `depth_bias_enable` is false, and also when
    /// `DynamicState::DepthBias` makes it dynamic.
    pub depth_bias_constant_factor: f32,
    /// `depthBiasClamp`. Irrelevant when `depth_bias_enable` is false, and also when
    /// `DynamicState::DepthBias` makes it dynamic.
    pub depth_bias_clamp: f32,
    /// `depthBiasSlopeFactor`. Irrelevant when `depth_bias_enable` is false, and also when
    /// `DynamicState::DepthBias` makes it dynamic.
    pub depth_bias_slope_factor: f32,
    /// `lineWidth`. Irrelevant when `DynamicState::LineWidth` makes it dynamic.
    pub line_width: f32,
}

/// `VkPipelineMultisampleStateCreateInfo`.
#[derive(Clone, Debug, PartialEq)]
pub struct MultisampleState {
    /// `rasterizationSamples`.
    pub rasterization_samples: u32,
    /// `sampleShadingEnable`.
    pub sample_shading_enable: bool,
    /// `minSampleShading`. Irrelevant when `sample_shading_enable` is false.
    pub min_sample_shading: f32,
    /// `pSampleMask`, one word per 32 samples. Empty means "no mask" (all samples enabled).
    pub sample_mask: Vec<u32>,
    /// `alphaToCoverageEnable`.
    pub alpha_to_coverage_enable: bool,
    /// `alphaToOneEnable`.
    pub alpha_to_one_enable: bool,
}

/// `VkStencilOpState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilOpState {
    /// `failOp`.
    pub fail_op: u32,
    /// `passOp`.
    pub pass_op: u32,
    /// `depthFailOp`.
    pub depth_fail_op: u32,
    /// `compareOp`.
    pub compare_op: u32,
    /// `compareMask`. Irrelevant when the owning state's `stencil_test_enable` is false, and also
    /// when `DynamicState::StencilCompareMask` makes it dynamic.
    pub compare_mask: u32,
    /// `writeMask`. Irrelevant when the owning state's `stencil_test_enable` is false, and also
    /// when `DynamicState::StencilWriteMask` makes it dynamic.
    pub write_mask: u32,
    /// `reference`. Irrelevant when the owning state's `stencil_test_enable` is false, and also
    /// when `DynamicState::StencilReference` makes it dynamic.
    pub reference: u32,
}

/// `VkPipelineDepthStencilStateCreateInfo`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthStencilState {
    /// `depthTestEnable`.
    pub depth_test_enable: bool,
    /// `depthWriteEnable`. Irrelevant when `depth_test_enable` is false.
    pub depth_write_enable: bool,
    /// `depthCompareOp`. Irrelevant when `depth_test_enable` is false.
    pub depth_compare_op: u32,
    /// `depthBoundsTestEnable`.
    pub depth_bounds_test_enable: bool,
    /// `minDepthBounds`. Irrelevant when `depth_bounds_test_enable` is false, and also when
    /// `DynamicState::DepthBounds` makes it dynamic.
    pub min_depth_bounds: f32,
    /// `maxDepthBounds`. Irrelevant when `depth_bounds_test_enable` is false, and also when
    /// `DynamicState::DepthBounds` makes it dynamic.
    pub max_depth_bounds: f32,
    /// `stencilTestEnable`.
    pub stencil_test_enable: bool,
    /// `front`. Its mask/reference fields are irrelevant when `stencil_test_enable` is false.
    pub front: StencilOpState,
    /// `back`. Its mask/reference fields are irrelevant when `stencil_test_enable` is false.
    pub back: StencilOpState,
}

/// `VkPipelineColorBlendAttachmentState`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBlendAttachment {
    /// `blendEnable`.
    pub blend_enable: bool,
    /// `srcColorBlendFactor`. Irrelevant when `blend_enable` is false.
    pub src_color_blend_factor: u32,
    /// `dstColorBlendFactor`. Irrelevant when `blend_enable` is false.
    pub dst_color_blend_factor: u32,
    /// `colorBlendOp`. Irrelevant when `blend_enable` is false.
    pub color_blend_op: u32,
    /// `srcAlphaBlendFactor`. Irrelevant when `blend_enable` is false.
    pub src_alpha_blend_factor: u32,
    /// `dstAlphaBlendFactor`. Irrelevant when `blend_enable` is false.
    pub dst_alpha_blend_factor: u32,
    /// `alphaBlendOp`. Irrelevant when `blend_enable` is false.
    pub alpha_blend_op: u32,
    /// `colorWriteMask`.
    pub color_write_mask: u32,
}

impl ColorBlendAttachment {
    /// `true` if this attachment's blend factors reference the constant blend color
    /// (`CONSTANT_COLOR`, `ONE_MINUS_CONSTANT_COLOR`, `CONSTANT_ALPHA`, `ONE_MINUS_CONSTANT_ALPHA`
    /// — Vulkan enumerants 4 through 7 inclusive), which is what makes the owning
    /// [`ColorBlendState::blend_constants`] field relevant to the fingerprint.
    #[must_use]
    pub const fn uses_blend_constant(&self) -> bool {
        if !self.blend_enable {
            return false;
        }
        const CONSTANT_FACTORS_LO: u32 = 4;
        const CONSTANT_FACTORS_HI: u32 = 7;
        let uses = |factor: u32| (CONSTANT_FACTORS_LO..=CONSTANT_FACTORS_HI).contains(&factor);
        uses(self.src_color_blend_factor)
            || uses(self.dst_color_blend_factor)
            || uses(self.src_alpha_blend_factor)
            || uses(self.dst_alpha_blend_factor)
    }
}

/// `VkPipelineColorBlendStateCreateInfo`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBlendState {
    /// `logicOpEnable`.
    pub logic_op_enable: bool,
    /// `logicOp`. Irrelevant when `logic_op_enable` is false.
    pub logic_op: u32,
    /// Per-attachment blend state, one entry per color attachment in the subpass.
    pub attachments: Vec<ColorBlendAttachment>,
    /// `blendConstants[4]`. Irrelevant unless some attachment's blend factors reference the
    /// constant color (spec.md §8 scenario S6) — see [`ColorBlendAttachment::uses_blend_constant`]
    /// — and also irrelevant whenever `DynamicState::BlendConstants` makes it dynamic.
    pub blend_constants: [f32; 4],
}

impl ColorBlendState {
    /// `true` if any attachment's blend factors make [`ColorBlendState::blend_constants`] relevant.
    #[must_use]
    pub fn blend_constants_relevant(&self) -> bool {
        self.attachments.iter().any(ColorBlendAttachment::uses_blend_constant)
    }
}

/// `VkDynamicState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DynamicState {
    /// Viewport array is supplied at draw time, not baked into the pipeline.
    Viewport = 0,
    /// Scissor array is supplied at draw time.
    Scissor = 1,
    /// Line width is supplied at draw time.
    LineWidth = 2,
    /// Depth bias parameters are supplied at draw time.
    DepthBias = 3,
    /// Blend constants are supplied at draw time.
    BlendConstants = 4,
    /// Depth bounds are supplied at draw time.
    DepthBounds = 5,
    /// Stencil compare mask is supplied at draw time.
    StencilCompareMask = 6,
    /// Stencil write mask is supplied at draw time.
    StencilWriteMask = 7,
    /// Stencil reference is supplied at draw time.
    StencilReference = 8,
}

/// `VkAttachmentDescription`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentDescription {
    /// `format`.
    pub format: u32,
    /// `samples`.
    pub samples: u32,
    /// `loadOp`.
    pub load_op: u32,
    /// `storeOp`.
    pub store_op: u32,
    /// `stencilLoadOp`.
    pub stencil_load_op: u32,
    /// `stencilStoreOp`.
    pub stencil_store_op: u32,
    /// `initialLayout`.
    pub initial_layout: u32,
    /// `finalLayout`.
    pub final_layout: u32,
}

/// `VkSubpassDescription`, attachment references flattened to plain indices
/// (`VK_ATTACHMENT_UNUSED` is `u32::MAX`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubpassDescription {
    /// `pipelineBindPoint`.
    pub pipeline_bind_point: u32,
    /// Input attachment indices.
    pub input_attachments: Vec<u32>,
    /// Color attachment indices.
    pub color_attachments: Vec<u32>,
    /// Resolve attachment indices, one per color attachment, or empty if none are resolved.
    pub resolve_attachments: Vec<u32>,
    /// Depth/stencil attachment index, or `None` if the subpass has none.
    pub depth_stencil_attachment: Option<u32>,
    /// Preserved attachment indices.
    pub preserve_attachments: Vec<u32>,
}

/// A normalized render pass create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPassInfo {
    /// `flags`.
    pub flags: u32,
    /// Attachment declarations, in declaration order.
    pub attachments: Vec<AttachmentDescription>,
    /// Subpass declarations, in declaration order.
    pub subpasses: Vec<SubpassDescription>,
    /// Extension chain (e.g. [`PNextRecord::RenderPassMultiview`]).
    pub pnext: Vec<PNextRecord>,
}

impl RenderPassInfo {
    /// A render pass with no attachments and no subpasses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: 0,
            attachments: Vec::new(),
            subpasses: Vec::new(),
            pnext: Vec::new(),
        }
    }
}

impl Default for RenderPassInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A normalized graphics pipeline create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsPipelineInfo {
    /// `flags`.
    pub flags: u32,
    /// Shader stages, in declaration order.
    pub stages: Vec<ShaderStage>,
    /// `pVertexInputState`.
    pub vertex_input: VertexInputState,
    /// `topology` (from `VkPipelineInputAssemblyStateCreateInfo`).
    pub topology: u32,
    /// `primitiveRestartEnable`.
    pub primitive_restart_enable: bool,
    /// `pViewportState`. Irrelevant whole-cloth when both `Viewport` and `Scissor` are dynamic —
    /// see [`GraphicsPipelineInfo::viewport_state_relevant`].
    pub viewport_state: ViewportState,
    /// `pRasterizationState`.
    pub rasterization: RasterizationState,
    /// `pMultisampleState`.
    pub multisample: MultisampleState,
    /// `pDepthStencilState`. `None` when the subpass has no depth/stencil attachment.
    pub depth_stencil: Option<DepthStencilState>,
    /// `pColorBlendState`.
    pub color_blend: ColorBlendState,
    /// `pDynamicState`, the set of dynamic states enabled on this pipeline.
    pub dynamic_state: Vec<DynamicState>,
    /// Hash of the referenced [`crate::PipelineLayoutInfo`].
    pub layout: Hash,
    /// Hash of the referenced [`RenderPassInfo`].
    pub render_pass: Hash,
    /// `subpass`.
    pub subpass: u32,
    /// Base pipeline, if this pipeline was derived from another (spec.md §4.2's base-pipeline
    /// fallback applies when recording, not here — by the time this struct exists the hash is
    /// already resolved one way or another).
    pub base_pipeline: Option<Hash>,
    /// Extension chain.
    pub pnext: Vec<PNextRecord>,
}

impl GraphicsPipelineInfo {
    /// `true` if `dynamic_state` makes the viewport array irrelevant to the fingerprint.
    #[must_use]
    pub fn viewport_array_relevant(&self) -> bool {
        !self.dynamic_state.contains(&DynamicState::Viewport)
    }

    /// `true` if `dynamic_state` makes the scissor array irrelevant to the fingerprint.
    #[must_use]
    pub fn scissor_array_relevant(&self) -> bool {
        !self.dynamic_state.contains(&DynamicState::Scissor)
    }
}
