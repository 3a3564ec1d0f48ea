// SPDX-License-Identifier: Apache-2.0
//! `VkRayTracingPipelineCreateInfoKHR`, normalized.

use crate::info::graphics::ShaderStage;
use crate::Hash;

/// `VkRayTracingShaderGroupCreateInfoKHR`. Indices are into the owning pipeline's `stages` array,
/// or `u32::MAX` (`VK_SHADER_UNUSED_KHR`) when a role has no shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtShaderGroup {
    /// `type` — general, triangles-hit-group, or procedural-hit-group.
    pub group_type: u32,
    /// `generalShader` stage index, for general groups.
    pub general_shader: u32,
    /// `closestHitShader` stage index.
    pub closest_hit_shader: u32,
    /// `anyHitShader` stage index.
    pub any_hit_shader: u32,
    /// `intersectionShader` stage index.
    pub intersection_shader: u32,
}

/// A normalized ray tracing pipeline create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct RaytracingPipelineInfo {
    /// `flags`.
    pub flags: u32,
    /// Shader stages, in declaration order.
    pub stages: Vec<ShaderStage>,
    /// Shader groups, in declaration order.
    pub groups: Vec<RtShaderGroup>,
    /// `maxPipelineRayRecursionDepth`.
    pub max_recursion_depth: u32,
    /// Hash of the referenced [`crate::PipelineLayoutInfo`].
    pub layout: Hash,
    /// Base pipeline, if this pipeline was derived from another.
    pub base_pipeline: Option<Hash>,
}
