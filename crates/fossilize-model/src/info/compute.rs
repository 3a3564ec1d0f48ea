// SPDX-License-Identifier: Apache-2.0
//! `VkComputePipelineCreateInfo`, normalized.

use crate::info::graphics::ShaderStage;
use crate::Hash;

/// A normalized compute pipeline create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputePipelineInfo {
    /// `flags`.
    pub flags: u32,
    /// The single compute shader stage.
    pub stage: ShaderStage,
    /// Hash of the referenced [`crate::PipelineLayoutInfo`].
    pub layout: Hash,
    /// Base pipeline, if this pipeline was derived from another.
    pub base_pipeline: Option<Hash>,
}
