// SPDX-License-Identifier: Apache-2.0
//! The closed resource-tag enum (spec.md §3) and the two fixed orderings derived from it.

use std::fmt;

/// The closed set of resource kinds Fossilize records and replays.
///
/// Tag values are stable across format versions — they are written directly into the archive
/// (§6, one byte per record) and into encoded-blob headers (§4.3). Never renumber an existing
/// variant; append new ones at the end of the original C enum's numbering instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ResourceTag {
    /// `VkSampler`.
    Sampler = 0,
    /// `VkDescriptorSetLayout`.
    DescriptorSetLayout = 1,
    /// `VkPipelineLayout`.
    PipelineLayout = 2,
    /// `VkShaderModule`, or a driver shader-module identifier.
    ShaderModule = 3,
    /// `VkRenderPass`.
    RenderPass = 4,
    /// `VkPipeline` (graphics).
    GraphicsPipeline = 5,
    /// `VkPipeline` (compute).
    ComputePipeline = 6,
    /// `VkPipeline` (raytracing).
    RaytracingPipeline = 7,
    /// Application/engine identity metadata, recorded once per capture.
    ApplicationInfo = 8,
    /// An opaque blob keyed alongside an `ApplicationInfo`, for engine-specific side data.
    ApplicationBlobLink = 9,
}

/// Number of [`ResourceTag`] variants.
pub const TAG_COUNT: usize = 10;

/// Error returned by [`ResourceTag::try_from_u8`] for an out-of-range byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource tag byte {0}")]
pub struct UnknownTag(pub u8);

impl ResourceTag {
    /// All tags, in their archive-stable numeric order.
    pub const ALL: [ResourceTag; TAG_COUNT] = [
        ResourceTag::Sampler,
        ResourceTag::DescriptorSetLayout,
        ResourceTag::PipelineLayout,
        ResourceTag::ShaderModule,
        ResourceTag::RenderPass,
        ResourceTag::GraphicsPipeline,
        ResourceTag::ComputePipeline,
        ResourceTag::RaytracingPipeline,
        ResourceTag::ApplicationInfo,
        ResourceTag::ApplicationBlobLink,
    ];

    /// The numeric tag byte written into archive records and blob headers.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Recovers a [`ResourceTag`] from its archive byte.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTag`] for any byte outside `0..=9`. Per spec.md §4.4, an unknown tag
    /// during archive scanning ends the scan at that record; it must never be silently ignored.
    pub const fn try_from_u8(byte: u8) -> Result<Self, UnknownTag> {
        match byte {
            0 => Ok(ResourceTag::Sampler),
            1 => Ok(ResourceTag::DescriptorSetLayout),
            2 => Ok(ResourceTag::PipelineLayout),
            3 => Ok(ResourceTag::ShaderModule),
            4 => Ok(ResourceTag::RenderPass),
            5 => Ok(ResourceTag::GraphicsPipeline),
            6 => Ok(ResourceTag::ComputePipeline),
            7 => Ok(ResourceTag::RaytracingPipeline),
            8 => Ok(ResourceTag::ApplicationInfo),
            9 => Ok(ResourceTag::ApplicationBlobLink),
            other => Err(UnknownTag(other)),
        }
    }

    /// `true` for the three pipeline kinds the orchestrator partitions and replays in parallel.
    #[must_use]
    pub const fn is_pipeline(self) -> bool {
        matches!(
            self,
            ResourceTag::GraphicsPipeline
                | ResourceTag::ComputePipeline
                | ResourceTag::RaytracingPipeline
        )
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceTag::Sampler => "sampler",
            ResourceTag::DescriptorSetLayout => "descriptor_set_layout",
            ResourceTag::PipelineLayout => "pipeline_layout",
            ResourceTag::ShaderModule => "shader_module",
            ResourceTag::RenderPass => "render_pass",
            ResourceTag::GraphicsPipeline => "graphics_pipeline",
            ResourceTag::ComputePipeline => "compute_pipeline",
            ResourceTag::RaytracingPipeline => "raytracing_pipeline",
            ResourceTag::ApplicationInfo => "application_info",
            ResourceTag::ApplicationBlobLink => "application_blob_link",
        };
        f.write_str(name)
    }
}

/// The replayer's fixed tag playback order (spec.md §4.6), distinct from [`ResourceTag::ALL`]'s
/// archive-numbering order: application metadata and shader modules must be available before
/// anything that references them, and pipelines — the only tags the orchestrator replays
/// concurrently — come last.
pub const PLAYBACK_ORDER: [ResourceTag; TAG_COUNT] = [
    ResourceTag::ApplicationInfo,
    ResourceTag::ApplicationBlobLink,
    ResourceTag::ShaderModule,
    ResourceTag::Sampler,
    ResourceTag::DescriptorSetLayout,
    ResourceTag::PipelineLayout,
    ResourceTag::RenderPass,
    ResourceTag::GraphicsPipeline,
    ResourceTag::ComputePipeline,
    ResourceTag::RaytracingPipeline,
];
