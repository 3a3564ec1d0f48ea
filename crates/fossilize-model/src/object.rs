// SPDX-License-Identifier: Apache-2.0
//! The tagged union over every resource kind, and its interned, hash-keyed wrapper.

use crate::{
    ApplicationBlobLinkInfo, ApplicationInfoInfo, ComputePipelineInfo, DescriptorSetLayoutInfo,
    GraphicsPipelineInfo, Hash, PipelineLayoutInfo, RaytracingPipelineInfo, RenderPassInfo,
    ResourceTag, SamplerInfo, ShaderModuleInfo,
};

/// A normalized create-info for one of the ten resource kinds Fossilize knows about.
///
/// Every embedded reference to another object (a descriptor set layout's immutable samplers, a
/// pipeline's layout and render pass, …) has already been replaced by that object's [`Hash`] —
/// see spec.md §4.2. Nothing here is ever mutated in place; replacing an object means producing a
/// new one and re-hashing it.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedObject {
    /// A sampler.
    Sampler(SamplerInfo),
    /// A descriptor set layout.
    DescriptorSetLayout(DescriptorSetLayoutInfo),
    /// A pipeline layout.
    PipelineLayout(PipelineLayoutInfo),
    /// A shader module.
    ShaderModule(ShaderModuleInfo),
    /// A render pass.
    RenderPass(RenderPassInfo),
    /// A graphics pipeline.
    GraphicsPipeline(GraphicsPipelineInfo),
    /// A compute pipeline.
    ComputePipeline(ComputePipelineInfo),
    /// A ray tracing pipeline.
    RaytracingPipeline(RaytracingPipelineInfo),
    /// Application metadata.
    ApplicationInfo(ApplicationInfoInfo),
    /// An application-defined opaque blob link.
    ApplicationBlobLink(ApplicationBlobLinkInfo),
}

impl NormalizedObject {
    /// The [`ResourceTag`] this object is stored and dispatched under.
    #[must_use]
    pub const fn tag(&self) -> ResourceTag {
        match self {
            NormalizedObject::Sampler(_) => ResourceTag::Sampler,
            NormalizedObject::DescriptorSetLayout(_) => ResourceTag::DescriptorSetLayout,
            NormalizedObject::PipelineLayout(_) => ResourceTag::PipelineLayout,
            NormalizedObject::ShaderModule(_) => ResourceTag::ShaderModule,
            NormalizedObject::RenderPass(_) => ResourceTag::RenderPass,
            NormalizedObject::GraphicsPipeline(_) => ResourceTag::GraphicsPipeline,
            NormalizedObject::ComputePipeline(_) => ResourceTag::ComputePipeline,
            NormalizedObject::RaytracingPipeline(_) => ResourceTag::RaytracingPipeline,
            NormalizedObject::ApplicationInfo(_) => ResourceTag::ApplicationInfo,
            NormalizedObject::ApplicationBlobLink(_) => ResourceTag::ApplicationBlobLink,
        }
    }

    /// The hashes of every other object this one directly depends on, in the order that
    /// `fossilize-hash`'s dependency-closure mixing expects them (spec.md §4.2).
    ///
    /// Leaf kinds (samplers, shader modules, application records) return an empty vector.
    #[must_use]
    pub fn direct_dependencies(&self) -> Vec<Hash> {
        match self {
            NormalizedObject::Sampler(_)
            | NormalizedObject::ShaderModule(_)
            | NormalizedObject::ApplicationInfo(_)
            | NormalizedObject::ApplicationBlobLink(_) => Vec::new(),
            NormalizedObject::DescriptorSetLayout(info) => info
                .bindings
                .iter()
                .flat_map(|binding| binding.immutable_samplers.iter().copied())
                .collect(),
            NormalizedObject::PipelineLayout(info) => info.set_layouts.clone(),
            NormalizedObject::RenderPass(_) => Vec::new(),
            NormalizedObject::GraphicsPipeline(info) => {
                let mut deps: Vec<Hash> = info.stages.iter().map(|stage| stage.module).collect();
                deps.push(info.layout);
                deps.push(info.render_pass);
                deps.extend(info.base_pipeline);
                deps
            }
            NormalizedObject::ComputePipeline(info) => {
                let mut deps = vec![info.stage.module, info.layout];
                deps.extend(info.base_pipeline);
                deps
            }
            NormalizedObject::RaytracingPipeline(info) => {
                let mut deps: Vec<Hash> = info.stages.iter().map(|stage| stage.module).collect();
                deps.push(info.layout);
                deps.extend(info.base_pipeline);
                deps
            }
        }
    }
}

/// A [`NormalizedObject`] together with the content hash it was interned under.
///
/// This is the unit the recorder's intern table stores and the unit the database writes —
/// pairing the object with its own key means neither can be consulted without the other being
/// available, which matches how every consumer actually uses them.
#[derive(Clone, Debug, PartialEq)]
pub struct InternedObject {
    /// The object's content hash, as produced by `fossilize-hash`.
    pub hash: Hash,
    /// The normalized object itself.
    pub object: NormalizedObject,
}

impl InternedObject {
    /// Pairs an object with its hash.
    #[must_use]
    pub fn new(hash: Hash, object: NormalizedObject) -> Self {
        Self { hash, object }
    }

    /// The [`ResourceTag`] of the wrapped object.
    #[must_use]
    pub const fn tag(&self) -> ResourceTag {
        self.object.tag()
    }
}
