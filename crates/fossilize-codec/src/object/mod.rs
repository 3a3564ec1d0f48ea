// SPDX-License-Identifier: Apache-2.0
//! Per-resource-kind encoders/decoders, dispatched over [`NormalizedObject`] by [`encode`]/[`decode`].

pub mod application;
pub mod compute;
pub mod descriptor_set_layout;
pub mod graphics;
pub mod pipeline_layout;
pub mod raytracing;
pub mod render_pass;
pub mod sampler;
pub mod shader_module;

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::{NormalizedObject, ResourceTag};

/// Encodes a [`NormalizedObject`]'s payload (its tag is carried by the blob header, not repeated
/// here).
pub fn encode(object: &NormalizedObject, w: &mut Writer) {
    match object {
        NormalizedObject::Sampler(info) => sampler::encode(info, w),
        NormalizedObject::DescriptorSetLayout(info) => descriptor_set_layout::encode(info, w),
        NormalizedObject::PipelineLayout(info) => pipeline_layout::encode(info, w),
        NormalizedObject::ShaderModule(info) => shader_module::encode(info, w),
        NormalizedObject::RenderPass(info) => render_pass::encode(info, w),
        NormalizedObject::GraphicsPipeline(info) => graphics::encode(info, w),
        NormalizedObject::ComputePipeline(info) => compute::encode(info, w),
        NormalizedObject::RaytracingPipeline(info) => raytracing::encode(info, w),
        NormalizedObject::ApplicationInfo(info) => application::encode_info(info, w),
        NormalizedObject::ApplicationBlobLink(info) => application::encode_blob_link(info, w),
    }
}

/// Decodes a [`NormalizedObject`]'s payload, given the tag that selects which variant to parse.
pub fn decode(tag: ResourceTag, r: &mut Reader<'_>) -> Result<NormalizedObject, CodecError> {
    Ok(match tag {
        ResourceTag::Sampler => NormalizedObject::Sampler(sampler::decode(r)?),
        ResourceTag::DescriptorSetLayout => {
            NormalizedObject::DescriptorSetLayout(descriptor_set_layout::decode(r)?)
        }
        ResourceTag::PipelineLayout => NormalizedObject::PipelineLayout(pipeline_layout::decode(r)?),
        ResourceTag::ShaderModule => NormalizedObject::ShaderModule(shader_module::decode(r)?),
        ResourceTag::RenderPass => NormalizedObject::RenderPass(render_pass::decode(r)?),
        ResourceTag::GraphicsPipeline => NormalizedObject::GraphicsPipeline(graphics::decode(r)?),
        ResourceTag::ComputePipeline => NormalizedObject::ComputePipeline(compute::decode(r)?),
        ResourceTag::RaytracingPipeline => {
            NormalizedObject::RaytracingPipeline(raytracing::decode(r)?)
        }
        ResourceTag::ApplicationInfo => {
            NormalizedObject::ApplicationInfo(application::decode_info(r)?)
        }
        ResourceTag::ApplicationBlobLink => {
            NormalizedObject::ApplicationBlobLink(application::decode_blob_link(r)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fossilize_model::SamplerInfo;

    #[test]
    fn dispatch_round_trips_by_tag() {
        let object = NormalizedObject::Sampler(SamplerInfo::new());
        let mut w = Writer::new();
        encode(&object, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(ResourceTag::Sampler, &mut r).unwrap(), object);
    }
}
