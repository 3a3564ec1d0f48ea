// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`DescriptorSetLayoutInfo`].

use crate::error::CodecError;
use crate::pnext;
use crate::wire::{Reader, Writer};
use fossilize_model::{DescriptorSetLayoutBinding, DescriptorSetLayoutInfo};

fn encode_binding(binding: &DescriptorSetLayoutBinding, w: &mut Writer) {
    w.u32(binding.binding)
        .u32(binding.descriptor_type)
        .u32(binding.descriptor_count)
        .u32(binding.stage_flags);
    w.len_prefix(binding.immutable_samplers.len());
    for &sampler in &binding.immutable_samplers {
        w.u64(sampler);
    }
}

fn decode_binding(r: &mut Reader<'_>) -> Result<DescriptorSetLayoutBinding, CodecError> {
    let binding = r.u32()?;
    let descriptor_type = r.u32()?;
    let descriptor_count = r.u32()?;
    let stage_flags = r.u32()?;
    let count = r.len_prefix()?;
    let mut immutable_samplers = Vec::with_capacity(count.min(1 << 12));
    for _ in 0..count {
        immutable_samplers.push(r.u64()?);
    }
    Ok(DescriptorSetLayoutBinding {
        binding,
        descriptor_type,
        descriptor_count,
        stage_flags,
        immutable_samplers,
    })
}

/// Encodes a [`DescriptorSetLayoutInfo`].
pub fn encode(info: &DescriptorSetLayoutInfo, w: &mut Writer) {
    w.u32(info.flags);
    w.len_prefix(info.bindings.len());
    for binding in &info.bindings {
        encode_binding(binding, w);
    }
    pnext::encode(&info.pnext, w);
}

/// Decodes a [`DescriptorSetLayoutInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<DescriptorSetLayoutInfo, CodecError> {
    let flags = r.u32()?;
    let count = r.len_prefix()?;
    let mut bindings = Vec::with_capacity(count.min(1 << 12));
    for _ in 0..count {
        bindings.push(decode_binding(r)?);
    }
    Ok(DescriptorSetLayoutInfo {
        flags,
        bindings,
        pnext: pnext::decode(r)?,
    })
}
