// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`RaytracingPipelineInfo`].

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::{RaytracingPipelineInfo, RtShaderGroup, ShaderStage};

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

fn encode_group(group: &RtShaderGroup, w: &mut Writer) {
    w.u32(group.group_type)
        .u32(group.general_shader)
        .u32(group.closest_hit_shader)
        .u32(group.any_hit_shader)
        .u32(group.intersection_shader);
}

fn decode_group(r: &mut Reader<'_>) -> Result<RtShaderGroup, CodecError> {
    Ok(RtShaderGroup {
        group_type: r.u32()?,
        general_shader: r.u32()?,
        closest_hit_shader: r.u32()?,
        any_hit_shader: r.u32()?,
        intersection_shader: r.u32()?,
    })
}

/// Encodes a [`RaytracingPipelineInfo`].
pub fn encode(info: &RaytracingPipelineInfo, w: &mut Writer) {
    w.u32(info.flags);
    w.len_prefix(info.stages.len());
    for stage in &info.stages {
        encode_stage(stage, w);
    }
    w.len_prefix(info.groups.len());
    for group in &info.groups {
        encode_group(group, w);
    }
    w.u32(info.max_recursion_depth).u64(info.layout);
    w.option_u64(info.base_pipeline);
}

/// Decodes a [`RaytracingPipelineInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<RaytracingPipelineInfo, CodecError> {
    let flags = r.u32()?;
    let stage_count = r.len_prefix()?;
    let mut stages = Vec::with_capacity(stage_count.min(1 << 12));
    for _ in 0..stage_count {
        stages.push(decode_stage(r)?);
    }
    let group_count = r.len_prefix()?;
    let mut groups = Vec::with_capacity(group_count.min(1 << 12));
    for _ in 0..group_count {
        groups.push(decode_group(r)?);
    }
    let max_recursion_depth = r.u32()?;
    let layout = r.u64()?;
    let base_pipeline = r.option_u64()?;
    Ok(RaytracingPipelineInfo {
        flags,
        stages,
        groups,
        max_recursion_depth,
        layout,
        base_pipeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let info = RaytracingPipelineInfo {
            flags: 0,
            stages: vec![ShaderStage {
                stage: 0x400,
                module: 1,
                entry_point: "rgen".to_owned(),
            }],
            groups: vec![RtShaderGroup {
                group_type: 0,
                general_shader: 0,
                closest_hit_shader: u32::MAX,
                any_hit_shader: u32::MAX,
                intersection_shader: u32::MAX,
            }],
            max_recursion_depth: 1,
            layout: 3,
            base_pipeline: None,
        };
        let mut w = Writer::new();
        encode(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), info);
    }
}
