// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`ComputePipelineInfo`].

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::{ComputePipelineInfo, ShaderStage};

/// Encodes a [`ComputePipelineInfo`].
pub fn encode(info: &ComputePipelineInfo, w: &mut Writer) {
    w.u32(info.flags);
    w.u32(info.stage.stage).u64(info.stage.module).string(&info.stage.entry_point);
    w.u64(info.layout);
    w.option_u64(info.base_pipeline);
}

/// Decodes a [`ComputePipelineInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<ComputePipelineInfo, CodecError> {
    let flags = r.u32()?;
    let stage = ShaderStage {
        stage: r.u32()?,
        module: r.u64()?,
        entry_point: r.string()?,
    };
    let layout = r.u64()?;
    let base_pipeline = r.option_u64()?;
    Ok(ComputePipelineInfo {
        flags,
        stage,
        layout,
        base_pipeline,
    })
}
