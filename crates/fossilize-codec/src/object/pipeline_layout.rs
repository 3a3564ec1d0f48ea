// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`PipelineLayoutInfo`].

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::{PipelineLayoutInfo, PushConstantRange};

/// Encodes a [`PipelineLayoutInfo`].
pub fn encode(info: &PipelineLayoutInfo, w: &mut Writer) {
    w.u32(info.flags);
    w.len_prefix(info.set_layouts.len());
    for &layout in &info.set_layouts {
        w.u64(layout);
    }
    w.len_prefix(info.push_constant_ranges.len());
    for range in &info.push_constant_ranges {
        w.u32(range.stage_flags).u32(range.offset).u32(range.size);
    }
}

/// Decodes a [`PipelineLayoutInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<PipelineLayoutInfo, CodecError> {
    let flags = r.u32()?;
    let set_layout_count = r.len_prefix()?;
    let mut set_layouts = Vec::with_capacity(set_layout_count.min(1 << 12));
    for _ in 0..set_layout_count {
        set_layouts.push(r.u64()?);
    }
    let range_count = r.len_prefix()?;
    let mut push_constant_ranges = Vec::with_capacity(range_count.min(1 << 12));
    for _ in 0..range_count {
        push_constant_ranges.push(PushConstantRange {
            stage_flags: r.u32()?,
            offset: r.u32()?,
            size: r.u32()?,
        });
    }
    Ok(PipelineLayoutInfo {
        flags,
        set_layouts,
        push_constant_ranges,
    })
}
