// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`RenderPassInfo`].

use crate::error::CodecError;
use crate::pnext;
use crate::wire::{Reader, Writer};
use fossilize_model::{AttachmentDescription, RenderPassInfo, SubpassDescription};

fn encode_attachment(a: &AttachmentDescription, w: &mut Writer) {
    w.u32(a.format)
        .u32(a.samples)
        .u32(a.load_op)
        .u32(a.store_op)
        .u32(a.stencil_load_op)
        .u32(a.stencil_store_op)
        .u32(a.initial_layout)
        .u32(a.final_layout);
}

fn decode_attachment(r: &mut Reader<'_>) -> Result<AttachmentDescription, CodecError> {
    Ok(AttachmentDescription {
        format: r.u32()?,
        samples: r.u32()?,
        load_op: r.u32()?,
        store_op: r.u32()?,
        stencil_load_op: r.u32()?,
        stencil_store_op: r.u32()?,
        initial_layout: r.u32()?,
        final_layout: r.u32()?,
    })
}

fn encode_index_list(indices: &[u32], w: &mut Writer) {
    w.len_prefix(indices.len());
    for &index in indices {
        w.u32(index);
    }
}

fn decode_index_list(r: &mut Reader<'_>) -> Result<Vec<u32>, CodecError> {
    let count = r.len_prefix()?;
    let mut indices = Vec::with_capacity(count.min(1 << 12));
    for _ in 0..count {
        indices.push(r.u32()?);
    }
    Ok(indices)
}

fn encode_subpass(s: &SubpassDescription, w: &mut Writer) {
    w.u32(s.pipeline_bind_point);
    encode_index_list(&s.input_attachments, w);
    encode_index_list(&s.color_attachments, w);
    encode_index_list(&s.resolve_attachments, w);
    w.u32(s.depth_stencil_attachment.unwrap_or(u32::MAX));
    encode_index_list(&s.preserve_attachments, w);
}

fn decode_subpass(r: &mut Reader<'_>) -> Result<SubpassDescription, CodecError> {
    let pipeline_bind_point = r.u32()?;
    let input_attachments = decode_index_list(r)?;
    let color_attachments = decode_index_list(r)?;
    let resolve_attachments = decode_index_list(r)?;
    let depth_stencil_raw = r.u32()?;
    let preserve_attachments = decode_index_list(r)?;
    Ok(SubpassDescription {
        pipeline_bind_point,
        input_attachments,
        color_attachments,
        resolve_attachments,
        depth_stencil_attachment: (depth_stencil_raw != u32::MAX).then_some(depth_stencil_raw),
        preserve_attachments,
    })
}

/// Encodes a [`RenderPassInfo`].
pub fn encode(info: &RenderPassInfo, w: &mut Writer) {
    w.u32(info.flags);
    w.len_prefix(info.attachments.len());
    for attachment in &info.attachments {
        encode_attachment(attachment, w);
    }
    w.len_prefix(info.subpasses.len());
    for subpass in &info.subpasses {
        encode_subpass(subpass, w);
    }
    pnext::encode(&info.pnext, w);
}

/// Decodes a [`RenderPassInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<RenderPassInfo, CodecError> {
    let flags = r.u32()?;
    let attachment_count = r.len_prefix()?;
    let mut attachments = Vec::with_capacity(attachment_count.min(1 << 12));
    for _ in 0..attachment_count {
        attachments.push(decode_attachment(r)?);
    }
    let subpass_count = r.len_prefix()?;
    let mut subpasses = Vec::with_capacity(subpass_count.min(1 << 12));
    for _ in 0..subpass_count {
        subpasses.push(decode_subpass(r)?);
    }
    Ok(RenderPassInfo {
        flags,
        attachments,
        subpasses,
        pnext: pnext::decode(r)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_unused_depth_stencil() {
        let info = RenderPassInfo {
            flags: 0,
            attachments: vec![
                AttachmentDescription {
                    format: 37,
                    samples: 1,
                    load_op: 0,
                    store_op: 0,
                    stencil_load_op: 0,
                    stencil_store_op: 0,
                    initial_layout: 0,
                    final_layout: 2,
                },
                AttachmentDescription {
                    format: 126,
                    samples: 1,
                    load_op: 0,
                    store_op: 1,
                    stencil_load_op: 1,
                    stencil_store_op: 1,
                    initial_layout: 0,
                    final_layout: 3,
                },
            ],
            subpasses: vec![SubpassDescription {
                pipeline_bind_point: 0,
                input_attachments: vec![],
                color_attachments: vec![0],
                resolve_attachments: vec![],
                depth_stencil_attachment: None,
                preserve_attachments: vec![],
            }],
            pnext: Vec::new(),
        };
        let mut w = Writer::new();
        encode(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), info);
    }
}
