// SPDX-License-Identifier: Apache-2.0
//! Extension-chain framing: `{ struct-type-tag, length, body }` records.
//!
//! An unrecognized struct-type-tag rejects the whole object — it is never silently dropped, since
//! dropping a struct here would silently change the create-info's semantics.

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::PNextRecord;

/// Encodes an extension chain as a length-prefixed sequence of tagged, length-prefixed records.
pub fn encode(chain: &[PNextRecord], w: &mut Writer) {
 w.len_prefix(chain.len());
 for record in chain {
 w.u32(record.type_tag());
 let mut body = Writer::new();
 match record {
 PNextRecord::SamplerReductionMode { mode } => {
 body.u32(*mode);
 }
 PNextRecord::RenderPassMultiview { view_masks } => {
 body.len_prefix(view_masks.len());
 for &mask in view_masks {
 body.u32(mask);
 }
 }
 }
 let body_bytes = body.into_bytes();
 w.len_prefix(body_bytes.len());
 for byte in body_bytes {
 w.u8(byte);
 }
 }
}

/// Decodes an extension chain.
///
/// # Errors
///
/// [`CodecError::UnknownExtensionTag`] for any struct-type-tag this codec does not recognize.
pub fn decode(r: &mut Reader<'_>) -> Result<Vec<PNextRecord>, CodecError> {
 let count = r.len_prefix()?;
 let mut chain = Vec::with_capacity(count.min(1 << 12));
 for _ in 0..count {
 let tag = r.u32()?;
 let len = r.len_prefix()?;
 let body_bytes = r.bytes_exact(len)?;
 let mut body = Reader::new(body_bytes);
 let record = match tag {
 PNextRecord::TAG_SAMPLER_REDUCTION_MODE => PNextRecord::SamplerReductionMode {
 mode: body.u32()?,
 },
 PNextRecord::TAG_RENDER_PASS_MULTIVIEW => {
 let count = body.len_prefix()?;
 let mut view_masks = Vec::with_capacity(count.min(1 << 12));
 for _ in 0..count {
 view_masks.push(body.u32()?);
 }
 PNextRecord::RenderPassMultiview { view_masks }
 }
 other => return Err(CodecError::UnknownExtensionTag(other)),
 };
 chain.push(record);
 }
 Ok(chain)
}
