// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`SamplerInfo`].

use crate::error::CodecError;
use crate::pnext;
use crate::wire::{Reader, Writer};
use fossilize_model::SamplerInfo;

/// Encodes a [`SamplerInfo`].
pub fn encode(info: &SamplerInfo, w: &mut Writer) {
    w.u32(info.mag_filter)
        .u32(info.min_filter)
        .u32(info.mipmap_mode)
        .u32(info.address_mode_u)
        .u32(info.address_mode_v)
        .u32(info.address_mode_w)
        .f32(info.mip_lod_bias)
        .bool(info.anisotropy_enable)
        .f32(info.max_anisotropy)
        .bool(info.compare_enable)
        .u32(info.compare_op)
        .f32(info.min_lod)
        .f32(info.max_lod)
        .u32(info.border_color)
        .bool(info.unnormalized_coordinates);
    pnext::encode(&info.pnext, w);
}

/// Decodes a [`SamplerInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<SamplerInfo, CodecError> {
    Ok(SamplerInfo {
        mag_filter: r.u32()?,
        min_filter: r.u32()?,
        mipmap_mode: r.u32()?,
        address_mode_u: r.u32()?,
        address_mode_v: r.u32()?,
        address_mode_w: r.u32()?,
        mip_lod_bias: r.f32()?,
        anisotropy_enable: r.bool()?,
        max_anisotropy: r.f32()?,
        compare_enable: r.bool()?,
        compare_op: r.u32()?,
        min_lod: r.f32()?,
        max_lod: r.f32()?,
        border_color: r.u32()?,
        unnormalized_coordinates: r.bool()?,
        pnext: pnext::decode(r)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let mut info = SamplerInfo::new();
        info.mip_lod_bias = 90.0;
        info.min_filter = 1;
        let mut w = Writer::new();
        encode(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), info);
    }
}
