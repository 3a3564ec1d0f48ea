// SPDX-License-Identifier: Apache-2.0
//! `VkSamplerCreateInfo`, normalized.

use crate::PNextRecord;

/// A normalized sampler create-info.
///
/// All fields participate in the fingerprint (spec.md §4.1) — a sampler has no fields that
/// become irrelevant based on another field's value, unlike most of the pipeline-state structs.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerInfo {
    /// `magFilter`.
    pub mag_filter: u32,
    /// `minFilter`.
    pub min_filter: u32,
    /// `mipmapMode`.
    pub mipmap_mode: u32,
    /// `addressModeU`.
    pub address_mode_u: u32,
    /// `addressModeV`.
    pub address_mode_v: u32,
    /// `addressModeW`.
    pub address_mode_w: u32,
    /// `mipLodBias`.
    pub mip_lod_bias: f32,
    /// `anisotropyEnable`.
    pub anisotropy_enable: bool,
    /// `maxAnisotropy`.
    pub max_anisotropy: f32,
    /// `compareEnable`.
    pub compare_enable: bool,
    /// `compareOp`.
    pub compare_op: u32,
    /// `minLod`.
    pub min_lod: f32,
    /// `maxLod`.
    pub max_lod: f32,
    /// `borderColor`.
    pub border_color: u32,
    /// `unnormalizedCoordinates`.
    pub unnormalized_coordinates: bool,
    /// Extension chain, in declaration order.
    pub pnext: Vec<PNextRecord>,
}

impl SamplerInfo {
    /// A sampler with Fossilize's benign defaults — linear filtering, repeat addressing,
    /// comparison and anisotropy disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mag_filter: 0,
            min_filter: 0,
            mipmap_mode: 0,
            address_mode_u: 0,
            address_mode_v: 0,
            address_mode_w: 0,
            mip_lod_bias: 0.0,
            anisotropy_enable: false,
            max_anisotropy: 1.0,
            compare_enable: false,
            compare_op: 0,
            min_lod: 0.0,
            max_lod: 0.0,
            border_color: 0,
            unnormalized_coordinates: false,
            pnext: Vec::new(),
        }
    }
}

impl Default for SamplerInfo {
    fn default() -> Self {
        Self::new()
    }
}
