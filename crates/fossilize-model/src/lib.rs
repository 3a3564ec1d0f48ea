// SPDX-License-Identifier: Apache-2.0
//! The normalized pipeline-state data model shared by every other Fossilize crate.
//!
//! A [`NormalizedObject`] is what's left once a live API handle's create-info has been
//! deep-copied and every embedded object handle has been replaced by the [`Hash`] of the
//! object it referenced. Nothing in this crate computes hashes or performs I/O — it just
//! defines the shapes that [`fossilize-hash`](../fossilize_hash/index.html),
//! [`fossilize-codec`](../fossilize_codec/index.html) and
//! [`fossilize-recorder`](../fossilize_recorder/index.html) all operate on.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod ext;
mod info;
mod object;
mod tag;

pub use ext::PNextRecord;
pub use info::{
    application::{ApplicationBlobLinkInfo, ApplicationInfoInfo},
    compute::ComputePipelineInfo,
    descriptor_set_layout::{DescriptorSetLayoutBinding, DescriptorSetLayoutInfo},
    graphics::{
        AttachmentDescription, ColorBlendAttachment, ColorBlendState, DepthStencilState,
        DynamicState, GraphicsPipelineInfo, RasterizationState, RenderPassInfo, ShaderStage,
        StencilOpState, SubpassDescription, VertexInputState, Viewport, ViewportState,
    },
    pipeline_layout::{PipelineLayoutInfo, PushConstantRange},
    raytracing::{RaytracingPipelineInfo, RtShaderGroup},
    sampler::SamplerInfo,
    shader_module::ShaderModuleInfo,
};
pub use object::{InternedObject, NormalizedObject};
pub use tag::{ResourceTag, PLAYBACK_ORDER, TAG_COUNT};

/// A 64-bit content fingerprint.
///
/// This is the same scalar everywhere in Fossilize: the archive's lookup key, the value an
/// embedded object reference is replaced with once interned, and the handle that stands in for
/// a not-yet-resolved dependency. `fossilize-hash` is the only crate that knows how to produce
/// one from a [`NormalizedObject`]; every other crate treats it as an opaque, totally-ordered
/// 64-bit value.
pub type Hash = u64;

/// Hex-formats a [`Hash`] the way Fossilize's archive keys and IPC messages render one: lowercase,
/// fixed-width, no `0x` prefix.
#[must_use]
pub fn format_hash(hash: Hash) -> String {
    format!("{hash:016x}")
}

/// Parses a [`Hash`] from the fixed-width lowercase hex rendering produced by [`format_hash`].
///
/// # Errors
///
/// Returns an error if `text` isn't valid hexadecimal.
pub fn parse_hash(text: &str) -> Result<Hash, std::num::ParseIntError> {
    Hash::from_str_radix(text, 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_through_hex() {
        let h: Hash = 0xdead_beef_cafe_babe;
        assert_eq!(parse_hash(&format_hash(h)).unwrap(), h);
    }

    #[test]
    fn format_hash_is_fixed_width() {
        assert_eq!(format_hash(0).len(), 16);
        assert_eq!(format_hash(1).len(), 16);
        assert_eq!(format_hash(0).as_str(), "0000000000000000");
    }
}
