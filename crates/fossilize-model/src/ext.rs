// SPDX-License-Identifier: Apache-2.0
//! The extension chain (`pNext`) — spec.md §9's "linked list of tagged structs" design note.
//!
//! Each known extension struct gets one [`PNextRecord`] variant. `fossilize-hash` and
//! `fossilize-codec` both walk the chain in declaration order and both reject an unrecognized
//! struct-type-tag outright (spec.md §4.3) rather than skipping it — a dropped extension struct
//! would silently change the object's semantics.

/// One link in a normalized create-info's extension chain.
///
/// Variant order here has no meaning; declaration order within a chain is carried by the
/// `Vec<PNextRecord>` that holds them, not by this enum.
#[derive(Clone, Debug, PartialEq)]
pub enum PNextRecord {
    /// `VkSamplerReductionModeCreateInfo` — changes how a sampler's texel filter combines
    /// samples (weighted average, min, or max).
    SamplerReductionMode {
        /// `VkSamplerReductionMode` value.
        mode: u32,
    },
    /// `VkRenderPassMultiviewCreateInfo` — per-subpass view masks for multiview rendering.
    RenderPassMultiview {
        /// One view mask per subpass, same length as the owning render pass's subpass list.
        view_masks: Vec<u32>,
    },
}

/// The wire/hash type-tag for a [`PNextRecord`] variant — written before its body so a decoder
/// can recognize (or reject) it without guessing from the body's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown pNext struct-type-tag {0}")]
pub struct UnknownExtensionTag(pub u32);

impl PNextRecord {
    /// Tag for [`PNextRecord::SamplerReductionMode`].
    pub const TAG_SAMPLER_REDUCTION_MODE: u32 = 1;
    /// Tag for [`PNextRecord::RenderPassMultiview`].
    pub const TAG_RENDER_PASS_MULTIVIEW: u32 = 2;

    /// The struct-type-tag this record encodes and hashes under.
    #[must_use]
    pub const fn type_tag(&self) -> u32 {
        match self {
            PNextRecord::SamplerReductionMode { .. } => Self::TAG_SAMPLER_REDUCTION_MODE,
            PNextRecord::RenderPassMultiview { .. } => Self::TAG_RENDER_PASS_MULTIVIEW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_are_distinct() {
        let a = PNextRecord::SamplerReductionMode { mode: 0 };
        let b = PNextRecord::RenderPassMultiview {
            view_masks: vec![1],
        };
        assert_ne!(a.type_tag(), b.type_tag());
    }
}
