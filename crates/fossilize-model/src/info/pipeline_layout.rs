// SPDX-License-Identifier: Apache-2.0
//! `VkPipelineLayoutCreateInfo`, normalized.

use crate::Hash;

/// `VkPushConstantRange`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushConstantRange {
    /// `stageFlags`.
    pub stage_flags: u32,
    /// `offset`.
    pub offset: u32,
    /// `size`.
    pub size: u32,
}

/// A normalized pipeline layout create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineLayoutInfo {
    /// `flags`.
    pub flags: u32,
    /// Hashes of the referenced descriptor set layouts, in set-index order.
    pub set_layouts: Vec<Hash>,
    /// Push constant ranges, in declaration order.
    pub push_constant_ranges: Vec<PushConstantRange>,
}

impl PipelineLayoutInfo {
    /// An empty pipeline layout (no sets, no push constants).
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: 0,
            set_layouts: Vec::new(),
            push_constant_ranges: Vec::new(),
        }
    }
}

impl Default for PipelineLayoutInfo {
    fn default() -> Self {
        Self::new()
    }
}
