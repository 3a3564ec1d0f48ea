// SPDX-License-Identifier: Apache-2.0
//! `VkDescriptorSetLayoutCreateInfo`, normalized.

use crate::{Hash, PNextRecord};

/// One binding slot in a descriptor set layout.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorSetLayoutBinding {
    /// `binding`.
    pub binding: u32,
    /// `descriptorType`.
    pub descriptor_type: u32,
    /// `descriptorCount`.
    pub descriptor_count: u32,
    /// `stageFlags`.
    pub stage_flags: u32,
    /// Hashes of the sampler objects referenced by an immutable-sampler array, in declaration
    /// order. Empty unless `descriptor_type` is a combined-image-sampler kind *and* the binding
    /// declares immutable samplers — spec.md §4.2's "Immutable-sampler arrays embedded in a
    /// descriptor-set-layout binding are expanded into hashes of sampler objects".
    pub immutable_samplers: Vec<Hash>,
}

/// A normalized descriptor set layout create-info.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorSetLayoutInfo {
    /// `flags`.
    pub flags: u32,
    /// Binding declarations, in declaration order.
    pub bindings: Vec<DescriptorSetLayoutBinding>,
    /// Extension chain.
    pub pnext: Vec<PNextRecord>,
}

impl DescriptorSetLayoutInfo {
    /// An empty layout with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: 0,
            bindings: Vec::new(),
            pnext: Vec::new(),
        }
    }
}

impl Default for DescriptorSetLayoutInfo {
    fn default() -> Self {
        Self::new()
    }
}
