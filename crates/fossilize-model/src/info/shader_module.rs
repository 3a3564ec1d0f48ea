// SPDX-License-Identifier: Apache-2.0
//! `VkShaderModuleCreateInfo`, normalized.
//!
//! Shader modules are recorded two ways (spec.md §4.2): as raw SPIR-V code, or — when the driver
//! identifies shaders by an opaque identifier (`VK_EXT_shader_module_identifier`) rather than by
//! their bytes — as that identifier plus the algorithm UUID it was produced under. The fingerprint
//! engine hashes only the identifier bytes in the latter case; it never sees SPIR-V at all.

/// A normalized shader module create-info.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderModuleInfo {
    /// SPIR-V code, as a stream of 32-bit words (little-endian within each word, the stream
    /// itself is word-order). This is the common case.
    Code(Vec<u32>),
    /// A driver-supplied opaque module identifier, keyed by the algorithm that produced it.
    Identifier {
        /// The identifier algorithm's UUID (`VkShaderModuleIdentifierAlgorithmEXT`-style key).
        algorithm_uuid: [u8; 16],
        /// The opaque identifier bytes themselves.
        identifier: Vec<u8>,
    },
}

impl ShaderModuleInfo {
    /// Constructs a code-backed module from SPIR-V words.
    #[must_use]
    pub fn from_code(words: Vec<u32>) -> Self {
        ShaderModuleInfo::Code(words)
    }

    /// `true` if this module is identified by driver-opaque identifier bytes rather than SPIR-V.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, ShaderModuleInfo::Identifier { .. })
    }
}
