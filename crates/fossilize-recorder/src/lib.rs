// SPDX-License-Identifier: Apache-2.0
//! Normalized object store (C2): interns create-infos into an arena, assigns each a fingerprint
//! via `fossilize-hash`, and tracks the live handle → hash mapping children need to resolve their
//! own dependencies.
//!
//! A [`Recorder`] is the single point where a pointer-rich, handle-identified create-info graph
//! becomes the hash-addressed, pointer-free [`fossilize_model::NormalizedObject`] graph everything
//! downstream of it (`fossilize-codec`, `fossilize-db`) operates on.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod arena;
mod error;
mod handle;
mod input;
mod recorder;

pub use arena::{Arena, ArenaIndex};
pub use error::RecorderError;
pub use handle::Handle;
pub use input::{
 BasePipelineInput, ComputePipelineInput, DescriptorSetLayoutBindingInput,
 DescriptorSetLayoutInput, GraphicsPipelineInput, PipelineLayoutInput,
 RaytracingPipelineInput, ShaderStageInput,
};
pub use recorder::Recorder;
