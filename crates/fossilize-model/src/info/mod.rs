// SPDX-License-Identifier: Apache-2.0
//! Per-resource-kind normalized create-info structs, one module per [`crate::ResourceTag`].

pub mod application;
pub mod compute;
pub mod descriptor_set_layout;
pub mod graphics;
pub mod pipeline_layout;
pub mod raytracing;
pub mod sampler;
pub mod shader_module;
