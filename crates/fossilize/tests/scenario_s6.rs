// SPDX-License-Identifier: Apache-2.0
//! Two graphics pipelines identical except for `blendConstants`, where no attachment uses a
//! constant blend factor, must hash identically end to end: recording both through a
//! [`fossilize::recorder::Recorder`] and persisting to an archive leaves exactly one entry
//! , not two.

use fossilize::codec::encode_blob;
use fossilize::db::{AccessMode, Archive};
use fossilize::model::{
 ColorBlendState, MultisampleState, RasterizationState, RenderPassInfo, ResourceTag,
 ShaderModuleInfo, VertexInputState, ViewportState,
};
use fossilize::recorder::{
 GraphicsPipelineInput, Handle, PipelineLayoutInput, Recorder, ShaderStageInput,
};

fn temp_archive_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!("fossilize-scenario-s6-{name}-{}.foz", std::process::id()));
 path
}

fn pipeline_input(blend_constants: [f32; 4]) -> GraphicsPipelineInput {
 GraphicsPipelineInput {
 flags: 0,
 stages: vec![ShaderStageInput {
 stage: 1,
 module: Handle::new(1),
 entry_point: "main".to_owned(),
 }],
 vertex_input: VertexInputState::default(),
 topology: 3,
 primitive_restart_enable: false,
 viewport_state: ViewportState::default(),
 rasterization: RasterizationState {
 depth_clamp_enable: false,
 rasterizer_discard_enable: false,
 polygon_mode: 0,
 cull_mode: 0,
 front_face: 0,
 depth_bias_enable: false,
 depth_bias_constant_factor: 0.0,
 depth_bias_clamp: 0.0,
 depth_bias_slope_factor: 0.0,
 line_width: 1.0,
 },
 multisample: MultisampleState {
 rasterization_samples: 1,
 sample_shading_enable: false,
 min_sample_shading: 0.0,
 sample_mask: Vec::new(),
 alpha_to_coverage_enable: false,
 alpha_to_one_enable: false,
 },
 depth_stencil: None,
 color_blend: ColorBlendState {
 logic_op_enable: false,
 logic_op: 0,
 attachments: Vec::new(),
 blend_constants,
 },
 dynamic_state: Vec::new(),
 layout: Handle::new(2),
 render_pass: Handle::new(3),
 subpass: 0,
 base_pipeline: None,
 pnext: Vec::new(),
 }
}

#[test]
fn irrelevant_blend_constants_collapse_to_one_archive_entry() {
 let mut recorder = Recorder::new();
 recorder
.record_shader_module(Handle::new(1), ShaderModuleInfo::from_code(vec![1]), None)
.unwrap();
 recorder
.record_pipeline_layout(Handle::new(2), PipelineLayoutInput::default(), None)
.unwrap();
 recorder
.record_render_pass(Handle::new(3), RenderPassInfo::new(), None)
.unwrap();

 let zeroed = recorder
.record_graphics_pipeline(Handle::new(4), pipeline_input([0.0, 0.0, 0.0, 0.0]), None)
.unwrap();
 let other = recorder
.record_graphics_pipeline(Handle::new(5), pipeline_input([9.0, 19.0, 29.0, 39.0]), None)
.unwrap();

 assert_eq!(zeroed, other, "blend constants are irrelevant when no attachment references them");
 assert_eq!(recorder.len(), 4, "module, layout, render pass, and one deduplicated pipeline");

 let path = temp_archive_path("blend-constants");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 for interned in recorder.iter() {
 let bytes = encode_blob(&interned.object);
 archive
.write_entry(interned.object.tag(), interned.hash, &bytes, false)
.unwrap();
 }

 assert_eq!(archive.len(), 4, "the deduplicated pipeline must produce exactly one archive entry");
 let pipeline_hashes = archive.get_hash_list_for_resource_tag(ResourceTag::GraphicsPipeline);
 assert_eq!(pipeline_hashes, &[zeroed]);

 std::fs::remove_file(&path).ok();
}
