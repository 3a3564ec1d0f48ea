// SPDX-License-Identifier: Apache-2.0
//! A full round trip through every layer: a capture-layer graph goes in one end of a
//! [`fossilize::recorder::Recorder`], comes out the other end of a
//! [`fossilize::replay::Replayer`] with every field intact.
//!
//! Builds a sampler, a descriptor-set-layout binding two immutable samplers, a pipeline layout,
//! a shader module, a render pass with two attachments and one subpass, and a graphics pipeline
//! tying all of it together. Persists the result to an on-disk archive and replays it back
//! against a creator that asserts every field equals what was recorded.

use std::sync::Mutex;

use fossilize::codec::{decode_blob, encode_blob};
use fossilize::db::{AccessMode, Archive};
use fossilize::model::{
 ApplicationBlobLinkInfo, ApplicationInfoInfo, AttachmentDescription, ColorBlendState,
 ComputePipelineInfo, DescriptorSetLayoutInfo, GraphicsPipelineInfo, Hash, MultisampleState,
 NormalizedObject, PipelineLayoutInfo, RasterizationState, RaytracingPipelineInfo,
 RenderPassInfo, ResourceTag, SamplerInfo, ShaderModuleInfo, SubpassDescription,
 VertexInputState, ViewportState,
};
use fossilize::recorder::{
 DescriptorSetLayoutBindingInput, DescriptorSetLayoutInput, GraphicsPipelineInput, Handle,
 PipelineLayoutInput, Recorder, ShaderStageInput,
};
use fossilize::replay::{CreateOutcome, CreatorError, Replayer, StateCreatorInterface};

const VK_FILTER_NEAREST: u32 = 0;
const VK_FILTER_LINEAR: u32 = 1;
const VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER: u32 = 1;
const VK_SHADER_STAGE_VERTEX_BIT: u32 = 0x0000_0001;
const VK_SHADER_STAGE_FRAGMENT_BIT: u32 = 0x0000_0010;

fn temp_archive_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!("fossilize-scenario-s1-{name}-{}.foz", std::process::id()));
 path
}

/// The interesting sampler named in the scenario: `minFilter=LINEAR, magFilter=NEAREST,
/// mipLodBias=90.0`. The binding's second immutable sampler is a plain default, distinct enough
/// in content to hash differently and so appear as its own archive entry.
fn scenario_sampler() -> SamplerInfo {
 SamplerInfo {
 min_filter: VK_FILTER_LINEAR,
 mag_filter: VK_FILTER_NEAREST,
 mip_lod_bias: 90.0,
.SamplerInfo::new()
 }
}

fn two_attachment_render_pass() -> RenderPassInfo {
 let color = AttachmentDescription {
 format: 37, // VK_FORMAT_R8G8B8A8_UNORM
 samples: 1,
 load_op: 1, // VK_ATTACHMENT_LOAD_OP_CLEAR
 store_op: 0, // VK_ATTACHMENT_STORE_OP_STORE
 stencil_load_op: 2,
 stencil_store_op: 1,
 initial_layout: 0,
 final_layout: 2,
 };
 let depth = AttachmentDescription {
 format: 126, // VK_FORMAT_D32_SFLOAT
 samples: 1,
 load_op: 1,
 store_op: 1,
 stencil_load_op: 2,
 stencil_store_op: 1,
 initial_layout: 0,
 final_layout: 3,
 };
 RenderPassInfo {
 flags: 0,
 attachments: vec![color, depth],
 subpasses: vec![SubpassDescription {
 pipeline_bind_point: 0,
 input_attachments: Vec::new(),
 color_attachments: vec![0],
 resolve_attachments: Vec::new(),
 depth_stencil_attachment: Some(1),
 preserve_attachments: Vec::new(),
 }],
 pnext: Vec::new(),
 }
}

struct Recorded {
 recorder: Recorder,
 sampler_a: Hash,
 sampler_b: Hash,
 descriptor_set_layout: Hash,
 pipeline_layout: Hash,
 shader_module: Hash,
 render_pass: Hash,
 graphics_pipeline: Hash,
}

fn record_scenario() -> Recorded {
 let mut recorder = Recorder::new();

 let sampler_a = recorder
.record_sampler(Handle::new(1), scenario_sampler(), None)
.unwrap();
 let sampler_b = recorder
.record_sampler(Handle::new(2), SamplerInfo::new(), None)
.unwrap();
 assert_ne!(sampler_a, sampler_b, "the two immutable samplers must be distinct objects");

 let descriptor_set_layout = recorder
.record_descriptor_set_layout(
 Handle::new(3),
 DescriptorSetLayoutInput {
 flags: 0,
 bindings: vec![DescriptorSetLayoutBindingInput {
 binding: 8,
 descriptor_type: VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER,
 descriptor_count: 2,
 stage_flags: VK_SHADER_STAGE_FRAGMENT_BIT,
 immutable_samplers: vec![Handle::new(1), Handle::new(2)],
 }],
 pnext: Vec::new(),
 },
 None,
 )
.unwrap();

 let pipeline_layout = recorder
.record_pipeline_layout(
 Handle::new(4),
 PipelineLayoutInput {
 flags: 0,
 set_layouts: vec![Handle::new(3)],
 push_constant_ranges: Vec::new(),
 },
 None,
 )
.unwrap();

 let shader_module = recorder
.record_shader_module(
 Handle::new(5),
 ShaderModuleInfo::from_code(vec![0xdead_beef, 0xcafe_babe]),
 None,
 )
.unwrap();

 let render_pass = recorder
.record_render_pass(Handle::new(6), two_attachment_render_pass(), None)
.unwrap();

 let graphics_pipeline = recorder
.record_graphics_pipeline(
 Handle::new(7),
 GraphicsPipelineInput {
 flags: 0,
 stages: vec![ShaderStageInput {
 stage: VK_SHADER_STAGE_VERTEX_BIT,
 module: Handle::new(5),
 entry_point: "main".to_owned(),
 }],
 vertex_input: VertexInputState::default(),
 topology: 3, // VK_PRIMITIVE_TOPOLOGY_TRIANGLE_LIST
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
 blend_constants: [0.0; 4],
 },
 dynamic_state: Vec::new(),
 layout: Handle::new(4),
 render_pass: Handle::new(6),
 subpass: 0,
 base_pipeline: None,
 pnext: Vec::new(),
 },
 None,
 )
.unwrap();

 Recorded {
 recorder,
 sampler_a,
 sampler_b,
 descriptor_set_layout,
 pipeline_layout,
 shader_module,
 render_pass,
 graphics_pipeline,
 }
}

/// Asserts every field the scenario cares about equals what was recorded, as each object arrives
/// through the replayer's fixed playback order.
struct FieldAssertingCreator {
 expect: Recorded,
 created: Mutex<Vec<(ResourceTag, Hash)>>,
}

impl StateCreatorInterface for FieldAssertingCreator {
 fn enqueue_create_application_info(
 &self,
 _hash: Hash,
 _info: &ApplicationInfoInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 panic!("scenario records no application info");
 }

 fn enqueue_create_application_blob_link(
 &self,
 _hash: Hash,
 _info: &ApplicationBlobLinkInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 panic!("scenario records no application blob link");
 }

 fn enqueue_create_shader_module(
 &self,
 hash: Hash,
 info: &ShaderModuleInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 assert_eq!(hash, self.expect.shader_module);
 assert_eq!(*info, ShaderModuleInfo::from_code(vec![0xdead_beef, 0xcafe_babe]));
 self.record(ResourceTag::ShaderModule, hash)
 }

 fn enqueue_create_sampler(&self, hash: Hash, info: &SamplerInfo) -> Result<CreateOutcome, CreatorError> {
 if hash == self.expect.sampler_a {
 assert_eq!(*info, scenario_sampler());
 } else if hash == self.expect.sampler_b {
 assert_eq!(*info, SamplerInfo::new());
 } else {
 panic!("unexpected sampler hash {hash:016x}");
 }
 self.record(ResourceTag::Sampler, hash)
 }

 fn enqueue_create_descriptor_set_layout(
 &self,
 hash: Hash,
 info: &DescriptorSetLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 assert_eq!(hash, self.expect.descriptor_set_layout);
 assert_eq!(info.bindings.len(), 1);
 let binding = &info.bindings[0];
 assert_eq!(binding.binding, 8);
 assert_eq!(binding.descriptor_type, VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER);
 assert_eq!(binding.descriptor_count, 2);
 assert_eq!(binding.stage_flags, VK_SHADER_STAGE_FRAGMENT_BIT);
 assert_eq!(binding.immutable_samplers, vec![self.expect.sampler_a, self.expect.sampler_b]);
 self.record(ResourceTag::DescriptorSetLayout, hash)
 }

 fn enqueue_create_pipeline_layout(
 &self,
 hash: Hash,
 info: &PipelineLayoutInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 assert_eq!(hash, self.expect.pipeline_layout);
 assert_eq!(info.set_layouts, vec![self.expect.descriptor_set_layout]);
 assert!(info.push_constant_ranges.is_empty());
 self.record(ResourceTag::PipelineLayout, hash)
 }

 fn enqueue_create_render_pass(&self, hash: Hash, info: &RenderPassInfo) -> Result<CreateOutcome, CreatorError> {
 assert_eq!(hash, self.expect.render_pass);
 assert_eq!(*info, two_attachment_render_pass());
 self.record(ResourceTag::RenderPass, hash)
 }

 fn enqueue_create_graphics_pipeline(
 &self,
 hash: Hash,
 info: &GraphicsPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 assert_eq!(hash, self.expect.graphics_pipeline);
 assert_eq!(info.stages.len(), 1);
 assert_eq!(info.stages[0].stage, VK_SHADER_STAGE_VERTEX_BIT);
 assert_eq!(info.stages[0].module, self.expect.shader_module);
 assert_eq!(info.stages[0].entry_point, "main");
 assert_eq!(info.layout, self.expect.pipeline_layout);
 assert_eq!(info.render_pass, self.expect.render_pass);
 assert_eq!(info.subpass, 0);
 assert_eq!(info.base_pipeline, None);
 self.record(ResourceTag::GraphicsPipeline, hash)
 }

 fn enqueue_create_compute_pipeline(
 &self,
 _hash: Hash,
 _info: &ComputePipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 panic!("scenario records no compute pipeline");
 }

 fn enqueue_create_raytracing_pipeline(
 &self,
 _hash: Hash,
 _info: &RaytracingPipelineInfo,
 ) -> Result<CreateOutcome, CreatorError> {
 panic!("scenario records no ray tracing pipeline");
 }

 fn sync_threads(&self) -> Result<(), CreatorError> {
 Ok(())
 }
}

impl FieldAssertingCreator {
 fn record(&self, tag: ResourceTag, hash: Hash) -> Result<CreateOutcome, CreatorError> {
 self.created.lock().unwrap().push((tag, hash));
 Ok(CreateOutcome::Created)
 }
}

#[test]
fn round_trip_through_recorder_codec_archive_and_replayer() {
 let recorded = record_scenario();

 let path = temp_archive_path("round-trip");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 for interned in recorded.recorder.iter() {
 let bytes = encode_blob(&interned.object);
 archive
.write_entry(interned.object.tag(), interned.hash, &bytes, false)
.unwrap();
 }

 assert_eq!(archive.len(), 7, "sampler_a, sampler_b, descriptor_set_layout, pipeline_layout, shader_module, render_pass, graphics_pipeline");

 for tag in ResourceTag::ALL {
 for &hash in archive.get_hash_list_for_resource_tag(tag) {
 let payload = archive.read_entry(tag, hash).unwrap().unwrap();
 let decoded = decode_blob(&payload).unwrap();
 assert_eq!(decoded.tag(), tag);
 match (&decoded, tag) {
 (NormalizedObject::Sampler(_), ResourceTag::Sampler)
 | (NormalizedObject::DescriptorSetLayout(_), ResourceTag::DescriptorSetLayout)
 | (NormalizedObject::PipelineLayout(_), ResourceTag::PipelineLayout)
 | (NormalizedObject::ShaderModule(_), ResourceTag::ShaderModule)
 | (NormalizedObject::RenderPass(_), ResourceTag::RenderPass)
 | (NormalizedObject::GraphicsPipeline(_), ResourceTag::GraphicsPipeline) => {}
 _ => panic!("decoded variant doesn't match its archive tag"),
 }
 }
 }

 let expect_sampler_a = recorded.sampler_a;
 let expect_sampler_b = recorded.sampler_b;
 let expect_descriptor_set_layout = recorded.descriptor_set_layout;
 let expect_pipeline_layout = recorded.pipeline_layout;
 let expect_shader_module = recorded.shader_module;
 let expect_render_pass = recorded.render_pass;
 let expect_graphics_pipeline = recorded.graphics_pipeline;

 let creator = FieldAssertingCreator {
 expect: recorded,
 created: Mutex::new(Vec::new()),
 };
 let replayer = Replayer::new(&archive);
 let stats = replayer.replay(&creator).unwrap();

 assert_eq!(stats.created, 7);
 assert_eq!(stats.skipped, 0);

 let created = creator.created.into_inner().unwrap();
 for (tag, hash) in [
 (ResourceTag::Sampler, expect_sampler_a),
 (ResourceTag::Sampler, expect_sampler_b),
 (ResourceTag::DescriptorSetLayout, expect_descriptor_set_layout),
 (ResourceTag::PipelineLayout, expect_pipeline_layout),
 (ResourceTag::ShaderModule, expect_shader_module),
 (ResourceTag::RenderPass, expect_render_pass),
 (ResourceTag::GraphicsPipeline, expect_graphics_pipeline),
 ] {
 assert!(created.contains(&(tag, hash)), "{tag} {hash:016x} was not replayed");
 }

 std::fs::remove_file(&path).ok();
}
