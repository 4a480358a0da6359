// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The deferred lighting pass.
//!
//! A full-screen quad samples the G-buffer, the cascade shadow array, the
//! point-light shadow cube, and the optional IBL environment, and shades
//! up to [`MAX_LIGHTS`] packed lights into the final color buffer — one
//! framebuffer per swapchain image, or a single one over an external
//! render target (editor viewport).

use crate::board::{CascadeShadowOutput, OmniShadowOutput, PassBoard};
use crate::cascade::SHADOW_CASCADES;
use crate::config::{LightingSettings, RenderConfig, ShadowSettings};
use crate::error::RendererError;
use crate::gbuffer::{GBuffer, GBufferTarget};
use crate::mesh::{create_screen_quad, quad_vertex_layout, GpuMesh};
use crate::renderer::{FrameContext, PassResource, Renderer, RenderTarget};
use crate::shaders;
use crate::world::RenderWorld;
use vesper_core::error::RenderError;
use vesper_core::gpu::{
    AttachmentDescription, AttachmentKind, BufferDescriptor, BufferId, BufferUsage,
    CompareFunction, CullMode, DepthState, DescriptorBinding, DescriptorSetId,
    DescriptorSetLayoutDescriptor, DescriptorSetLayoutId, DescriptorType, DescriptorWrite,
    FramebufferAttachment, FramebufferDescriptor, FramebufferId, GraphicsDevice,
    PipelineDescriptor, PipelineId, PolygonMode, PrimitiveTopology, RenderPassBegin,
    RenderPassDescriptor, RenderPassId, SamplerDescriptor, SamplerId, ShaderModuleDescriptor,
    ShaderModuleId, ShaderSource, ShaderStage, ShaderStageFlags, TextureDescriptor,
    TextureDimension, TextureFormat, TextureId, TextureUsage, TextureViewDescriptor,
    TextureViewId,
};
use bytemuck::Zeroable;
use vesper_core::light::{GpuLight, MAX_LIGHTS};
use vesper_core::math::{Extent2D, Extent3D, LinearRgba, Mat4};

const SHADOW_FLAG_CASCADE: u32 = 1;
const SHADOW_FLAG_OMNI: u32 = 2;

/// The fragment uniform of the lighting pass. Mirrors
/// `shaders/lighting.frag`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct LightingUniforms {
    lights: [GpuLight; MAX_LIGHTS],
    shadow_proj_view: [[[f32; 4]; 4]; SHADOW_CASCADES],
    view: [[f32; 4]; 4],
    light_view: [[f32; 4]; 4],
    camera_position: [f32; 4],
    split_depths: [f32; 4],
    /// x = light count, y = color cascades, z = forced cascade + 1,
    /// w = shadow flags.
    counts: [u32; 4],
    /// x = bias, y = light size, z = prefiltered LOD.
    shadow_params: [f32; 4],
}

/// Packs the world's lights into the shader array.
///
/// Lights beyond [`MAX_LIGHTS`] are dropped; the overflow is logged once
/// per offending frame rather than silently discarded.
pub fn pack_lights(world: &RenderWorld) -> ([GpuLight; MAX_LIGHTS], u32) {
    let mut lights = [GpuLight::zeroed(); MAX_LIGHTS];
    if world.lights.len() > MAX_LIGHTS {
        log::warn!(
            "deferred lighting: {} lights submitted but only {MAX_LIGHTS} are supported; dropping {}",
            world.lights.len(),
            world.lights.len() - MAX_LIGHTS
        );
    }
    let mut count = 0;
    for (slot, light) in lights.iter_mut().zip(world.lights.iter()) {
        *slot = GpuLight::pack(&light.light, light.position);
        count += 1;
    }
    (lights, count)
}

/// The texture views currently bound into the sampling descriptor set.
/// Compared per frame so the set is only rewritten when something
/// actually changed (environment appearing, shadow pass registered).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundInputs {
    color: TextureViewId,
    position: TextureViewId,
    normals: TextureViewId,
    depth: TextureViewId,
    pbr: TextureViewId,
    shadow_map: TextureViewId,
    shadow_cube: TextureViewId,
    irradiance: TextureViewId,
    environment: TextureViewId,
    brdf_lut: TextureViewId,
}

struct Fallbacks {
    white_texture: TextureId,
    white_view: TextureViewId,
    depth_array_texture: TextureId,
    depth_array_view: TextureViewId,
    cube_texture: TextureId,
    cube_view: TextureViewId,
}

struct Output {
    render_pass: RenderPassId,
    pipeline: PipelineId,
    framebuffers: Vec<FramebufferId>,
}

struct Gpu {
    output: Output,
    vertex_shader: ShaderModuleId,
    fragment_shader: ShaderModuleId,
    uniform_layout: DescriptorSetLayoutId,
    uniform_set: DescriptorSetId,
    uniform_buffer: BufferId,
    sampling_layout: DescriptorSetLayoutId,
    sampling_set: DescriptorSetId,
    sampler: SamplerId,
    quad: GpuMesh,
    fallbacks: Fallbacks,
}

/// The deferred lighting renderer.
pub struct DeferredLightingRenderer {
    gpu: Option<Gpu>,
    shadow_settings: ShadowSettings,
    settings: LightingSettings,
    bound_inputs: Option<BoundInputs>,
    gbuffer_views: Option<[TextureViewId; 5]>,
    target: Option<RenderTarget>,
    extent: Extent2D,
    packed_light_count: u32,
}

impl DeferredLightingRenderer {
    /// Creates the pass; GPU resources are created in
    /// [`init`](Renderer::init).
    pub fn new() -> Self {
        Self {
            gpu: None,
            shadow_settings: ShadowSettings::default(),
            settings: LightingSettings::default(),
            bound_inputs: None,
            gbuffer_views: None,
            target: None,
            extent: Extent2D::default(),
            packed_light_count: 0,
        }
    }

    /// The number of lights packed for the current frame.
    pub fn packed_light_count(&self) -> u32 {
        self.packed_light_count
    }

    fn gpu(&self) -> Result<&Gpu, RendererError> {
        self.gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))
    }

    fn cache_gbuffer_views(&mut self, gbuffer: &GBuffer) {
        self.gbuffer_views = Some([
            gbuffer.view(GBufferTarget::Color),
            gbuffer.view(GBufferTarget::Position),
            gbuffer.view(GBufferTarget::Normals),
            gbuffer.view(GBufferTarget::Depth),
            gbuffer.view(GBufferTarget::Pbr),
        ]);
        // The old descriptor bindings point at destroyed views.
        self.bound_inputs = None;
    }

    fn output_format(&self, device: &dyn GraphicsDevice) -> TextureFormat {
        self.target
            .map(|t| t.format)
            .unwrap_or_else(|| device.surface_format())
    }

    fn output_extent(&self, device: &dyn GraphicsDevice) -> Extent2D {
        self.target
            .map(|t| t.extent)
            .unwrap_or_else(|| device.surface_extent())
    }

    /// (Re)creates the pass, pipeline, and framebuffers for the current
    /// output — the swapchain, or an external render target.
    fn rebuild_output(&mut self, device: &dyn GraphicsDevice) -> Result<(), RendererError> {
        let format = self.output_format(device);
        let extent = self.output_extent(device);
        let target = self.target;

        let gpu = self
            .gpu
            .as_mut()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;

        for framebuffer in gpu.output.framebuffers.drain(..) {
            device.destroy_framebuffer(framebuffer)?;
        }
        device.destroy_pipeline(gpu.output.pipeline)?;
        device.destroy_render_pass(gpu.output.render_pass)?;

        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("deferred_lighting_pass"),
            attachments: &[AttachmentDescription::color(format)],
        })?;
        let pipeline = device.create_pipeline(&Self::pipeline_descriptor(
            render_pass,
            gpu.vertex_shader,
            gpu.fragment_shader,
            &[gpu.uniform_layout, gpu.sampling_layout],
        ))?;

        let mut framebuffers = Vec::new();
        let views: Vec<TextureViewId> = match target {
            Some(target) => vec![target.view],
            None => (0..device.swapchain_image_count())
                .map(|i| device.swapchain_target(i))
                .collect(),
        };
        for view in views {
            let attachments = [FramebufferAttachment {
                view,
                format,
                kind: AttachmentKind::Color,
            }];
            framebuffers.push(device.create_framebuffer(&FramebufferDescriptor {
                label: Some("deferred_lighting_framebuffer"),
                render_pass,
                attachments: &attachments,
                extent,
                layer: 0,
            })?);
        }

        gpu.output = Output {
            render_pass,
            pipeline,
            framebuffers,
        };
        self.extent = extent;
        Ok(())
    }

    fn pipeline_descriptor(
        render_pass: RenderPassId,
        vertex_shader: ShaderModuleId,
        fragment_shader: ShaderModuleId,
        layouts: &[DescriptorSetLayoutId],
    ) -> PipelineDescriptor<'_> {
        PipelineDescriptor {
            label: Some("deferred_lighting_pipeline"),
            vertex_shader,
            fragment_shader: Some(fragment_shader),
            render_pass,
            vertex_layout: quad_vertex_layout(),
            descriptor_layouts: layouts,
            push_constant_ranges: &[],
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::None,
            polygon_mode: PolygonMode::Fill,
            transparency_enabled: false,
            depth: DepthState {
                test_enabled: false,
                write_enabled: false,
                compare: CompareFunction::Always,
                bias_enabled: false,
            },
        }
    }

    /// Rebinds the sampling descriptor set when any input view changed.
    fn refresh_sampling_set(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &RenderWorld,
        board: &PassBoard,
    ) -> Result<(), RendererError> {
        let views = self
            .gbuffer_views
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;
        let gpu = self
            .gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;

        let shadow_map = board
            .get::<CascadeShadowOutput>()
            .map(|o| o.shadow_map)
            .unwrap_or(gpu.fallbacks.depth_array_view);
        let shadow_cube = board
            .get::<OmniShadowOutput>()
            .map(|o| o.shadow_cube)
            .unwrap_or(gpu.fallbacks.cube_view);
        let (irradiance, environment) = world
            .environment
            .map(|e| (e.irradiance, e.prefiltered))
            .unwrap_or((gpu.fallbacks.cube_view, gpu.fallbacks.cube_view));

        let inputs = BoundInputs {
            color: views[0],
            position: views[1],
            normals: views[2],
            depth: views[3],
            pbr: views[4],
            shadow_map,
            shadow_cube,
            irradiance,
            environment,
            brdf_lut: gpu.fallbacks.white_view,
        };
        if self.bound_inputs == Some(inputs) {
            return Ok(());
        }

        let stage = ShaderStageFlags::FRAGMENT;
        let sampler = gpu.sampler;
        device.update_descriptor_set(
            gpu.sampling_set,
            &[
                DescriptorWrite::texture(0, stage, inputs.color, sampler),
                DescriptorWrite::texture(1, stage, inputs.position, sampler),
                DescriptorWrite::texture(2, stage, inputs.normals, sampler),
                DescriptorWrite::texture(3, stage, inputs.depth, sampler),
                DescriptorWrite::texture(4, stage, inputs.shadow_map, sampler),
                DescriptorWrite::texture(5, stage, inputs.shadow_cube, sampler),
                DescriptorWrite::texture(6, stage, inputs.pbr, sampler),
                DescriptorWrite::texture(7, stage, inputs.irradiance, sampler),
                DescriptorWrite::texture(8, stage, inputs.environment, sampler),
                DescriptorWrite::texture(9, stage, inputs.brdf_lut, sampler),
            ],
        )?;
        self.bound_inputs = Some(inputs);
        Ok(())
    }

    fn pack_uniforms(&self, world: &RenderWorld, board: &PassBoard) -> LightingUniforms {
        let (lights, light_count) = pack_lights(world);

        let mut uniforms = LightingUniforms {
            lights,
            shadow_proj_view: [Mat4::IDENTITY.to_cols_array_2d(); SHADOW_CASCADES],
            view: Mat4::IDENTITY.to_cols_array_2d(),
            light_view: Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: [0.0; 4],
            split_depths: [0.0; 4],
            counts: [
                light_count,
                self.settings.color_cascades as u32,
                self.settings.display_cascade.map_or(0, |c| c + 1),
                0,
            ],
            shadow_params: [self.shadow_settings.bias, self.shadow_settings.light_size, 0.0, 0.0],
        };

        if let Some(camera) = world.camera.as_ref() {
            uniforms.view = camera.view.to_cols_array_2d();
            uniforms.camera_position =
                [camera.position.x, camera.position.y, camera.position.z, 1.0];
        }

        if let Some(shadow) = board.get::<CascadeShadowOutput>() {
            if shadow.has_light {
                uniforms.counts[3] |= SHADOW_FLAG_CASCADE;
            }
            for (i, matrix) in shadow.proj_view.iter().enumerate() {
                uniforms.shadow_proj_view[i] = matrix.to_cols_array_2d();
            }
            uniforms.split_depths = shadow.split_depths;
            uniforms.light_view = shadow.light_view.to_cols_array_2d();
            uniforms.shadow_params[0] = shadow.bias;
            uniforms.shadow_params[1] = shadow.light_size;
        }
        if let Some(omni) = board.get::<OmniShadowOutput>() {
            if omni.has_light {
                uniforms.counts[3] |= SHADOW_FLAG_OMNI;
            }
        }
        if let Some(environment) = world.environment.as_ref() {
            uniforms.shadow_params[2] = environment.prefiltered_mip_levels.saturating_sub(1) as f32;
        }
        uniforms
    }

    fn create_fallbacks(device: &dyn GraphicsDevice) -> Result<Fallbacks, RendererError> {
        let white_texture = device.create_texture(&TextureDescriptor {
            label: Some("lighting_fallback_white"),
            extent: Extent3D::new(1, 1, 1),
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
            mip_level_count: 1,
        })?;
        device.write_texture(
            white_texture,
            &[255, 255, 255, 255],
            None,
            Default::default(),
            Extent3D::new(1, 1, 1),
        )?;
        let white_view =
            device.create_texture_view(white_texture, &TextureViewDescriptor::default())?;

        let depth_array_texture = device.create_texture(&TextureDescriptor {
            label: Some("lighting_fallback_shadow_array"),
            extent: Extent3D::new(1, 1, SHADOW_CASCADES as u32),
            dimension: TextureDimension::D2Array,
            format: TextureFormat::Depth32Float,
            usage: TextureUsage::DEPTH_ATTACHMENT | TextureUsage::SAMPLED,
            mip_level_count: 1,
        })?;
        let depth_array_view = device.create_texture_view(
            depth_array_texture,
            &TextureViewDescriptor {
                label: Some("lighting_fallback_shadow_array"),
                dimension: TextureDimension::D2Array,
                base_array_layer: 0,
                array_layer_count: SHADOW_CASCADES as u32,
            },
        )?;

        let cube_texture = device.create_texture(&TextureDescriptor {
            label: Some("lighting_fallback_cube"),
            extent: Extent3D::new(1, 1, 6),
            dimension: TextureDimension::Cube,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
            mip_level_count: 1,
        })?;
        let cube_view = device.create_texture_view(
            cube_texture,
            &TextureViewDescriptor {
                label: Some("lighting_fallback_cube"),
                dimension: TextureDimension::Cube,
                base_array_layer: 0,
                array_layer_count: 6,
            },
        )?;

        Ok(Fallbacks {
            white_texture,
            white_view,
            depth_array_texture,
            depth_array_view,
            cube_texture,
            cube_view,
        })
    }

    fn sampling_bindings() -> [DescriptorBinding; 10] {
        let mut bindings = [DescriptorBinding {
            binding: 0,
            ty: DescriptorType::CombinedImageSampler,
            stages: ShaderStageFlags::FRAGMENT,
        }; 10];
        for (i, binding) in bindings.iter_mut().enumerate() {
            binding.binding = i as u32;
        }
        bindings
    }
}

impl Default for DeferredLightingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DeferredLightingRenderer {
    fn name(&self) -> &'static str {
        "deferred_lighting"
    }

    fn produces(&self) -> &[PassResource] {
        &[PassResource::FinalColor]
    }

    fn consumes(&self) -> &[PassResource] {
        &[PassResource::GeometryBuffer]
    }

    fn soft_consumes(&self) -> &[PassResource] {
        &[PassResource::CascadeShadowMap, PassResource::OmniShadowMap]
    }

    fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
        config: &RenderConfig,
    ) -> Result<(), RendererError> {
        self.shadow_settings = config.shadow.clone();
        self.settings = config.lighting.clone();

        let vertex_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("lighting_vert"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Glsl(shaders::LIGHTING_VERT.into()),
        })?;
        let fragment_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("lighting_frag"),
            stage: ShaderStage::Fragment,
            source: ShaderSource::Glsl(shaders::LIGHTING_FRAG.into()),
        })?;

        let uniform_layout = device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            label: Some("lighting_uniform_layout"),
            bindings: &[DescriptorBinding {
                binding: 0,
                ty: DescriptorType::UniformBuffer,
                stages: ShaderStageFlags::FRAGMENT,
            }],
        })?;
        let sampling_layout = device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            label: Some("lighting_sampling_layout"),
            bindings: &Self::sampling_bindings(),
        })?;

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("lighting_uniforms"),
            size: std::mem::size_of::<LightingUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;
        let uniform_set = device.create_descriptor_set(uniform_layout)?;
        device.update_descriptor_set(
            uniform_set,
            &[DescriptorWrite::uniform(
                0,
                ShaderStageFlags::FRAGMENT,
                uniform_buffer,
                std::mem::size_of::<LightingUniforms>() as u64,
            )],
        )?;

        let sampling_set = device.create_descriptor_set(sampling_layout)?;
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("lighting_sampler"),
            ..Default::default()
        })?;

        let quad = create_screen_quad(device)?;
        let fallbacks = Self::create_fallbacks(device)?;

        // A placeholder output; rebuild_output replaces it immediately.
        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("deferred_lighting_pass"),
            attachments: &[AttachmentDescription::color(device.surface_format())],
        })?;
        let pipeline = device.create_pipeline(&Self::pipeline_descriptor(
            render_pass,
            vertex_shader,
            fragment_shader,
            &[uniform_layout, sampling_layout],
        ))?;

        self.gpu = Some(Gpu {
            output: Output {
                render_pass,
                pipeline,
                framebuffers: Vec::new(),
            },
            vertex_shader,
            fragment_shader,
            uniform_layout,
            uniform_set,
            uniform_buffer,
            sampling_layout,
            sampling_set,
            sampler,
            quad,
            fallbacks,
        });
        self.cache_gbuffer_views(gbuffer);
        self.rebuild_output(device)
    }

    fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &crate::world::RenderWorld,
        board: &mut PassBoard,
    ) -> Result<(), RendererError> {
        let uniforms = self.pack_uniforms(world, board);
        self.packed_light_count = uniforms.counts[0];
        {
            let gpu = self.gpu()?;
            device.write_buffer(gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms))?;
        }
        self.refresh_sampling_set(device, world, board)
    }

    fn render_scene(&mut self, frame: &mut FrameContext<'_>) -> Result<(), RendererError> {
        let extent = self.extent;
        let use_target = self.target.is_some();
        let gpu = self.gpu()?;

        let framebuffer_index = if use_target {
            0
        } else {
            frame.swap_image as usize
        };
        let framebuffer = *gpu
            .output
            .framebuffers
            .get(framebuffer_index)
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;

        let mut pass = frame.encoder.begin_render_pass(&RenderPassBegin {
            label: Some("deferred_lighting"),
            render_pass: gpu.output.render_pass,
            framebuffer,
            extent,
            clear_color: LinearRgba::new(0.3, 0.3, 0.3, 1.0),
            clear_depth: 1.0,
        });
        pass.set_pipeline(gpu.output.pipeline);
        pass.bind_descriptor_sets(0, &[gpu.uniform_set, gpu.sampling_set]);
        pass.set_vertex_buffer(0, gpu.quad.vertex_buffer, 0);
        pass.set_index_buffer(gpu.quad.index_buffer, 0, gpu.quad.index_format);
        pass.draw_indexed(0..gpu.quad.index_count, 0, 0..1);
        Ok(())
    }

    fn on_resize(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
        _extent: Extent2D,
    ) -> Result<(), RendererError> {
        self.cache_gbuffer_views(gbuffer);
        self.rebuild_output(device)
    }

    fn set_render_target(
        &mut self,
        device: &dyn GraphicsDevice,
        target: Option<RenderTarget>,
        rebuild: bool,
    ) -> Result<(), RendererError> {
        self.target = target;
        if rebuild {
            self.rebuild_output(device)?;
        }
        Ok(())
    }

    fn destroy(&mut self, device: &dyn GraphicsDevice) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        for framebuffer in gpu.output.framebuffers {
            let _ = device.destroy_framebuffer(framebuffer);
        }
        let _ = device.destroy_pipeline(gpu.output.pipeline);
        let _ = device.destroy_render_pass(gpu.output.render_pass);
        let _ = device.destroy_shader_module(gpu.vertex_shader);
        let _ = device.destroy_shader_module(gpu.fragment_shader);
        let _ = device.destroy_descriptor_set(gpu.uniform_set);
        let _ = device.destroy_descriptor_set(gpu.sampling_set);
        let _ = device.destroy_descriptor_set_layout(gpu.uniform_layout);
        let _ = device.destroy_descriptor_set_layout(gpu.sampling_layout);
        let _ = device.destroy_buffer(gpu.uniform_buffer);
        let _ = device.destroy_sampler(gpu.sampler);
        let _ = device.destroy_buffer(gpu.quad.vertex_buffer);
        let _ = device.destroy_buffer(gpu.quad.index_buffer);
        let _ = device.destroy_texture_view(gpu.fallbacks.white_view);
        let _ = device.destroy_texture(gpu.fallbacks.white_texture);
        let _ = device.destroy_texture_view(gpu.fallbacks.depth_array_view);
        let _ = device.destroy_texture(gpu.fallbacks.depth_array_texture);
        let _ = device.destroy_texture_view(gpu.fallbacks.cube_view);
        let _ = device.destroy_texture(gpu.fallbacks.cube_texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ExtractedLight;
    use vesper_core::light::{LightType, PointLight};
    use vesper_core::math::Vec3;

    fn world_with_lights(count: usize) -> RenderWorld {
        let mut world = RenderWorld::new();
        for i in 0..count {
            world.lights.push(ExtractedLight {
                light: LightType::Point(PointLight::default()),
                position: Vec3::new(i as f32, 0.0, 0.0),
            });
        }
        world
    }

    #[test]
    fn packing_keeps_all_lights_under_the_limit() {
        let world = world_with_lights(5);
        let (lights, count) = pack_lights(&world);
        assert_eq!(count, 5);
        assert_eq!(lights[4].position[0], 4.0);
        // Unused slots stay zeroed.
        assert_eq!(lights[5].intensity, 0.0);
    }

    #[test]
    fn packing_truncates_at_max_lights() {
        let world = world_with_lights(MAX_LIGHTS + 5);
        let (lights, count) = pack_lights(&world);
        assert_eq!(count, MAX_LIGHTS as u32);
        // The last packed slot is light MAX_LIGHTS - 1, not one of the
        // overflow lights.
        assert_eq!(lights[MAX_LIGHTS - 1].position[0], (MAX_LIGHTS - 1) as f32);
    }

    #[test]
    fn packing_exactly_at_the_limit_is_not_an_overflow() {
        let world = world_with_lights(MAX_LIGHTS);
        let (_, count) = pack_lights(&world);
        assert_eq!(count, MAX_LIGHTS as u32);
    }

    #[test]
    fn lighting_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightingUniforms>() % 16, 0);
    }
}
