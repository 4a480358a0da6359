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

//! The deferred off-screen pass: rasterize opaque geometry into the
//! G-buffer.

use crate::board::PassBoard;
use crate::config::RenderConfig;
use crate::error::RendererError;
use crate::gbuffer::{GBuffer, GBufferTarget, GBUFFER_COLOR_TARGETS};
use crate::mesh::{mesh_vertex_layout, RenderCommand};
use crate::renderer::{FrameContext, PassResource, Renderer};
use crate::shaders;
use vesper_core::error::RenderError;
use vesper_core::gpu::{
    AttachmentDescription, AttachmentKind, BufferDescriptor, BufferId, BufferUsage, CullMode,
    DepthState, DescriptorBinding, DescriptorSetId, DescriptorSetLayoutDescriptor,
    DescriptorSetLayoutId, DescriptorType, DescriptorWrite, FramebufferAttachment,
    FramebufferDescriptor, FramebufferId, GraphicsDevice, PipelineDescriptor, PipelineId,
    PolygonMode, PrimitiveTopology, PushConstantRange, RenderPassBegin, RenderPassDescriptor,
    RenderPassId, SamplerDescriptor, SamplerId, ShaderModuleDescriptor, ShaderModuleId,
    ShaderSource, ShaderStage, ShaderStageFlags, TextureDescriptor, TextureDimension,
    TextureFormat, TextureId, TextureUsage, TextureViewDescriptor, TextureViewId,
};
use vesper_core::math::{Extent2D, Extent3D, LinearRgba, Origin3D};

/// Per-frame camera uniform for the G-buffer vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    proj_view: [[f32; 4]; 4],
}

/// The default material's shader-side properties.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniforms {
    albedo: [f32; 4],
    /// x = metallic, y = roughness, z = usingAlbedoMap.
    params: [f32; 4],
}

/// Per-draw push constants: the world transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelPushConstants {
    model: [[f32; 4]; 4],
}

struct Gpu {
    render_pass: RenderPassId,
    framebuffer: Option<FramebufferId>,
    pipeline: PipelineId,
    vertex_shader: ShaderModuleId,
    fragment_shader: ShaderModuleId,
    camera_buffer: BufferId,
    camera_layout: DescriptorSetLayoutId,
    camera_set: DescriptorSetId,
    material_layout: DescriptorSetLayoutId,
    default_material_set: DescriptorSetId,
    default_material_buffer: BufferId,
    default_texture: TextureId,
    default_texture_view: TextureViewId,
    default_sampler: SamplerId,
}

/// The deferred off-screen (G-buffer fill) renderer.
pub struct DeferredOffScreenRenderer {
    gpu: Option<Gpu>,
    command_queue: Vec<RenderCommand>,
    extent: Extent2D,
}

impl DeferredOffScreenRenderer {
    /// Creates the pass; GPU resources are created in
    /// [`init`](Renderer::init).
    pub fn new() -> Self {
        Self {
            gpu: None,
            command_queue: Vec::new(),
            extent: Extent2D::default(),
        }
    }

    /// The descriptor set layout materials must be created against
    /// (binding 0: material uniforms, binding 1: albedo map).
    pub fn material_layout(&self) -> Option<DescriptorSetLayoutId> {
        self.gpu.as_ref().map(|gpu| gpu.material_layout)
    }

    fn gpu(&self) -> Result<&Gpu, RendererError> {
        self.gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))
    }

    fn rebuild_framebuffer(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
    ) -> Result<(), RendererError> {
        let gpu = self
            .gpu
            .as_mut()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;
        if let Some(old) = gpu.framebuffer.take() {
            device.destroy_framebuffer(old)?;
        }
        let mut attachments = Vec::with_capacity(GBUFFER_COLOR_TARGETS.len() + 1);
        for target in GBUFFER_COLOR_TARGETS {
            attachments.push(FramebufferAttachment {
                view: gbuffer.view(target),
                format: gbuffer.format(target),
                kind: AttachmentKind::Color,
            });
        }
        attachments.push(FramebufferAttachment {
            view: gbuffer.view(GBufferTarget::Depth),
            format: gbuffer.format(GBufferTarget::Depth),
            kind: AttachmentKind::Depth,
        });
        gpu.framebuffer = Some(device.create_framebuffer(&FramebufferDescriptor {
            label: Some("deferred_offscreen_framebuffer"),
            render_pass: gpu.render_pass,
            attachments: &attachments,
            extent: gbuffer.extent(),
            layer: 0,
        })?);
        self.extent = gbuffer.extent();
        Ok(())
    }

    fn create_default_material(
        device: &dyn GraphicsDevice,
        material_layout: DescriptorSetLayoutId,
    ) -> Result<(DescriptorSetId, BufferId, TextureId, TextureViewId, SamplerId), RendererError>
    {
        let properties = MaterialUniforms {
            albedo: [1.0, 1.0, 1.0, 1.0],
            params: [0.0, 0.5, 1.0, 0.0],
        };
        let buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some("default_material_uniforms"),
                size: std::mem::size_of::<MaterialUniforms>() as u64,
                usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            },
            bytemuck::bytes_of(&properties),
        )?;

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("default_albedo"),
            extent: Extent3D::new(1, 1, 1),
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
            mip_level_count: 1,
        })?;
        device.write_texture(
            texture,
            &[255, 255, 255, 255],
            None,
            Origin3D::default(),
            Extent3D::new(1, 1, 1),
        )?;
        let view = device.create_texture_view(texture, &TextureViewDescriptor::default())?;
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("default_albedo_sampler"),
            ..Default::default()
        })?;

        let set = device.create_descriptor_set(material_layout)?;
        device.update_descriptor_set(
            set,
            &[
                DescriptorWrite::uniform(
                    0,
                    ShaderStageFlags::FRAGMENT,
                    buffer,
                    std::mem::size_of::<MaterialUniforms>() as u64,
                ),
                DescriptorWrite::texture(1, ShaderStageFlags::FRAGMENT, view, sampler),
            ],
        )?;
        Ok((set, buffer, texture, view, sampler))
    }
}

impl Default for DeferredOffScreenRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DeferredOffScreenRenderer {
    fn name(&self) -> &'static str {
        "deferred_offscreen"
    }

    fn produces(&self) -> &[PassResource] {
        &[PassResource::GeometryBuffer]
    }

    fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
        _config: &RenderConfig,
    ) -> Result<(), RendererError> {
        let mut attachments = Vec::with_capacity(GBUFFER_COLOR_TARGETS.len() + 1);
        for target in GBUFFER_COLOR_TARGETS {
            attachments.push(AttachmentDescription::color(gbuffer.format(target)));
        }
        attachments.push(AttachmentDescription::depth(
            gbuffer.format(GBufferTarget::Depth),
        ));
        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("deferred_offscreen_pass"),
            attachments: &attachments,
        })?;

        let vertex_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("gbuffer_vert"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Glsl(shaders::GBUFFER_VERT.into()),
        })?;
        let fragment_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("gbuffer_frag"),
            stage: ShaderStage::Fragment,
            source: ShaderSource::Glsl(shaders::GBUFFER_FRAG.into()),
        })?;

        let camera_layout = device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            label: Some("deferred_camera_layout"),
            bindings: &[DescriptorBinding {
                binding: 0,
                ty: DescriptorType::UniformBuffer,
                stages: ShaderStageFlags::VERTEX,
            }],
        })?;
        let material_layout = device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            label: Some("deferred_material_layout"),
            bindings: &[
                DescriptorBinding {
                    binding: 0,
                    ty: DescriptorType::UniformBuffer,
                    stages: ShaderStageFlags::FRAGMENT,
                },
                DescriptorBinding {
                    binding: 1,
                    ty: DescriptorType::CombinedImageSampler,
                    stages: ShaderStageFlags::FRAGMENT,
                },
            ],
        })?;

        let pipeline = device.create_pipeline(&PipelineDescriptor {
            label: Some("deferred_offscreen_pipeline"),
            vertex_shader,
            fragment_shader: Some(fragment_shader),
            render_pass,
            vertex_layout: mesh_vertex_layout(),
            descriptor_layouts: &[camera_layout, material_layout],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStageFlags::VERTEX,
                offset: 0,
                size: std::mem::size_of::<ModelPushConstants>() as u32,
            }],
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Fill,
            transparency_enabled: false,
            depth: DepthState::default(),
        })?;

        let camera_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("deferred_camera_uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;
        let camera_set = device.create_descriptor_set(camera_layout)?;
        device.update_descriptor_set(
            camera_set,
            &[DescriptorWrite::uniform(
                0,
                ShaderStageFlags::VERTEX,
                camera_buffer,
                std::mem::size_of::<CameraUniforms>() as u64,
            )],
        )?;

        let (default_material_set, default_material_buffer, default_texture, default_texture_view, default_sampler) =
            Self::create_default_material(device, material_layout)?;

        self.gpu = Some(Gpu {
            render_pass,
            framebuffer: None,
            pipeline,
            vertex_shader,
            fragment_shader,
            camera_buffer,
            camera_layout,
            camera_set,
            material_layout,
            default_material_set,
            default_material_buffer,
            default_texture,
            default_texture_view,
            default_sampler,
        });
        self.rebuild_framebuffer(device, gbuffer)
    }

    fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &crate::world::RenderWorld,
        _board: &mut PassBoard,
    ) -> Result<(), RendererError> {
        self.command_queue.clear();
        let Some(camera) = world.camera.as_ref() else {
            return Ok(());
        };

        let uniforms = CameraUniforms {
            proj_view: camera.view_projection().to_cols_array_2d(),
        };
        let gpu = self.gpu()?;
        device.write_buffer(gpu.camera_buffer, 0, bytemuck::bytes_of(&uniforms))?;

        for mesh in &world.meshes {
            self.command_queue.push(RenderCommand {
                mesh: mesh.mesh,
                transform: mesh.transform,
                material: mesh.material,
            });
        }
        Ok(())
    }

    fn render_scene(&mut self, frame: &mut FrameContext<'_>) -> Result<(), RendererError> {
        let extent = self.extent;
        let gpu = self.gpu()?;
        let framebuffer = gpu
            .framebuffer
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;

        // The pass always runs so the G-buffer is cleared even when the
        // queue is empty (no camera this frame).
        let mut pass = frame.encoder.begin_render_pass(&RenderPassBegin {
            label: Some("deferred_offscreen"),
            render_pass: gpu.render_pass,
            framebuffer,
            extent,
            clear_color: LinearRgba::new(0.3, 0.3, 0.3, 1.0),
            clear_depth: 1.0,
        });
        pass.set_pipeline(gpu.pipeline);

        for command in &self.command_queue {
            let material = command.material.unwrap_or(gpu.default_material_set);
            pass.bind_descriptor_sets(0, &[gpu.camera_set, material]);
            pass.set_vertex_buffer(0, command.mesh.vertex_buffer, 0);
            pass.set_index_buffer(command.mesh.index_buffer, 0, command.mesh.index_format);
            let push = ModelPushConstants {
                model: command.transform.to_cols_array_2d(),
            };
            pass.set_push_constants(ShaderStageFlags::VERTEX, 0, bytemuck::bytes_of(&push));
            pass.draw_indexed(0..command.mesh.index_count, 0, 0..1);
        }
        Ok(())
    }

    fn on_resize(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
        _extent: Extent2D,
    ) -> Result<(), RendererError> {
        // The G-buffer was just recreated; the framebuffer must follow.
        self.rebuild_framebuffer(device, gbuffer)
    }

    fn destroy(&mut self, device: &dyn GraphicsDevice) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        if let Some(framebuffer) = gpu.framebuffer {
            let _ = device.destroy_framebuffer(framebuffer);
        }
        let _ = device.destroy_pipeline(gpu.pipeline);
        let _ = device.destroy_render_pass(gpu.render_pass);
        let _ = device.destroy_shader_module(gpu.vertex_shader);
        let _ = device.destroy_shader_module(gpu.fragment_shader);
        let _ = device.destroy_descriptor_set(gpu.camera_set);
        let _ = device.destroy_descriptor_set(gpu.default_material_set);
        let _ = device.destroy_descriptor_set_layout(gpu.camera_layout);
        let _ = device.destroy_descriptor_set_layout(gpu.material_layout);
        let _ = device.destroy_buffer(gpu.camera_buffer);
        let _ = device.destroy_buffer(gpu.default_material_buffer);
        let _ = device.destroy_sampler(gpu.default_sampler);
        let _ = device.destroy_texture_view(gpu.default_texture_view);
        let _ = device.destroy_texture(gpu.default_texture);
    }
}
