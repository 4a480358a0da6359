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

//! The cascaded directional shadow pass.
//!
//! Renders all shadow casters once per cascade into one layer of a shared
//! depth-array texture. The first directional light in the world drives
//! the pass; without one (or without a camera) the pass silently skips
//! the frame. Shadow resolution is independent of the window, so resize
//! events do not touch these resources — framebuffers are built lazily
//! behind an invalidation flag instead.

use crate::board::{CascadeShadowOutput, PassBoard};
use crate::cascade::{compute_cascade_splits, compute_cascades, Cascade, SHADOW_CASCADES};
use crate::config::{RenderConfig, ShadowSettings};
use crate::error::RendererError;
use crate::gbuffer::GBuffer;
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
    RenderPassId, ShaderModuleDescriptor, ShaderModuleId, ShaderSource, ShaderStage,
    ShaderStageFlags, TextureDescriptor, TextureDimension, TextureFormat, TextureId, TextureUsage,
    TextureViewDescriptor, TextureViewId,
};
use vesper_core::light::LightType;
use vesper_core::math::{Extent2D, Extent3D, Frustum, LinearRgba, Mat4};

/// Per-frame uniform data for the shadow vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CascadeUniforms {
    proj_view: [[[f32; 4]; 4]; SHADOW_CASCADES],
}

/// Per-draw push constants: world transform plus the cascade index.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ShadowPushConstants {
    model: [[f32; 4]; 4],
    cascade: [i32; 4],
}

struct Gpu {
    shadow_texture: TextureId,
    shadow_view: TextureViewId,
    layer_views: [TextureViewId; SHADOW_CASCADES],
    render_pass: RenderPassId,
    framebuffers: [Option<FramebufferId>; SHADOW_CASCADES],
    pipeline: PipelineId,
    vertex_shader: ShaderModuleId,
    uniform_buffer: BufferId,
    descriptor_layout: DescriptorSetLayoutId,
    descriptor_set: DescriptorSetId,
}

/// The cascaded shadow renderer.
pub struct CascadedShadowRenderer {
    settings: ShadowSettings,
    gpu: Option<Gpu>,
    cascades: [Cascade; SHADOW_CASCADES],
    command_queues: [Vec<RenderCommand>; SHADOW_CASCADES],
    has_light: bool,
    shadow_maps_invalidated: bool,
    light_view: Mat4,
}

impl CascadedShadowRenderer {
    /// Creates the pass; GPU resources are created in
    /// [`init`](Renderer::init).
    pub fn new() -> Self {
        Self {
            settings: ShadowSettings::default(),
            gpu: None,
            cascades: [Cascade::default(); SHADOW_CASCADES],
            command_queues: Default::default(),
            has_light: false,
            shadow_maps_invalidated: true,
            light_view: Mat4::IDENTITY,
        }
    }

    /// The cascades computed for the current frame.
    pub fn cascades(&self) -> &[Cascade; SHADOW_CASCADES] {
        &self.cascades
    }

    /// Whether a directional light was found this frame.
    pub fn has_light(&self) -> bool {
        self.has_light
    }

    /// The number of cascades actually rendered.
    fn cascade_count(&self) -> usize {
        (self.settings.cascade_count as usize).min(SHADOW_CASCADES)
    }

    fn gpu(&self) -> Result<&Gpu, RendererError> {
        self.gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))
    }

    /// Builds the per-cascade framebuffers when invalidated.
    ///
    /// Gated by `shadow_maps_invalidated` so per-frame calls are free;
    /// the flag is only set on construction and when the shadow
    /// resolution changes.
    fn ensure_framebuffers(&mut self, device: &dyn GraphicsDevice) -> Result<(), RendererError> {
        if !self.shadow_maps_invalidated {
            return Ok(());
        }
        let map_size = self.settings.map_size;
        let gpu = self
            .gpu
            .as_mut()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;
        for (layer, slot) in gpu.framebuffers.iter_mut().enumerate() {
            if let Some(old) = slot.take() {
                device.destroy_framebuffer(old)?;
            }
            let attachments = [FramebufferAttachment {
                view: gpu.layer_views[layer],
                format: TextureFormat::Depth32Float,
                kind: AttachmentKind::Depth,
            }];
            *slot = Some(device.create_framebuffer(&FramebufferDescriptor {
                label: Some("cascade_shadow_framebuffer"),
                render_pass: gpu.render_pass,
                attachments: &attachments,
                extent: Extent2D::new(map_size, map_size),
                layer: layer as u32,
            })?);
        }
        self.shadow_maps_invalidated = false;
        Ok(())
    }

    fn update_cascades(&mut self, camera: &crate::world::ExtractedCamera, light_direction: vesper_core::math::Vec3) {
        let splits = compute_cascade_splits(camera.near, camera.far, self.settings.split_lambda);
        let frustum = Frustum::from_matrix(&camera.view_projection());
        self.cascades = compute_cascades(
            &frustum,
            light_direction,
            &splits,
            camera.near,
            camera.far - camera.near,
        );
        self.light_view = self.cascades[0].view;
    }

    fn publish(&self, board: &mut PassBoard) -> Result<(), RendererError> {
        let gpu = self.gpu()?;
        let mut proj_view = [Mat4::IDENTITY; SHADOW_CASCADES];
        let mut split_depths = [0.0; SHADOW_CASCADES];
        for (i, cascade) in self.cascades.iter().enumerate() {
            proj_view[i] = cascade.proj_view;
            split_depths[i] = cascade.split_depth;
        }
        board.publish(CascadeShadowOutput {
            shadow_map: gpu.shadow_view,
            proj_view,
            split_depths,
            light_view: self.light_view,
            bias: self.settings.bias,
            light_size: self.settings.light_size,
            has_light: self.has_light,
        });
        Ok(())
    }
}

impl Default for CascadedShadowRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CascadedShadowRenderer {
    fn name(&self) -> &'static str {
        "cascade_shadow"
    }

    fn produces(&self) -> &[PassResource] {
        &[PassResource::CascadeShadowMap]
    }

    fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        _gbuffer: &GBuffer,
        config: &RenderConfig,
    ) -> Result<(), RendererError> {
        self.settings = config.shadow.clone();
        let map_size = self.settings.map_size;

        let shadow_texture = device.create_texture(&TextureDescriptor {
            label: Some("cascade_shadow_map"),
            extent: Extent3D::new(map_size, map_size, SHADOW_CASCADES as u32),
            dimension: TextureDimension::D2Array,
            format: TextureFormat::Depth32Float,
            usage: TextureUsage::DEPTH_ATTACHMENT | TextureUsage::SAMPLED,
            mip_level_count: 1,
        })?;
        let shadow_view = device.create_texture_view(
            shadow_texture,
            &TextureViewDescriptor {
                label: Some("cascade_shadow_map_array"),
                dimension: TextureDimension::D2Array,
                base_array_layer: 0,
                array_layer_count: SHADOW_CASCADES as u32,
            },
        )?;
        let mut layer_views = [TextureViewId(0); SHADOW_CASCADES];
        for (layer, view) in layer_views.iter_mut().enumerate() {
            *view = device.create_texture_view(
                shadow_texture,
                &TextureViewDescriptor {
                    label: Some("cascade_shadow_map_layer"),
                    dimension: TextureDimension::D2,
                    base_array_layer: layer as u32,
                    array_layer_count: 1,
                },
            )?;
        }

        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("cascade_shadow_pass"),
            attachments: &[AttachmentDescription::depth(TextureFormat::Depth32Float)],
        })?;

        let vertex_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("shadow_vert"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Glsl(shaders::SHADOW_VERT.into()),
        })?;

        let descriptor_layout =
            device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
                label: Some("cascade_shadow_layout"),
                bindings: &[DescriptorBinding {
                    binding: 0,
                    ty: DescriptorType::UniformBuffer,
                    stages: ShaderStageFlags::VERTEX,
                }],
            })?;

        let pipeline = device.create_pipeline(&PipelineDescriptor {
            label: Some("cascade_shadow_pipeline"),
            vertex_shader,
            fragment_shader: None,
            render_pass,
            vertex_layout: mesh_vertex_layout(),
            descriptor_layouts: &[descriptor_layout],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStageFlags::VERTEX,
                offset: 0,
                size: std::mem::size_of::<ShadowPushConstants>() as u32,
            }],
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::None,
            polygon_mode: PolygonMode::Fill,
            transparency_enabled: false,
            depth: DepthState {
                bias_enabled: true,
                ..Default::default()
            },
        })?;

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("cascade_shadow_uniforms"),
            size: std::mem::size_of::<CascadeUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;

        let descriptor_set = device.create_descriptor_set(descriptor_layout)?;
        device.update_descriptor_set(
            descriptor_set,
            &[DescriptorWrite::uniform(
                0,
                ShaderStageFlags::VERTEX,
                uniform_buffer,
                std::mem::size_of::<CascadeUniforms>() as u64,
            )],
        )?;

        self.gpu = Some(Gpu {
            shadow_texture,
            shadow_view,
            layer_views,
            render_pass,
            framebuffers: [None; SHADOW_CASCADES],
            pipeline,
            vertex_shader,
            uniform_buffer,
            descriptor_layout,
            descriptor_set,
        });
        self.shadow_maps_invalidated = true;
        self.ensure_framebuffers(device)
    }

    fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &crate::world::RenderWorld,
        board: &mut PassBoard,
    ) -> Result<(), RendererError> {
        self.has_light = true;

        let directional = world.first_directional_light().and_then(|l| match l.light {
            LightType::Directional(d) => Some(d),
            _ => None,
        });
        let (Some(camera), Some(light)) = (world.camera.as_ref(), directional) else {
            // No directional light or no camera: directional shadows are
            // optional, skip this frame.
            self.has_light = false;
            return self.publish(board);
        };

        self.update_cascades(camera, light.direction);

        for queue in &mut self.command_queues {
            queue.clear();
        }
        let cascade_count = self.cascade_count();
        for mesh in world.meshes.iter().filter(|m| m.casts_shadows) {
            for queue in self.command_queues.iter_mut().take(cascade_count) {
                queue.push(RenderCommand {
                    mesh: mesh.mesh,
                    transform: mesh.transform,
                    material: None,
                });
            }
        }

        let mut uniforms = CascadeUniforms {
            proj_view: [Mat4::IDENTITY.to_cols_array_2d(); SHADOW_CASCADES],
        };
        for (slot, cascade) in uniforms.proj_view.iter_mut().zip(self.cascades.iter()) {
            *slot = cascade.proj_view.to_cols_array_2d();
        }
        let gpu = self.gpu()?;
        device.write_buffer(gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms))?;

        self.publish(board)
    }

    fn render_scene(&mut self, frame: &mut FrameContext<'_>) -> Result<(), RendererError> {
        if !self.has_light {
            return Ok(());
        }
        self.ensure_framebuffers(frame.device)?;

        let map_size = self.settings.map_size;
        let cascade_count = self.cascade_count();
        let gpu = self.gpu()?;

        for cascade_index in 0..cascade_count {
            let framebuffer = gpu.framebuffers[cascade_index]
                .ok_or(RendererError::Render(RenderError::NotInitialized))?;
            let mut pass = frame.encoder.begin_render_pass(&RenderPassBegin {
                label: Some("cascade_shadow"),
                render_pass: gpu.render_pass,
                framebuffer,
                extent: Extent2D::new(map_size, map_size),
                clear_color: LinearRgba::BLACK,
                clear_depth: 1.0,
            });
            pass.set_pipeline(gpu.pipeline);
            pass.bind_descriptor_sets(0, &[gpu.descriptor_set]);

            for command in &self.command_queues[cascade_index] {
                pass.set_vertex_buffer(0, command.mesh.vertex_buffer, 0);
                pass.set_index_buffer(command.mesh.index_buffer, 0, command.mesh.index_format);
                let push = ShadowPushConstants {
                    model: command.transform.to_cols_array_2d(),
                    cascade: [cascade_index as i32, 0, 0, 0],
                };
                pass.set_push_constants(ShaderStageFlags::VERTEX, 0, bytemuck::bytes_of(&push));
                pass.draw_indexed(0..command.mesh.index_count, 0, 0..1);
            }
        }
        Ok(())
    }

    fn destroy(&mut self, device: &dyn GraphicsDevice) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        for framebuffer in gpu.framebuffers.into_iter().flatten() {
            let _ = device.destroy_framebuffer(framebuffer);
        }
        let _ = device.destroy_pipeline(gpu.pipeline);
        let _ = device.destroy_render_pass(gpu.render_pass);
        let _ = device.destroy_shader_module(gpu.vertex_shader);
        let _ = device.destroy_descriptor_set(gpu.descriptor_set);
        let _ = device.destroy_descriptor_set_layout(gpu.descriptor_layout);
        let _ = device.destroy_buffer(gpu.uniform_buffer);
        for view in gpu.layer_views {
            let _ = device.destroy_texture_view(view);
        }
        let _ = device.destroy_texture_view(gpu.shadow_view);
        let _ = device.destroy_texture(gpu.shadow_texture);
        self.shadow_maps_invalidated = true;
    }
}
