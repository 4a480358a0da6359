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

//! Batched immediate-mode line drawing for debug visualization.
//!
//! Lines are queued from application code (frustums, bounding boxes,
//! gizmos) and flushed in a single pass drawn over the lit frame. The
//! debug renderer sits outside the manager's pass graph; the manager
//! drives it last and forwards resize/retarget events to it.

use crate::error::RendererError;
use crate::renderer::RenderTarget;
use crate::world::RenderWorld;
use vesper_core::error::RenderError;
use vesper_core::gpu::{
    AttachmentDescription, AttachmentKind, BufferDescriptor, BufferId, BufferUsage,
    CommandEncoder, CompareFunction, CullMode, DepthState, DescriptorBinding, DescriptorSetId,
    DescriptorSetLayoutDescriptor, DescriptorSetLayoutId, DescriptorType, DescriptorWrite,
    FramebufferAttachment, FramebufferDescriptor, FramebufferId, GraphicsDevice,
    PipelineDescriptor, PipelineId, PolygonMode, PrimitiveTopology, RenderPassBegin,
    RenderPassDescriptor, RenderPassId, ShaderModuleDescriptor, ShaderModuleId, ShaderSource,
    ShaderStage, ShaderStageFlags, TextureFormat, VertexAttribute, VertexBufferLayout,
    VertexFormat,
};
use vesper_core::math::{Extent2D, Frustum, LinearRgba, Vec3};

use crate::shaders;

/// One endpoint of a debug line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Line color.
    pub color: [f32; 4],
}

const LINE_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x4,
        offset: 12,
        location: 1,
    },
];

fn line_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        stride: std::mem::size_of::<LineVertex>() as u32,
        attributes: &LINE_VERTEX_ATTRIBUTES,
    }
}

/// Per-frame camera uniform for the line vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    proj_view: [[f32; 4]; 4],
}

const INITIAL_VERTEX_CAPACITY: usize = 4096;

struct Gpu {
    render_pass: RenderPassId,
    framebuffers: Vec<FramebufferId>,
    pipeline: PipelineId,
    vertex_shader: ShaderModuleId,
    fragment_shader: ShaderModuleId,
    vertex_buffer: BufferId,
    vertex_capacity: usize,
    uniform_buffer: BufferId,
    descriptor_layout: DescriptorSetLayoutId,
    descriptor_set: DescriptorSetId,
    format: TextureFormat,
}

/// The batched debug line renderer.
pub struct DebugRenderer {
    vertices: Vec<LineVertex>,
    gpu: Option<Gpu>,
    has_camera: bool,
    target: Option<RenderTarget>,
    extent: Extent2D,
}

impl DebugRenderer {
    /// Creates the renderer; GPU resources are created in [`init`](Self::init).
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            gpu: None,
            has_camera: false,
            target: None,
            extent: Extent2D::default(),
        }
    }

    /// Queues a single line.
    pub fn draw_line(&mut self, from: Vec3, to: Vec3, color: LinearRgba) {
        self.vertices.push(LineVertex {
            position: from.to_array(),
            color: color.to_array(),
        });
        self.vertices.push(LineVertex {
            position: to.to_array(),
            color: color.to_array(),
        });
    }

    /// Queues the 12 edges of a frustum.
    pub fn draw_frustum(&mut self, frustum: &Frustum, color: LinearRgba) {
        let corners = frustum.corners();
        for (a, b) in Frustum::EDGES {
            self.draw_line(corners[a], corners[b], color);
        }
    }

    /// Queues the 12 edges of an axis-aligned bounding box.
    pub fn draw_aabb(&mut self, min: Vec3, max: Vec3, color: LinearRgba) {
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        for (a, b) in Frustum::EDGES {
            self.draw_line(corners[a], corners[b], color);
        }
    }

    /// The number of queued vertices (two per line).
    pub fn queued_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Creates the GPU resources.
    pub fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        extent: Extent2D,
    ) -> Result<(), RendererError> {
        let format = device.surface_format();
        // Lines draw over the already-lit frame; preserve its contents.
        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("debug_line_pass"),
            attachments: &[AttachmentDescription::color(format).preserve()],
        })?;

        let vertex_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("line_vert"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Glsl(shaders::LINE_VERT.into()),
        })?;
        let fragment_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("line_frag"),
            stage: ShaderStage::Fragment,
            source: ShaderSource::Glsl(shaders::LINE_FRAG.into()),
        })?;

        let descriptor_layout =
            device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
                label: Some("debug_line_layout"),
                bindings: &[DescriptorBinding {
                    binding: 0,
                    ty: DescriptorType::UniformBuffer,
                    stages: ShaderStageFlags::VERTEX,
                }],
            })?;

        let pipeline = device.create_pipeline(&PipelineDescriptor {
            label: Some("debug_line_pipeline"),
            vertex_shader,
            fragment_shader: Some(fragment_shader),
            render_pass,
            vertex_layout: line_vertex_layout(),
            descriptor_layouts: &[descriptor_layout],
            push_constant_ranges: &[],
            topology: PrimitiveTopology::LineList,
            cull_mode: CullMode::None,
            polygon_mode: PolygonMode::Line,
            transparency_enabled: true,
            depth: DepthState {
                test_enabled: false,
                write_enabled: false,
                compare: CompareFunction::Always,
                bias_enabled: false,
            },
        })?;

        let vertex_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("debug_line_vertices"),
            size: (INITIAL_VERTEX_CAPACITY * std::mem::size_of::<LineVertex>()) as u64,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
        })?;

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("debug_line_uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;
        let descriptor_set = device.create_descriptor_set(descriptor_layout)?;
        device.update_descriptor_set(
            descriptor_set,
            &[DescriptorWrite::uniform(
                0,
                ShaderStageFlags::VERTEX,
                uniform_buffer,
                std::mem::size_of::<CameraUniforms>() as u64,
            )],
        )?;

        self.gpu = Some(Gpu {
            render_pass,
            framebuffers: Vec::new(),
            pipeline,
            vertex_shader,
            fragment_shader,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            uniform_buffer,
            descriptor_layout,
            descriptor_set,
            format,
        });
        self.rebuild_framebuffers(device, extent)
    }

    /// Uploads the camera matrix and clears state for a new frame.
    ///
    /// Queued lines survive until [`render_scene`](Self::render_scene)
    /// flushes them, so the application can queue between `begin_scene`
    /// and the render call.
    pub fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &RenderWorld,
    ) -> Result<(), RendererError> {
        self.has_camera = world.camera.is_some();
        let Some(camera) = world.camera.as_ref() else {
            self.vertices.clear();
            return Ok(());
        };
        let gpu = self.gpu()?;
        let uniforms = CameraUniforms {
            proj_view: camera.view_projection().to_cols_array_2d(),
        };
        device.write_buffer(gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms))?;
        Ok(())
    }

    /// Flushes the queued lines into the frame.
    pub fn render_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        encoder: &mut dyn CommandEncoder,
        swap_image: u32,
    ) -> Result<(), RendererError> {
        if self.vertices.is_empty() || !self.has_camera {
            self.vertices.clear();
            return Ok(());
        }
        self.ensure_vertex_capacity(device)?;

        let extent = self.extent;
        let use_target = self.target.is_some();
        let vertex_count = self.vertices.len() as u32;
        let gpu = self.gpu()?;

        device.write_buffer(
            gpu.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.vertices),
        )?;

        let index = if use_target { 0 } else { swap_image as usize };
        let framebuffer = *gpu
            .framebuffers
            .get(index)
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;

        let mut pass = encoder.begin_render_pass(&RenderPassBegin {
            label: Some("debug_lines"),
            render_pass: gpu.render_pass,
            framebuffer,
            extent,
            clear_color: LinearRgba::TRANSPARENT,
            clear_depth: 1.0,
        });
        pass.set_pipeline(gpu.pipeline);
        pass.bind_descriptor_sets(0, &[gpu.descriptor_set]);
        pass.set_vertex_buffer(0, gpu.vertex_buffer, 0);
        pass.draw(0..vertex_count, 0..1);
        drop(pass);

        self.vertices.clear();
        Ok(())
    }

    /// Rebuilds the output framebuffers for a new surface size.
    pub fn on_resize(
        &mut self,
        device: &dyn GraphicsDevice,
        extent: Extent2D,
    ) -> Result<(), RendererError> {
        self.rebuild_framebuffers(device, extent)
    }

    /// Redirects line output to an external target (or back to the
    /// swapchain).
    pub fn set_render_target(
        &mut self,
        device: &dyn GraphicsDevice,
        target: Option<RenderTarget>,
        rebuild: bool,
    ) -> Result<(), RendererError> {
        self.target = target;
        if rebuild {
            let extent = self.output_extent(device);
            self.rebuild_framebuffers(device, extent)?;
        }
        Ok(())
    }

    /// Destroys the GPU resources.
    pub fn destroy(&mut self, device: &dyn GraphicsDevice) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        for framebuffer in gpu.framebuffers {
            let _ = device.destroy_framebuffer(framebuffer);
        }
        let _ = device.destroy_pipeline(gpu.pipeline);
        let _ = device.destroy_render_pass(gpu.render_pass);
        let _ = device.destroy_shader_module(gpu.vertex_shader);
        let _ = device.destroy_shader_module(gpu.fragment_shader);
        let _ = device.destroy_descriptor_set(gpu.descriptor_set);
        let _ = device.destroy_descriptor_set_layout(gpu.descriptor_layout);
        let _ = device.destroy_buffer(gpu.vertex_buffer);
        let _ = device.destroy_buffer(gpu.uniform_buffer);
    }

    fn gpu(&self) -> Result<&Gpu, RendererError> {
        self.gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))
    }

    fn output_extent(&self, device: &dyn GraphicsDevice) -> Extent2D {
        self.target
            .map(|t| t.extent)
            .unwrap_or_else(|| device.surface_extent())
    }

    fn ensure_vertex_capacity(&mut self, device: &dyn GraphicsDevice) -> Result<(), RendererError> {
        let needed = self.vertices.len();
        let gpu = self
            .gpu
            .as_mut()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;
        if needed <= gpu.vertex_capacity {
            return Ok(());
        }
        let new_capacity = needed.next_power_of_two();
        // The old buffer may still be referenced by in-flight frames.
        device.wait_idle();
        device.destroy_buffer(gpu.vertex_buffer)?;
        gpu.vertex_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("debug_line_vertices"),
            size: (new_capacity * std::mem::size_of::<LineVertex>()) as u64,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
        })?;
        gpu.vertex_capacity = new_capacity;
        Ok(())
    }

    fn rebuild_framebuffers(
        &mut self,
        device: &dyn GraphicsDevice,
        extent: Extent2D,
    ) -> Result<(), RendererError> {
        let target = self.target;
        let gpu = self
            .gpu
            .as_mut()
            .ok_or(RendererError::Render(RenderError::NotInitialized))?;
        for framebuffer in gpu.framebuffers.drain(..) {
            device.destroy_framebuffer(framebuffer)?;
        }
        let views: Vec<_> = match target {
            Some(target) => vec![(target.view, target.format)],
            None => (0..device.swapchain_image_count())
                .map(|i| (device.swapchain_target(i), gpu.format))
                .collect(),
        };
        for (view, format) in views {
            let attachments = [FramebufferAttachment {
                view,
                format,
                kind: AttachmentKind::Color,
            }];
            gpu.framebuffers.push(device.create_framebuffer(&FramebufferDescriptor {
                label: Some("debug_line_framebuffer"),
                render_pass: gpu.render_pass,
                attachments: &attachments,
                extent,
                layer: 0,
            })?);
        }
        self.extent = extent;
        Ok(())
    }
}

impl Default for DebugRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_line_queues_two_vertices() {
        let mut debug = DebugRenderer::new();
        debug.draw_line(Vec3::ZERO, Vec3::X, LinearRgba::WHITE);
        assert_eq!(debug.queued_vertices(), 2);
    }

    #[test]
    fn draw_frustum_queues_twelve_edges() {
        let mut debug = DebugRenderer::new();
        let frustum = Frustum::default();
        debug.draw_frustum(&frustum, LinearRgba::WHITE);
        assert_eq!(debug.queued_vertices(), 24);
    }

    #[test]
    fn draw_aabb_queues_twelve_edges() {
        let mut debug = DebugRenderer::new();
        debug.draw_aabb(Vec3::ZERO, Vec3::ONE, LinearRgba::WHITE);
        assert_eq!(debug.queued_vertices(), 24);
    }
}
