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

//! The omni-directional (point light) shadow pass.
//!
//! Renders the scene six times — once per cube face — into a dedicated
//! color+depth framebuffer, then copies each face's color output (the
//! normalized light distance) into the matching layer of a cube texture.
//! Face order and up-vector choice must match the cube sampling
//! convention exactly; the `CUBE_FACES` table is the single source of
//! truth for both.

use crate::board::{OmniShadowOutput, PassBoard};
use crate::config::RenderConfig;
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
    FramebufferDescriptor, FramebufferId, GraphicsDevice, ImageCopy, PipelineDescriptor,
    PipelineId, PolygonMode, PrimitiveTopology, PushConstantRange, RenderPassBegin,
    RenderPassDescriptor, RenderPassId, ShaderModuleDescriptor, ShaderModuleId, ShaderSource,
    ShaderStage, ShaderStageFlags, TextureDescriptor, TextureDimension, TextureFormat, TextureId,
    TextureUsage, TextureViewDescriptor, TextureViewId,
};
use vesper_core::light::LightType;
use vesper_core::math::{Extent2D, Extent3D, LinearRgba, Mat4, Vec3, FRAC_PI_2};

/// The number of cube-map faces.
pub const CUBE_FACES: usize = 6;

/// Per-face `(forward, up)` pairs in cube face order
/// (+X, -X, +Y, -Y, +Z, -Z).
///
/// The ±X and ±Z faces use a flipped up vector so the rendered faces line
/// up with cube sampling; ±Y uses ±Z to avoid an up vector parallel to
/// the view direction. Getting any entry backwards flips or mirrors the
/// corresponding face at sampling time.
pub const CUBE_FACE_BASES: [(Vec3, Vec3); CUBE_FACES] = [
    (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
    (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
    (Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, -1.0, 0.0)),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, -1.0, 0.0)),
];

/// Builds the six face view matrices for a light at `light_pos`.
pub fn cube_face_views(light_pos: Vec3) -> [Mat4; CUBE_FACES] {
    let mut views = [Mat4::IDENTITY; CUBE_FACES];
    for (view, (forward, up)) in views.iter_mut().zip(CUBE_FACE_BASES.iter()) {
        *view = Mat4::look_at_rh(light_pos, light_pos + *forward, *up).unwrap_or(Mat4::IDENTITY);
    }
    views
}

/// Per-frame uniform data shared by the omni vertex and fragment stages.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct OmniUniforms {
    projection: [[f32; 4]; 4],
    light_pos: [f32; 4],
    /// x = radius.
    params: [f32; 4],
}

/// Per-draw push constants: world transform plus the face view matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct OmniPushConstants {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

struct Gpu {
    cube_texture: TextureId,
    cube_view: TextureViewId,
    color_texture: TextureId,
    color_view: TextureViewId,
    depth_texture: TextureId,
    depth_view: TextureViewId,
    render_pass: RenderPassId,
    framebuffer: FramebufferId,
    pipeline: PipelineId,
    vertex_shader: ShaderModuleId,
    fragment_shader: ShaderModuleId,
    uniform_buffer: BufferId,
    descriptor_layout: DescriptorSetLayoutId,
    descriptor_set: DescriptorSetId,
}

/// The omni shadow renderer.
pub struct OmniShadowRenderer {
    map_size: u32,
    gpu: Option<Gpu>,
    face_views: [Mat4; CUBE_FACES],
    command_queues: [Vec<RenderCommand>; CUBE_FACES],
    has_light: bool,
    light_position: Vec3,
    radius: f32,
}

impl OmniShadowRenderer {
    /// Creates the pass; GPU resources are created in
    /// [`init`](Renderer::init).
    pub fn new() -> Self {
        Self {
            map_size: 0,
            gpu: None,
            face_views: [Mat4::IDENTITY; CUBE_FACES],
            command_queues: Default::default(),
            has_light: false,
            light_position: Vec3::ZERO,
            radius: 0.0,
        }
    }

    /// Whether a point light was found this frame.
    pub fn has_light(&self) -> bool {
        self.has_light
    }

    /// The face view matrices computed for the current frame.
    pub fn face_views(&self) -> &[Mat4; CUBE_FACES] {
        &self.face_views
    }

    fn gpu(&self) -> Result<&Gpu, RendererError> {
        self.gpu
            .as_ref()
            .ok_or(RendererError::Render(RenderError::NotInitialized))
    }
}

impl Default for OmniShadowRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for OmniShadowRenderer {
    fn name(&self) -> &'static str {
        "omni_shadow"
    }

    fn produces(&self) -> &[PassResource] {
        &[PassResource::OmniShadowMap]
    }

    fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        _gbuffer: &GBuffer,
        config: &RenderConfig,
    ) -> Result<(), RendererError> {
        self.map_size = config.omni_shadow.map_size;
        let map_size = self.map_size;

        let cube_texture = device.create_texture(&TextureDescriptor {
            label: Some("omni_shadow_cube"),
            extent: Extent3D::new(map_size, map_size, CUBE_FACES as u32),
            dimension: TextureDimension::Cube,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
            mip_level_count: 1,
        })?;
        let cube_view = device.create_texture_view(
            cube_texture,
            &TextureViewDescriptor {
                label: Some("omni_shadow_cube"),
                dimension: TextureDimension::Cube,
                base_array_layer: 0,
                array_layer_count: CUBE_FACES as u32,
            },
        )?;

        let color_texture = device.create_texture(&TextureDescriptor {
            label: Some("omni_shadow_face_color"),
            extent: Extent3D::new(map_size, map_size, 1),
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::COPY_SRC,
            mip_level_count: 1,
        })?;
        let color_view =
            device.create_texture_view(color_texture, &TextureViewDescriptor::default())?;

        let depth_texture = device.create_texture(&TextureDescriptor {
            label: Some("omni_shadow_face_depth"),
            extent: Extent3D::new(map_size, map_size, 1),
            dimension: TextureDimension::D2,
            format: TextureFormat::Depth32Float,
            usage: TextureUsage::DEPTH_ATTACHMENT,
            mip_level_count: 1,
        })?;
        let depth_view =
            device.create_texture_view(depth_texture, &TextureViewDescriptor::default())?;

        let render_pass = device.create_render_pass(&RenderPassDescriptor {
            label: Some("omni_shadow_pass"),
            attachments: &[
                AttachmentDescription::color(TextureFormat::Rgba8Unorm),
                AttachmentDescription::depth(TextureFormat::Depth32Float),
            ],
        })?;

        let attachments = [
            FramebufferAttachment {
                view: color_view,
                format: TextureFormat::Rgba8Unorm,
                kind: AttachmentKind::Color,
            },
            FramebufferAttachment {
                view: depth_view,
                format: TextureFormat::Depth32Float,
                kind: AttachmentKind::Depth,
            },
        ];
        let framebuffer = device.create_framebuffer(&FramebufferDescriptor {
            label: Some("omni_shadow_framebuffer"),
            render_pass,
            attachments: &attachments,
            extent: Extent2D::new(map_size, map_size),
            layer: 0,
        })?;

        let vertex_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("omni_vert"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Glsl(shaders::OMNI_VERT.into()),
        })?;
        let fragment_shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("omni_frag"),
            stage: ShaderStage::Fragment,
            source: ShaderSource::Glsl(shaders::OMNI_FRAG.into()),
        })?;

        let descriptor_layout =
            device.create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
                label: Some("omni_shadow_layout"),
                bindings: &[DescriptorBinding {
                    binding: 0,
                    ty: DescriptorType::UniformBuffer,
                    stages: ShaderStageFlags::VERTEX_FRAGMENT,
                }],
            })?;

        let pipeline = device.create_pipeline(&PipelineDescriptor {
            label: Some("omni_shadow_pipeline"),
            vertex_shader,
            fragment_shader: Some(fragment_shader),
            render_pass,
            vertex_layout: mesh_vertex_layout(),
            descriptor_layouts: &[descriptor_layout],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStageFlags::VERTEX,
                offset: 0,
                size: std::mem::size_of::<OmniPushConstants>() as u32,
            }],
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Fill,
            transparency_enabled: true,
            depth: DepthState::default(),
        })?;

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("omni_shadow_uniforms"),
            size: std::mem::size_of::<OmniUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;

        let descriptor_set = device.create_descriptor_set(descriptor_layout)?;
        device.update_descriptor_set(
            descriptor_set,
            &[DescriptorWrite::uniform(
                0,
                ShaderStageFlags::VERTEX_FRAGMENT,
                uniform_buffer,
                std::mem::size_of::<OmniUniforms>() as u64,
            )],
        )?;

        self.gpu = Some(Gpu {
            cube_texture,
            cube_view,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            render_pass,
            framebuffer,
            pipeline,
            vertex_shader,
            fragment_shader,
            uniform_buffer,
            descriptor_layout,
            descriptor_set,
        });
        Ok(())
    }

    fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &crate::world::RenderWorld,
        board: &mut PassBoard,
    ) -> Result<(), RendererError> {
        self.has_light = true;

        let point = world.first_point_light().and_then(|l| match l.light {
            LightType::Point(p) => Some((p, l.position)),
            _ => None,
        });
        let (Some(_), Some((light, position))) = (world.camera.as_ref(), point) else {
            // Point-light shadows are optional; skip this frame.
            self.has_light = false;
            let gpu = self.gpu()?;
            board.publish(OmniShadowOutput {
                shadow_cube: gpu.cube_view,
                light_position: self.light_position,
                radius: self.radius,
                has_light: false,
            });
            return Ok(());
        };

        self.light_position = position;
        self.radius = light.radius;
        self.face_views = cube_face_views(position);

        for queue in &mut self.command_queues {
            queue.clear();
        }
        for mesh in world.meshes.iter().filter(|m| m.casts_shadows) {
            for queue in &mut self.command_queues {
                queue.push(RenderCommand {
                    mesh: mesh.mesh,
                    transform: mesh.transform,
                    material: None,
                });
            }
        }

        let projection = Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 1.0, light.radius.max(1.0 + 1e-3));
        let uniforms = OmniUniforms {
            projection: projection.to_cols_array_2d(),
            light_pos: [position.x, position.y, position.z, 1.0],
            params: [light.radius, 0.0, 0.0, 0.0],
        };
        let gpu = self.gpu()?;
        device.write_buffer(gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms))?;

        board.publish(OmniShadowOutput {
            shadow_cube: gpu.cube_view,
            light_position: position,
            radius: light.radius,
            has_light: true,
        });
        Ok(())
    }

    fn render_scene(&mut self, frame: &mut FrameContext<'_>) -> Result<(), RendererError> {
        if !self.has_light {
            return Ok(());
        }
        let map_size = self.map_size;
        let gpu = self.gpu()?;

        for face in 0..CUBE_FACES {
            {
                let mut pass = frame.encoder.begin_render_pass(&RenderPassBegin {
                    label: Some("omni_shadow"),
                    render_pass: gpu.render_pass,
                    framebuffer: gpu.framebuffer,
                    extent: Extent2D::new(map_size, map_size),
                    clear_color: LinearRgba::new(0.0, 0.0, 0.0, 1.0),
                    clear_depth: 1.0,
                });
                pass.set_pipeline(gpu.pipeline);
                pass.bind_descriptor_sets(0, &[gpu.descriptor_set]);

                for command in &self.command_queues[face] {
                    pass.set_vertex_buffer(0, command.mesh.vertex_buffer, 0);
                    pass.set_index_buffer(command.mesh.index_buffer, 0, command.mesh.index_format);
                    let push = OmniPushConstants {
                        model: command.transform.to_cols_array_2d(),
                        view: self.face_views[face].to_cols_array_2d(),
                    };
                    pass.set_push_constants(ShaderStageFlags::VERTEX, 0, bytemuck::bytes_of(&push));
                    pass.draw_indexed(0..command.mesh.index_count, 0, 0..1);
                }
            }
            // The pass has ended; move the face's output into the cube.
            frame.encoder.copy_texture_to_texture(
                ImageCopy::base(gpu.color_texture),
                ImageCopy::layer(gpu.cube_texture, face as u32),
                Extent3D::new(map_size, map_size, 1),
            );
        }
        Ok(())
    }

    fn destroy(&mut self, device: &dyn GraphicsDevice) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        let _ = device.destroy_framebuffer(gpu.framebuffer);
        let _ = device.destroy_pipeline(gpu.pipeline);
        let _ = device.destroy_render_pass(gpu.render_pass);
        let _ = device.destroy_shader_module(gpu.vertex_shader);
        let _ = device.destroy_shader_module(gpu.fragment_shader);
        let _ = device.destroy_descriptor_set(gpu.descriptor_set);
        let _ = device.destroy_descriptor_set_layout(gpu.descriptor_layout);
        let _ = device.destroy_buffer(gpu.uniform_buffer);
        let _ = device.destroy_texture_view(gpu.depth_view);
        let _ = device.destroy_texture(gpu.depth_texture);
        let _ = device.destroy_texture_view(gpu.color_view);
        let _ = device.destroy_texture(gpu.color_texture);
        let _ = device.destroy_texture_view(gpu.cube_view);
        let _ = device.destroy_texture(gpu.cube_texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_core::math::approx_eq;

    #[test]
    fn face_forwards_are_axis_aligned_unit_vectors() {
        for (forward, _) in CUBE_FACE_BASES {
            assert!(approx_eq(forward.length(), 1.0));
            let axis_components = [forward.x.abs(), forward.y.abs(), forward.z.abs()];
            let ones = axis_components.iter().filter(|c| approx_eq(**c, 1.0)).count();
            let zeros = axis_components.iter().filter(|c| approx_eq(**c, 0.0)).count();
            assert_eq!((ones, zeros), (1, 2));
        }
    }

    #[test]
    fn face_up_vectors_are_never_parallel_to_forward() {
        for (forward, up) in CUBE_FACE_BASES {
            assert!(approx_eq(up.length(), 1.0));
            assert!(forward.cross(up).length() > 0.9);
        }
    }

    #[test]
    fn each_axis_appears_in_both_directions() {
        let sum = CUBE_FACE_BASES
            .iter()
            .fold(Vec3::ZERO, |acc, (forward, _)| acc + *forward);
        assert!(approx_eq(sum.length(), 0.0));
    }

    #[test]
    fn face_views_look_along_their_axis() {
        let light_pos = Vec3::new(3.0, -1.0, 2.0);
        let views = cube_face_views(light_pos);
        for (view, (forward, _)) in views.iter().zip(CUBE_FACE_BASES.iter()) {
            assert_ne!(*view, Mat4::IDENTITY);
            // A point one unit down the face axis lands on the view -Z axis.
            let probe = light_pos + *forward;
            let in_view = *view * vesper_core::math::Vec4::from_vec3(probe, 1.0);
            assert!(approx_eq(in_view.x, 0.0));
            assert!(approx_eq(in_view.y, 0.0));
            assert!(approx_eq(in_view.z, -1.0));
        }
    }
}
