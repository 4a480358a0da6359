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

//! Command recording: encoders and render-pass recorders.

use crate::gpu::buffer::{BufferId, IndexFormat};
use crate::gpu::descriptor::DescriptorSetId;
use crate::gpu::pass::{FramebufferId, RenderPassId};
use crate::gpu::pipeline::PipelineId;
use crate::gpu::shader::ShaderStageFlags;
use crate::gpu::texture::ImageCopy;
use crate::math::{Extent2D, Extent3D, LinearRgba};
use std::ops::Range;

/// An opaque handle to a finished, submittable command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandBufferId(pub usize);

/// Parameters for beginning a render pass.
#[derive(Debug, Clone)]
pub struct RenderPassBegin<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The persistent render pass to begin.
    pub render_pass: RenderPassId,
    /// The framebuffer to render into. Must have been created against
    /// `render_pass`.
    pub framebuffer: FramebufferId,
    /// The render area, normally the framebuffer extent.
    pub extent: Extent2D,
    /// The clear value for color attachments with a clear load op.
    pub clear_color: LinearRgba,
    /// The clear value for a depth attachment with a clear load op.
    pub clear_depth: f32,
}

/// Records drawing commands within an active render pass.
///
/// Obtained from [`CommandEncoder::begin_render_pass`]; the pass ends when
/// the recorder is dropped. Only one pass can be active on an encoder at a
/// time — the recorder borrows the encoder mutably.
pub trait RenderPassRecorder {
    /// Sets the active pipeline for subsequent draws.
    fn set_pipeline(&mut self, pipeline: PipelineId);

    /// Binds descriptor sets starting at `first_set`.
    fn bind_descriptor_sets(&mut self, first_set: u32, sets: &[DescriptorSetId]);

    /// Binds a vertex buffer to the given slot.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferId, offset: u64);

    /// Binds an index buffer for indexed drawing.
    fn set_index_buffer(&mut self, buffer: BufferId, offset: u64, format: IndexFormat);

    /// Writes push-constant bytes visible to `stages` at `offset`.
    ///
    /// The write must fall inside one of the bound pipeline's declared
    /// [`PushConstantRange`]s; backends reject writes outside them.
    ///
    /// [`PushConstantRange`]: crate::gpu::PushConstantRange
    fn set_push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]);

    /// Records a non-indexed draw.
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);

    /// Records an indexed draw.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);
}

/// Records a sequence of GPU commands into a command buffer.
pub trait CommandEncoder {
    /// Begins a render pass, returning a recorder for its draws.
    ///
    /// The recorder borrows the encoder mutably; dropping it ends the pass.
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        begin: &RenderPassBegin<'_>,
    ) -> Box<dyn RenderPassRecorder + 'encoder>;

    /// Records a texture-to-texture copy outside any pass.
    ///
    /// Used to move a face framebuffer's color output into a cube-map
    /// layer after an omni shadow pass.
    fn copy_texture_to_texture(&mut self, source: ImageCopy, destination: ImageCopy, size: Extent3D);

    /// Finalizes recording, consuming the encoder.
    fn finish(self: Box<Self>) -> CommandBufferId;
}
