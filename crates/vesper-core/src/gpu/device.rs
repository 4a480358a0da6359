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

//! The backend-agnostic graphics device trait.

use crate::error::{RenderError, ResourceError};
use crate::gpu::buffer::{BufferDescriptor, BufferId};
use crate::gpu::descriptor::{
    DescriptorSetId, DescriptorSetLayoutDescriptor, DescriptorSetLayoutId, DescriptorWrite,
};
use crate::gpu::encoder::{CommandBufferId, CommandEncoder};
use crate::gpu::pass::{FramebufferDescriptor, FramebufferId, RenderPassDescriptor, RenderPassId};
use crate::gpu::pipeline::{PipelineDescriptor, PipelineId};
use crate::gpu::shader::{ShaderModuleDescriptor, ShaderModuleId};
use crate::gpu::texture::{
    SamplerDescriptor, SamplerId, TextureDescriptor, TextureFormat, TextureId,
    TextureViewDescriptor, TextureViewId,
};
use crate::math::{Extent2D, Extent3D, Origin3D};
use std::fmt::Debug;

/// The abstract interface every graphics backend implements.
///
/// Renderers hold an `Arc<dyn GraphicsDevice>` received through their
/// constructor (dependency injection — there is no process-wide context
/// object) and never touch a concrete API. Resource factories return
/// opaque ids; creation failures are wiring errors and abort renderer
/// initialization.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a shader module from the provided descriptor.
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor<'_>,
    ) -> Result<ShaderModuleId, ResourceError>;

    /// Destroys a shader module.
    fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError>;

    /// Creates a persistent render pass.
    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Result<RenderPassId, ResourceError>;

    /// Destroys a render pass.
    fn destroy_render_pass(&self, id: RenderPassId) -> Result<(), ResourceError>;

    /// Creates a framebuffer against a render pass.
    ///
    /// Implementations must enforce
    /// [`FramebufferDescriptor::validate_against`]; a mismatched
    /// attachment list is a creation-time error.
    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<FramebufferId, ResourceError>;

    /// Destroys a framebuffer.
    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError>;

    /// Creates an immutable graphics pipeline.
    fn create_pipeline(
        &self,
        descriptor: &PipelineDescriptor<'_>,
    ) -> Result<PipelineId, ResourceError>;

    /// Destroys a pipeline.
    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), ResourceError>;

    /// Creates a GPU buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError>;

    /// Creates a GPU buffer initialized with `data`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor<'_>,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes `data` into a buffer at `offset`.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Creates a texture.
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Writes texel data into a texture region.
    fn write_texture(
        &self,
        texture: TextureId,
        data: &[u8],
        bytes_per_row: Option<u32>,
        origin: Origin3D,
        size: Extent3D,
    ) -> Result<(), ResourceError>;

    /// Creates a view into a texture.
    fn create_texture_view(
        &self,
        texture: TextureId,
        descriptor: &TextureViewDescriptor<'_>,
    ) -> Result<TextureViewId, ResourceError>;

    /// Destroys a texture view.
    fn destroy_texture_view(&self, id: TextureViewId) -> Result<(), ResourceError>;

    /// Creates a sampler.
    fn create_sampler(&self, descriptor: &SamplerDescriptor<'_>) -> Result<SamplerId, ResourceError>;

    /// Destroys a sampler.
    fn destroy_sampler(&self, id: SamplerId) -> Result<(), ResourceError>;

    /// Creates a descriptor set layout.
    fn create_descriptor_set_layout(
        &self,
        descriptor: &DescriptorSetLayoutDescriptor<'_>,
    ) -> Result<DescriptorSetLayoutId, ResourceError>;

    /// Destroys a descriptor set layout.
    fn destroy_descriptor_set_layout(
        &self,
        id: DescriptorSetLayoutId,
    ) -> Result<(), ResourceError>;

    /// Allocates a descriptor set from a layout.
    fn create_descriptor_set(
        &self,
        layout: DescriptorSetLayoutId,
    ) -> Result<DescriptorSetId, ResourceError>;

    /// Destroys a descriptor set.
    fn destroy_descriptor_set(&self, id: DescriptorSetId) -> Result<(), ResourceError>;

    /// Updates a descriptor set's bindings.
    ///
    /// Implementations must enforce
    /// [`crate::gpu::descriptor::validate_writes`] against the set's
    /// layout; a mismatch is an update-time error.
    fn update_descriptor_set(
        &self,
        set: DescriptorSetId,
        writes: &[DescriptorWrite],
    ) -> Result<(), ResourceError>;

    /// Creates a new command encoder.
    fn create_command_encoder(&self, label: Option<&str>) -> Box<dyn CommandEncoder>;

    /// Submits a finished command buffer for execution.
    fn submit_command_buffer(&self, command_buffer: CommandBufferId);

    /// Acquires the next swapchain image, returning its index.
    fn begin_frame(&self) -> Result<u32, RenderError>;

    /// Presents the current swapchain image.
    fn present(&self) -> Result<(), RenderError>;

    /// Blocks until the GPU has finished all submitted work.
    ///
    /// Called before destroying resources the GPU may still be reading,
    /// e.g. when rebuilding framebuffers on resize.
    fn wait_idle(&self);

    /// Returns the swapchain surface format.
    fn surface_format(&self) -> TextureFormat;

    /// Returns the number of swapchain images.
    fn swapchain_image_count(&self) -> u32;

    /// Returns the color view for a given swapchain image.
    fn swapchain_target(&self, index: u32) -> TextureViewId;

    /// Returns the current surface dimensions.
    fn surface_extent(&self) -> Extent2D;
}
