//! A mock graphics device for pipeline integration tests.
//!
//! Beyond handing out ids, the mock enforces the same creation-time
//! validation a real backend would: framebuffers are checked against
//! their render pass and descriptor writes against their layout, so a
//! wiring mistake in a pass fails the test instead of passing silently.
//! Every frame-level call is recorded for order assertions.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vesper_core::error::{RenderError, ResourceError};
use vesper_core::gpu::{
    validate_writes, AttachmentDescription, BufferDescriptor, BufferId, CommandBufferId,
    CommandEncoder, DescriptorBinding, DescriptorSetId, DescriptorSetLayoutDescriptor,
    DescriptorSetLayoutId, DescriptorWrite, FramebufferDescriptor, FramebufferId, GraphicsDevice,
    ImageCopy, IndexFormat, PipelineDescriptor, PipelineId, RenderPassBegin, RenderPassDescriptor,
    RenderPassId, RenderPassRecorder, SamplerDescriptor, SamplerId, ShaderModuleDescriptor,
    ShaderModuleId, ShaderStageFlags, TextureDescriptor, TextureFormat, TextureId,
    TextureViewDescriptor, TextureViewId,
};
use vesper_core::math::{Extent2D, Extent3D, Origin3D};

#[derive(Debug)]
pub struct MockDevice {
    next_id: AtomicUsize,
    events: Arc<Mutex<Vec<String>>>,
    render_passes: Mutex<HashMap<usize, Vec<AttachmentDescription>>>,
    layouts: Mutex<HashMap<usize, Vec<DescriptorBinding>>>,
    set_layouts: Mutex<HashMap<usize, usize>>,
    framebuffer_extents: Mutex<HashMap<usize, Extent2D>>,
    surface_extent: Mutex<Extent2D>,
}

impl MockDevice {
    pub fn new(extent: Extent2D) -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicUsize::new(1),
            events: Arc::new(Mutex::new(Vec::new())),
            render_passes: Mutex::new(HashMap::new()),
            layouts: Mutex::new(HashMap::new()),
            set_layouts: Mutex::new(HashMap::new()),
            framebuffer_extents: Mutex::new(HashMap::new()),
            surface_extent: Mutex::new(extent),
        })
    }

    pub fn set_surface_extent(&self, extent: Extent2D) {
        *self.surface_extent.lock().unwrap() = extent;
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    /// The extents of every live framebuffer.
    pub fn framebuffer_extents(&self) -> Vec<Extent2D> {
        self.framebuffer_extents.lock().unwrap().values().copied().collect()
    }

    fn alloc(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

impl GraphicsDevice for MockDevice {
    fn create_shader_module(
        &self,
        _descriptor: &ShaderModuleDescriptor<'_>,
    ) -> Result<ShaderModuleId, ResourceError> {
        Ok(ShaderModuleId(self.alloc()))
    }

    fn destroy_shader_module(&self, _id: ShaderModuleId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Result<RenderPassId, ResourceError> {
        let id = self.alloc();
        self.render_passes
            .lock()
            .unwrap()
            .insert(id, descriptor.attachments.to_vec());
        Ok(RenderPassId(id))
    }

    fn destroy_render_pass(&self, id: RenderPassId) -> Result<(), ResourceError> {
        self.render_passes.lock().unwrap().remove(&id.0);
        Ok(())
    }

    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<FramebufferId, ResourceError> {
        let passes = self.render_passes.lock().unwrap();
        let attachments = passes
            .get(&descriptor.render_pass.0)
            .ok_or(ResourceError::InvalidHandle)?;
        descriptor.validate_against(&RenderPassDescriptor {
            label: None,
            attachments,
        })?;
        drop(passes);
        let id = self.alloc();
        self.framebuffer_extents
            .lock()
            .unwrap()
            .insert(id, descriptor.extent);
        self.record("create_framebuffer");
        Ok(FramebufferId(id))
    }

    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        self.framebuffer_extents.lock().unwrap().remove(&id.0);
        Ok(())
    }

    fn create_pipeline(
        &self,
        _descriptor: &PipelineDescriptor<'_>,
    ) -> Result<PipelineId, ResourceError> {
        Ok(PipelineId(self.alloc()))
    }

    fn destroy_pipeline(&self, _id: PipelineId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_buffer(&self, _descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError> {
        Ok(BufferId(self.alloc()))
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor<'_>,
        _data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.create_buffer(descriptor)
    }

    fn destroy_buffer(&self, _id: BufferId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn write_buffer(&self, _id: BufferId, _offset: u64, _data: &[u8]) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_texture(
        &self,
        _descriptor: &TextureDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        Ok(TextureId(self.alloc()))
    }

    fn destroy_texture(&self, _id: TextureId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn write_texture(
        &self,
        _texture: TextureId,
        _data: &[u8],
        _bytes_per_row: Option<u32>,
        _origin: Origin3D,
        _size: Extent3D,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_texture_view(
        &self,
        _texture: TextureId,
        _descriptor: &TextureViewDescriptor<'_>,
    ) -> Result<TextureViewId, ResourceError> {
        Ok(TextureViewId(self.alloc()))
    }

    fn destroy_texture_view(&self, _id: TextureViewId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_sampler(
        &self,
        _descriptor: &SamplerDescriptor<'_>,
    ) -> Result<SamplerId, ResourceError> {
        Ok(SamplerId(self.alloc()))
    }

    fn destroy_sampler(&self, _id: SamplerId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_descriptor_set_layout(
        &self,
        descriptor: &DescriptorSetLayoutDescriptor<'_>,
    ) -> Result<DescriptorSetLayoutId, ResourceError> {
        let id = self.alloc();
        self.layouts
            .lock()
            .unwrap()
            .insert(id, descriptor.bindings.to_vec());
        Ok(DescriptorSetLayoutId(id))
    }

    fn destroy_descriptor_set_layout(
        &self,
        id: DescriptorSetLayoutId,
    ) -> Result<(), ResourceError> {
        self.layouts.lock().unwrap().remove(&id.0);
        Ok(())
    }

    fn create_descriptor_set(
        &self,
        layout: DescriptorSetLayoutId,
    ) -> Result<DescriptorSetId, ResourceError> {
        if !self.layouts.lock().unwrap().contains_key(&layout.0) {
            return Err(ResourceError::InvalidHandle);
        }
        let id = self.alloc();
        self.set_layouts.lock().unwrap().insert(id, layout.0);
        Ok(DescriptorSetId(id))
    }

    fn destroy_descriptor_set(&self, id: DescriptorSetId) -> Result<(), ResourceError> {
        self.set_layouts.lock().unwrap().remove(&id.0);
        Ok(())
    }

    fn update_descriptor_set(
        &self,
        set: DescriptorSetId,
        writes: &[DescriptorWrite],
    ) -> Result<(), ResourceError> {
        let set_layouts = self.set_layouts.lock().unwrap();
        let layout_id = set_layouts.get(&set.0).ok_or(ResourceError::InvalidHandle)?;
        let layouts = self.layouts.lock().unwrap();
        let bindings = layouts.get(layout_id).ok_or(ResourceError::InvalidHandle)?;
        validate_writes(bindings, writes)
    }

    fn create_command_encoder(&self, _label: Option<&str>) -> Box<dyn CommandEncoder> {
        Box::new(MockEncoder {
            events: Arc::clone(&self.events),
        })
    }

    fn submit_command_buffer(&self, _command_buffer: CommandBufferId) {
        self.record("submit");
    }

    fn begin_frame(&self) -> Result<u32, RenderError> {
        self.record("begin_frame");
        Ok(0)
    }

    fn present(&self) -> Result<(), RenderError> {
        self.record("present");
        Ok(())
    }

    fn wait_idle(&self) {
        self.record("wait_idle");
    }

    fn surface_format(&self) -> TextureFormat {
        TextureFormat::Bgra8Unorm
    }

    fn swapchain_image_count(&self) -> u32 {
        2
    }

    fn swapchain_target(&self, index: u32) -> TextureViewId {
        TextureViewId(1_000_000 + index as usize)
    }

    fn surface_extent(&self) -> Extent2D {
        *self.surface_extent.lock().unwrap()
    }
}

pub struct MockEncoder {
    events: Arc<Mutex<Vec<String>>>,
}

impl CommandEncoder for MockEncoder {
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        begin: &RenderPassBegin<'_>,
    ) -> Box<dyn RenderPassRecorder + 'encoder> {
        self.events
            .lock()
            .unwrap()
            .push(format!("pass:{}", begin.label.unwrap_or("unlabeled")));
        Box::new(MockRecorder {
            events: Arc::clone(&self.events),
        })
    }

    fn copy_texture_to_texture(
        &mut self,
        _source: ImageCopy,
        destination: ImageCopy,
        _size: Extent3D,
    ) {
        self.events
            .lock()
            .unwrap()
            .push(format!("copy:layer{}", destination.array_layer));
    }

    fn finish(self: Box<Self>) -> CommandBufferId {
        self.events.lock().unwrap().push("finish".to_string());
        CommandBufferId(0)
    }
}

pub struct MockRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl RenderPassRecorder for MockRecorder {
    fn set_pipeline(&mut self, _pipeline: PipelineId) {}
    fn bind_descriptor_sets(&mut self, _first_set: u32, _sets: &[DescriptorSetId]) {}
    fn set_vertex_buffer(&mut self, _slot: u32, _buffer: BufferId, _offset: u64) {}
    fn set_index_buffer(&mut self, _buffer: BufferId, _offset: u64, _format: IndexFormat) {}
    fn set_push_constants(&mut self, _stages: ShaderStageFlags, _offset: u32, _data: &[u8]) {}

    fn draw(&mut self, _vertices: std::ops::Range<u32>, _instances: std::ops::Range<u32>) {
        self.events.lock().unwrap().push("draw".to_string());
    }

    fn draw_indexed(
        &mut self,
        _indices: std::ops::Range<u32>,
        _base_vertex: i32,
        _instances: std::ops::Range<u32>,
    ) {
        self.events.lock().unwrap().push("draw_indexed".to_string());
    }
}
