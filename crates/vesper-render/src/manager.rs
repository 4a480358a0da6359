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

//! The render manager: owns the G-buffer and drives the pass pipeline.
//!
//! Passes declare the resources they produce and consume; at `init` the
//! manager builds a dependency graph from those declarations and sorts it
//! into the frame execution order. A consumer registered without its
//! producer fails pipeline construction instead of rendering garbage.
//! Within a frame, execution is strictly sequential: no pass begins
//! before the previous one ended.

use crate::board::PassBoard;
use crate::config::RenderConfig;
use crate::debug::DebugRenderer;
use crate::error::RendererError;
use crate::gbuffer::GBuffer;
use crate::renderer::{FrameContext, PassResource, Renderer, RenderTarget};
use crate::world::RenderWorld;
use std::collections::HashMap;
use std::sync::Arc;
use vesper_core::gpu::GraphicsDevice;
use vesper_core::graph::topological_sort_stable;
use vesper_core::math::Extent2D;

/// The render manager.
pub struct RenderManager {
    device: Arc<dyn GraphicsDevice>,
    config: RenderConfig,
    renderers: Vec<Box<dyn Renderer>>,
    /// Renderer indices in execution order; valid after `init`.
    order: Vec<usize>,
    gbuffer: Option<GBuffer>,
    board: PassBoard,
    debug: DebugRenderer,
    extent: Extent2D,
}

impl RenderManager {
    /// Creates a manager over an injected device.
    pub fn new(device: Arc<dyn GraphicsDevice>, config: RenderConfig) -> Self {
        Self {
            device,
            config,
            renderers: Vec::new(),
            order: Vec::new(),
            gbuffer: None,
            board: PassBoard::new(),
            debug: DebugRenderer::new(),
            extent: Extent2D::default(),
        }
    }

    /// Registers a pass. Must be called before [`init`](Self::init);
    /// registration order only breaks ties between independent passes.
    pub fn add_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    /// The shared G-buffer, available after `init`.
    pub fn gbuffer(&self) -> Option<&GBuffer> {
        self.gbuffer.as_ref()
    }

    /// The debug line renderer, for queueing lines from application code.
    pub fn debug(&mut self) -> &mut DebugRenderer {
        &mut self.debug
    }

    /// The pass names in execution order; valid after `init`.
    pub fn execution_order(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .map(|&index| self.renderers[index].name())
            .collect()
    }

    /// Builds the pass graph, creates the G-buffer, and initializes every
    /// pass in execution order.
    pub fn init(&mut self, extent: Extent2D) -> Result<(), RendererError> {
        self.order = self.sort_passes()?;
        self.extent = extent;

        let gbuffer = GBuffer::new(self.device.as_ref(), extent)?;
        for &index in &self.order {
            self.renderers[index].init(self.device.as_ref(), &gbuffer, &self.config)?;
        }
        self.debug.init(self.device.as_ref(), extent)?;
        self.gbuffer = Some(gbuffer);
        Ok(())
    }

    /// Per-frame extraction: clears the pass board and forwards to every
    /// pass in execution order, then the debug renderer.
    pub fn begin_scene(&mut self, world: &RenderWorld) -> Result<(), RendererError> {
        if self.gbuffer.is_none() {
            return Err(RendererError::NotInitialized);
        }
        self.board.clear();
        for &index in &self.order {
            self.renderers[index].begin_scene(self.device.as_ref(), world, &mut self.board)?;
        }
        self.debug.begin_scene(self.device.as_ref(), world)
    }

    /// Renders one frame: acquire, record every pass in execution order,
    /// submit, present.
    pub fn on_render(&mut self, world: &RenderWorld) -> Result<(), RendererError> {
        if self.gbuffer.is_none() {
            return Err(RendererError::NotInitialized);
        }
        let device = self.device.as_ref();
        let swap_image = device.begin_frame()?;
        let mut encoder = device.create_command_encoder(Some("frame"));

        for &index in &self.order {
            let mut frame = FrameContext {
                device,
                encoder: encoder.as_mut(),
                swap_image,
                world,
                board: &self.board,
            };
            self.renderers[index].render_scene(&mut frame)?;
        }
        self.debug.render_scene(device, encoder.as_mut(), swap_image)?;

        let command_buffer = encoder.finish();
        device.submit_command_buffer(command_buffer);
        device.present()?;
        Ok(())
    }

    /// Resizes the G-buffer and every pass.
    ///
    /// A zero dimension (minimized window) is a no-op, not an error.
    /// After return, the G-buffer and every size-dependent framebuffer
    /// agree on the new dimensions.
    pub fn on_resize(&mut self, extent: Extent2D) -> Result<(), RendererError> {
        if extent.is_empty() {
            log::debug!("RenderManager: ignoring resize to {extent:?}");
            return Ok(());
        }
        let Some(gbuffer) = self.gbuffer.as_mut() else {
            return Err(RendererError::NotInitialized);
        };
        let device = self.device.as_ref();
        // Old targets may still be in use by in-flight frames.
        device.wait_idle();
        gbuffer.resize(device, extent)?;
        self.extent = extent;

        for &index in &self.order {
            self.renderers[index].on_resize(device, gbuffer, extent)?;
        }
        self.debug.on_resize(device, extent)
    }

    /// Redirects every pass's output to an external texture, or back to
    /// the swapchain when `target` is `None`.
    pub fn set_render_target(
        &mut self,
        target: Option<RenderTarget>,
        rebuild: bool,
    ) -> Result<(), RendererError> {
        let device = self.device.as_ref();
        for &index in &self.order {
            self.renderers[index].set_render_target(device, target, rebuild)?;
        }
        self.debug.set_render_target(device, target, rebuild)
    }

    /// Destroys every pass's resources and the G-buffer.
    pub fn destroy(&mut self) {
        let device = self.device.as_ref();
        for renderer in &mut self.renderers {
            renderer.destroy(device);
        }
        self.debug.destroy(device);
        if let Some(mut gbuffer) = self.gbuffer.take() {
            gbuffer.destroy(device);
        }
        self.order.clear();
    }

    /// Resolves declared produce/consume relationships into an execution
    /// order.
    fn sort_passes(&self) -> Result<Vec<usize>, RendererError> {
        let mut producers: HashMap<PassResource, usize> = HashMap::new();
        for (index, renderer) in self.renderers.iter().enumerate() {
            for &resource in renderer.produces() {
                if let Some(&first) = producers.get(&resource) {
                    return Err(RendererError::DuplicateProducer {
                        resource,
                        first: self.renderers[first].name(),
                        second: renderer.name(),
                    });
                }
                producers.insert(resource, index);
            }
        }

        let mut edges = Vec::new();
        for (consumer, renderer) in self.renderers.iter().enumerate() {
            for &resource in renderer.consumes() {
                let Some(&producer) = producers.get(&resource) else {
                    return Err(RendererError::MissingProducer {
                        resource,
                        consumer: renderer.name(),
                    });
                };
                edges.push((producer, consumer));
            }
            for &resource in renderer.soft_consumes() {
                if let Some(&producer) = producers.get(&resource) {
                    edges.push((producer, consumer));
                }
            }
        }

        Ok(topological_sort_stable(self.renderers.len(), &edges)?)
    }
}

impl std::fmt::Debug for RenderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderManager")
            .field("passes", &self.renderers.len())
            .field("extent", &self.extent)
            .finish()
    }
}
