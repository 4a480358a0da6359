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

//! The renderer (render pass) trait and its frame context.
//!
//! Each pass implements one flat trait — there is no pass hierarchy, and
//! no pass specializes another's behavior. Passes declare the resources
//! they produce and consume; the render manager sorts them into execution
//! order from those declarations instead of trusting registration order.

use crate::board::PassBoard;
use crate::config::RenderConfig;
use crate::error::RendererError;
use crate::gbuffer::GBuffer;
use crate::world::RenderWorld;
use vesper_core::gpu::{CommandEncoder, GraphicsDevice, TextureFormat, TextureViewId};
use vesper_core::math::Extent2D;

/// A frame resource produced or consumed by a pass.
///
/// These are the edges of the pass dependency graph: a pass consuming a
/// resource executes strictly after the pass producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassResource {
    /// The cascaded directional shadow depth-array.
    CascadeShadowMap,
    /// The omni-directional point-light shadow cube.
    OmniShadowMap,
    /// The filled G-buffer attachments.
    GeometryBuffer,
    /// The lit output color buffer.
    FinalColor,
}

/// An external color target replacing the swapchain image (the editor's
/// viewport-to-texture path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    /// The color view to render into.
    pub view: TextureViewId,
    /// The view's format.
    pub format: TextureFormat,
    /// The view's dimensions.
    pub extent: Extent2D,
}

/// Everything a pass needs while recording its frame commands.
pub struct FrameContext<'a> {
    /// The graphics device.
    pub device: &'a dyn GraphicsDevice,
    /// The frame's command encoder.
    pub encoder: &'a mut dyn CommandEncoder,
    /// The acquired swapchain image index.
    pub swap_image: u32,
    /// The extracted scene for this frame.
    pub world: &'a RenderWorld,
    /// The pass board carrying producer outputs.
    pub board: &'a PassBoard,
}

/// One render pass of the pipeline.
///
/// Per-frame flow, driven by the render manager in dependency order:
/// `begin_scene` (extraction, command-queue building, uniform uploads,
/// board publishing) for every pass, then `render_scene` (command
/// recording) for every pass, strictly sequentially.
pub trait Renderer {
    /// A stable, human-readable pass name for logs and errors.
    fn name(&self) -> &'static str;

    /// The resources this pass produces.
    fn produces(&self) -> &[PassResource] {
        &[]
    }

    /// The resources this pass requires. A missing producer for any of
    /// them fails pipeline construction.
    fn consumes(&self) -> &[PassResource] {
        &[]
    }

    /// Resources this pass reads when present but can render without —
    /// they order execution without being required (e.g. lighting reads
    /// shadow maps only when shadow passes are registered).
    fn soft_consumes(&self) -> &[PassResource] {
        &[]
    }

    /// Creates the pass's GPU resources.
    fn init(
        &mut self,
        device: &dyn GraphicsDevice,
        gbuffer: &GBuffer,
        config: &RenderConfig,
    ) -> Result<(), RendererError>;

    /// Per-frame extraction: scan the world, rebuild command queues,
    /// upload uniforms, publish outputs to the board.
    ///
    /// A pass missing its prerequisites (no camera, no light of its kind)
    /// records that it has nothing to do and returns `Ok` — a silent skip,
    /// recoverable next frame, never an error.
    fn begin_scene(
        &mut self,
        device: &dyn GraphicsDevice,
        world: &RenderWorld,
        board: &mut PassBoard,
    ) -> Result<(), RendererError>;

    /// Records this pass's commands for the frame.
    fn render_scene(&mut self, frame: &mut FrameContext<'_>) -> Result<(), RendererError>;

    /// Rebuilds size-dependent resources after the surface or G-buffer
    /// changed dimensions. Passes whose targets are resolution-independent
    /// (shadow maps) keep the default no-op.
    fn on_resize(
        &mut self,
        _device: &dyn GraphicsDevice,
        _gbuffer: &GBuffer,
        _extent: Extent2D,
    ) -> Result<(), RendererError> {
        Ok(())
    }

    /// Redirects output to an external texture (or back to the swapchain
    /// when `target` is `None`). Only passes that write the final color
    /// react to this.
    fn set_render_target(
        &mut self,
        _device: &dyn GraphicsDevice,
        _target: Option<RenderTarget>,
        _rebuild: bool,
    ) -> Result<(), RendererError> {
        Ok(())
    }

    /// Destroys the pass's GPU resources.
    fn destroy(&mut self, device: &dyn GraphicsDevice);
}
