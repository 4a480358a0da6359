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

//! # Vesper Render
//!
//! The deferred rendering pipeline of the Vesper engine: the shared
//! G-buffer, cascaded and omni-directional shadow passes, the deferred
//! off-screen and lighting passes, a batched debug line renderer, and
//! the render manager that sorts passes by their declared resource
//! dependencies and drives them each frame.
//!
//! Everything here talks to the GPU exclusively through the
//! [`vesper_core::gpu::GraphicsDevice`] contracts; no concrete graphics
//! API appears in this crate.

pub mod board;
pub mod cascade;
pub mod config;
pub mod debug;
pub mod deferred;
pub mod error;
pub mod gbuffer;
pub mod manager;
pub mod mesh;
pub mod omni;
pub mod renderer;
pub mod shaders;
pub mod shadow;
pub mod world;

pub use board::{CascadeShadowOutput, OmniShadowOutput, PassBoard};
pub use cascade::{compute_cascade_splits, compute_cascades, Cascade, SHADOW_CASCADES};
pub use config::{LightingSettings, OmniShadowSettings, RenderConfig, ShadowSettings};
pub use debug::DebugRenderer;
pub use deferred::{DeferredLightingRenderer, DeferredOffScreenRenderer};
pub use error::RendererError;
pub use gbuffer::{GBuffer, GBufferTarget};
pub use manager::RenderManager;
pub use mesh::{GpuMesh, MeshVertex, RenderCommand};
pub use omni::OmniShadowRenderer;
pub use renderer::{FrameContext, PassResource, Renderer, RenderTarget};
pub use shadow::CascadedShadowRenderer;
pub use world::{
    ExtractedCamera, ExtractedEnvironment, ExtractedLight, ExtractedMesh, RenderWorld,
};
