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

//! The shared geometry buffer (G-buffer).
//!
//! One set of intermediate render targets written by the deferred
//! off-screen pass and sampled by the lighting pass. Every target always
//! has identical dimensions; resizing destroys and recreates all of them
//! in one step, and the render manager rebuilds dependent framebuffers in
//! the same resize call.

use vesper_core::error::ResourceError;
use vesper_core::gpu::{
    GraphicsDevice, TextureDescriptor, TextureDimension, TextureFormat, TextureId, TextureUsage,
    TextureViewDescriptor, TextureViewId,
};
use vesper_core::math::{Extent2D, Extent3D};

/// The named targets of the G-buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GBufferTarget {
    /// The scene depth buffer.
    Depth,
    /// Albedo color.
    Color,
    /// World-space positions.
    Position,
    /// World-space normals.
    Normals,
    /// Packed PBR parameters (metallic, roughness, ao, emissive).
    Pbr,
}

/// The color targets, in attachment-slot order for the off-screen pass.
pub const GBUFFER_COLOR_TARGETS: [GBufferTarget; 4] = [
    GBufferTarget::Color,
    GBufferTarget::Position,
    GBufferTarget::Normals,
    GBufferTarget::Pbr,
];

struct Target {
    texture: TextureId,
    view: TextureViewId,
    format: TextureFormat,
}

/// The shared set of intermediate render targets.
pub struct GBuffer {
    depth: Target,
    color: Target,
    position: Target,
    normals: Target,
    pbr: Target,
    extent: Extent2D,
}

impl GBuffer {
    /// Creates the G-buffer at the given resolution.
    pub fn new(device: &dyn GraphicsDevice, extent: Extent2D) -> Result<Self, ResourceError> {
        Ok(Self {
            depth: Self::create_target(device, "gbuffer_depth", TextureFormat::Depth32Float, extent)?,
            color: Self::create_target(device, "gbuffer_color", TextureFormat::Rgba8Unorm, extent)?,
            position: Self::create_target(
                device,
                "gbuffer_position",
                TextureFormat::Rgba16Float,
                extent,
            )?,
            normals: Self::create_target(
                device,
                "gbuffer_normals",
                TextureFormat::Rgba16Float,
                extent,
            )?,
            pbr: Self::create_target(device, "gbuffer_pbr", TextureFormat::Rgba16Float, extent)?,
            extent,
        })
    }

    /// The current width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.extent.width
    }

    /// The current height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.extent.height
    }

    /// The current dimensions.
    #[inline]
    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    /// Returns the view of a target.
    pub fn view(&self, target: GBufferTarget) -> TextureViewId {
        self.target(target).view
    }

    /// Returns the format of a target.
    pub fn format(&self, target: GBufferTarget) -> TextureFormat {
        self.target(target).format
    }

    /// Destroys and recreates every target at the new resolution.
    ///
    /// The caller must ensure the GPU is idle first; the render manager
    /// does a device wait before invoking this.
    pub fn resize(
        &mut self,
        device: &dyn GraphicsDevice,
        extent: Extent2D,
    ) -> Result<(), ResourceError> {
        self.destroy(device);
        *self = Self::new(device, extent)?;
        Ok(())
    }

    /// Destroys every target.
    pub fn destroy(&mut self, device: &dyn GraphicsDevice) {
        for target in [
            &self.depth,
            &self.color,
            &self.position,
            &self.normals,
            &self.pbr,
        ] {
            if let Err(e) = device.destroy_texture_view(target.view) {
                log::warn!("GBuffer: failed to destroy view: {e}");
            }
            if let Err(e) = device.destroy_texture(target.texture) {
                log::warn!("GBuffer: failed to destroy texture: {e}");
            }
        }
    }

    fn target(&self, target: GBufferTarget) -> &Target {
        match target {
            GBufferTarget::Depth => &self.depth,
            GBufferTarget::Color => &self.color,
            GBufferTarget::Position => &self.position,
            GBufferTarget::Normals => &self.normals,
            GBufferTarget::Pbr => &self.pbr,
        }
    }

    fn create_target(
        device: &dyn GraphicsDevice,
        label: &str,
        format: TextureFormat,
        extent: Extent2D,
    ) -> Result<Target, ResourceError> {
        let attachment_usage = if format.is_depth() {
            TextureUsage::DEPTH_ATTACHMENT
        } else {
            TextureUsage::COLOR_ATTACHMENT
        };
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            extent: Extent3D::new(extent.width, extent.height, 1),
            dimension: TextureDimension::D2,
            format,
            usage: attachment_usage | TextureUsage::SAMPLED,
            mip_level_count: 1,
        })?;
        let view = device.create_texture_view(
            texture,
            &TextureViewDescriptor {
                label: Some(label),
                ..Default::default()
            },
        )?;
        Ok(Target {
            texture,
            view,
            format,
        })
    }
}

impl std::fmt::Debug for GBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GBuffer")
            .field("width", &self.extent.width)
            .field("height", &self.extent.height)
            .finish()
    }
}
