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

//! Texture, texture-view, and sampler descriptors.

use crate::gpu::pipeline::CompareFunction;
use crate::math::{Extent3D, Origin3D};

/// The pixel format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit-per-channel RGBA, unsigned normalized.
    Rgba8Unorm,
    /// 8-bit-per-channel BGRA, unsigned normalized (common surface format).
    Bgra8Unorm,
    /// 16-bit-per-channel floating-point RGBA, for HDR intermediate targets.
    Rgba16Float,
    /// 32-bit floating-point depth.
    Depth32Float,
}

impl TextureFormat {
    /// Returns `true` when the format stores depth rather than color.
    #[inline]
    pub const fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float)
    }
}

/// The dimensionality of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// A standard two-dimensional texture.
    D2,
    /// A two-dimensional texture array (one layer per slice).
    D2Array,
    /// A cube texture (exactly six layers, one per face).
    Cube,
}

/// Usage flags describing how a texture may be bound.
///
/// Combined with bitwise-or style composition through [`union`](Self::union).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUsage {
    bits: u32,
}

impl TextureUsage {
    /// Usable as a color render-pass attachment.
    pub const COLOR_ATTACHMENT: Self = Self { bits: 1 << 0 };
    /// Usable as a depth render-pass attachment.
    pub const DEPTH_ATTACHMENT: Self = Self { bits: 1 << 1 };
    /// Usable as a sampled texture in shaders.
    pub const SAMPLED: Self = Self { bits: 1 << 2 };
    /// Usable as the source of a copy operation.
    pub const COPY_SRC: Self = Self { bits: 1 << 3 };
    /// Usable as the destination of a copy or write operation.
    pub const COPY_DST: Self = Self { bits: 1 << 4 };

    /// Returns the union of two usage sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` when all flags in `other` are present in `self`.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl std::ops::BitOr for TextureUsage {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A descriptor for creating a texture.
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The size of the texture; `depth_or_array_layers` is the layer count
    /// for array and cube textures (six for a cube).
    pub extent: Extent3D,
    /// The dimensionality of the texture.
    pub dimension: TextureDimension,
    /// The pixel format.
    pub format: TextureFormat,
    /// How the texture may be bound.
    pub usage: TextureUsage,
    /// The number of mip levels.
    pub mip_level_count: u32,
}

/// A descriptor for creating a view into a texture.
#[derive(Debug, Clone)]
pub struct TextureViewDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The dimensionality the view exposes to shaders and attachments.
    pub dimension: TextureDimension,
    /// The first array layer visible through the view.
    pub base_array_layer: u32,
    /// The number of array layers visible through the view.
    pub array_layer_count: u32,
}

impl Default for TextureViewDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            dimension: TextureDimension::D2,
            base_array_layer: 0,
            array_layer_count: 1,
        }
    }
}

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Linear interpolation between texels.
    Linear,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Clamp coordinates to the edge texel.
    ClampToEdge,
    /// Repeat the texture.
    Repeat,
}

/// A descriptor for creating a sampler.
#[derive(Debug, Clone)]
pub struct SamplerDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// Minification/magnification filtering.
    pub filter: FilterMode,
    /// Addressing for all three coordinate axes.
    pub address_mode: AddressMode,
    /// When set, the sampler is a comparison sampler (shadow PCF).
    pub compare: Option<CompareFunction>,
}

impl Default for SamplerDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
            compare: None,
        }
    }
}

/// An opaque handle to a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a texture view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureViewId(pub usize);

/// An opaque handle to a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerId(pub usize);

/// One side of a texture-to-texture copy.
#[derive(Debug, Clone, Copy)]
pub struct ImageCopy {
    /// The texture involved in the copy.
    pub texture: TextureId,
    /// The mip level to copy from/to.
    pub mip_level: u32,
    /// The texel offset within the mip level.
    pub origin: Origin3D,
    /// The array layer (cube face) to copy from/to.
    pub array_layer: u32,
}

impl ImageCopy {
    /// A copy view of layer 0, mip 0, origin zero.
    #[inline]
    pub fn base(texture: TextureId) -> Self {
        Self {
            texture,
            mip_level: 0,
            origin: Origin3D::default(),
            array_layer: 0,
        }
    }

    /// A copy view of the given array layer (cube face) at mip 0.
    #[inline]
    pub fn layer(texture: TextureId, array_layer: u32) -> Self {
        Self {
            texture,
            mip_level: 0,
            origin: Origin3D::default(),
            array_layer,
        }
    }
}
