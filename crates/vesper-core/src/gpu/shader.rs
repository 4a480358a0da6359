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

//! Shader modules, stage flags, and push-constant ranges.

use std::borrow::Cow;

/// A single programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex stage.
    Vertex,
    /// The fragment stage.
    Fragment,
}

/// Flags representing which shader stages can access a resource binding
/// or push-constant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderStageFlags {
    bits: u32,
}

impl ShaderStageFlags {
    /// No shader stages.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex shader stage.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// Fragment shader stage.
    pub const FRAGMENT: Self = Self { bits: 1 << 1 };
    /// Vertex and fragment stages.
    pub const VERTEX_FRAGMENT: Self = Self {
        bits: Self::VERTEX.bits | Self::FRAGMENT.bits,
    };

    /// Creates flags from a single shader stage.
    #[inline]
    pub const fn from_stage(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => Self::VERTEX,
            ShaderStage::Fragment => Self::FRAGMENT,
        }
    }

    /// Returns the union of two flag sets.
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

impl std::ops::BitOr for ShaderStageFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// The source code or bytecode of a shader module.
#[derive(Debug, Clone)]
pub enum ShaderSource<'a> {
    /// SPIR-V bytecode.
    SpirV(Cow<'a, [u32]>),
    /// Vulkan-flavored GLSL source text, compiled by the backend.
    Glsl(Cow<'a, str>),
    /// WGSL source text.
    Wgsl(Cow<'a, str>),
}

/// A descriptor for creating a shader module.
#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The stage this module implements.
    pub stage: ShaderStage,
    /// The module's source.
    pub source: ShaderSource<'a>,
}

/// An opaque handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderModuleId(pub usize);

/// A push-constant range declared on a pipeline.
///
/// Every [`set_push_constants`] call must fall inside one of the pipeline's
/// declared ranges; writes outside are rejected at record time. Renderers
/// populate ranges from `#[repr(C)]` structs via `bytemuck::bytes_of`, which
/// keeps the byte contract with the shader statically sized on the Rust side.
///
/// [`set_push_constants`]: crate::gpu::RenderPassRecorder::set_push_constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantRange {
    /// The stages that can read the range.
    pub stages: ShaderStageFlags,
    /// The byte offset of the range.
    pub offset: u32,
    /// The byte size of the range.
    pub size: u32,
}

impl PushConstantRange {
    /// Returns `true` when a write of `size` bytes at `offset`, visible to
    /// `stages`, fits entirely inside this range.
    #[inline]
    pub fn admits(&self, stages: ShaderStageFlags, offset: u32, size: u32) -> bool {
        self.stages.contains(stages)
            && offset >= self.offset
            && offset + size <= self.offset + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_flags_union_and_contains() {
        let both = ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT;
        assert!(both.contains(ShaderStageFlags::VERTEX));
        assert!(both.contains(ShaderStageFlags::FRAGMENT));
        assert!(!ShaderStageFlags::VERTEX.contains(both));
    }

    #[test]
    fn push_constant_range_admits_exact_and_interior_writes() {
        let range = PushConstantRange {
            stages: ShaderStageFlags::VERTEX,
            offset: 0,
            size: 80,
        };
        assert!(range.admits(ShaderStageFlags::VERTEX, 0, 80));
        assert!(range.admits(ShaderStageFlags::VERTEX, 64, 16));
        assert!(!range.admits(ShaderStageFlags::VERTEX, 64, 32));
        assert!(!range.admits(ShaderStageFlags::FRAGMENT, 0, 16));
    }
}
