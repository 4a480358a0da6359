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

//! Pipeline descriptors and fixed-function state.

use crate::gpu::descriptor::DescriptorSetLayoutId;
use crate::gpu::pass::RenderPassId;
use crate::gpu::shader::{PushConstantRange, ShaderModuleId};

/// Which triangle faces are discarded before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling.
    #[default]
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    Back,
}

/// How polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Filled polygons.
    #[default]
    Fill,
    /// Wireframe edges.
    Line,
}

/// The primitive assembly topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Independent triangles.
    #[default]
    TriangleList,
    /// Independent line segments (debug rendering).
    LineList,
}

/// A depth/stencil comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    /// Never passes.
    Never,
    /// Passes when the new value is less than the stored one.
    Less,
    /// Passes when the new value is less than or equal to the stored one.
    LessEqual,
    /// Passes when the values are equal.
    Equal,
    /// Passes when the new value is greater than the stored one.
    Greater,
    /// Always passes.
    Always,
}

/// Depth testing, writing, and bias state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthState {
    /// Whether incoming fragments are depth-tested.
    pub test_enabled: bool,
    /// Whether passing fragments update the depth buffer.
    pub write_enabled: bool,
    /// The comparison applied when testing is enabled.
    pub compare: CompareFunction,
    /// Whether slope-scaled depth bias is applied (shadow-map passes).
    pub bias_enabled: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test_enabled: true,
            write_enabled: true,
            compare: CompareFunction::LessEqual,
            bias_enabled: false,
        }
    }
}

/// The data type of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
}

/// One attribute within a vertex buffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The attribute's data type.
    pub format: VertexFormat,
    /// The byte offset from the start of a vertex.
    pub offset: u32,
    /// The shader input location.
    pub location: u32,
}

/// The layout of a bound vertex buffer.
#[derive(Debug, Clone)]
pub struct VertexBufferLayout<'a> {
    /// The byte stride between consecutive vertices.
    pub stride: u32,
    /// The attributes read from each vertex.
    pub attributes: &'a [VertexAttribute],
}

/// A descriptor for creating a graphics pipeline.
///
/// A pipeline is **immutable** once created: changing the topology, the
/// shaders, or any fixed-function state means creating a new pipeline,
/// never mutating an existing one.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The vertex-stage shader module.
    pub vertex_shader: ShaderModuleId,
    /// The fragment-stage shader module, absent for depth-only passes.
    pub fragment_shader: Option<ShaderModuleId>,
    /// The render pass this pipeline draws within.
    pub render_pass: RenderPassId,
    /// The layout of vertex buffer slot 0.
    pub vertex_layout: VertexBufferLayout<'a>,
    /// The descriptor set layouts, in set order.
    pub descriptor_layouts: &'a [DescriptorSetLayoutId],
    /// The push-constant ranges writable while the pipeline is bound.
    pub push_constant_ranges: &'a [PushConstantRange],
    /// The primitive topology.
    pub topology: PrimitiveTopology,
    /// The face-culling mode.
    pub cull_mode: CullMode,
    /// The polygon rasterization mode.
    pub polygon_mode: PolygonMode,
    /// Whether alpha blending is enabled on color targets.
    pub transparency_enabled: bool,
    /// Depth test/write/bias state.
    pub depth: DepthState,
}

/// An opaque handle to an immutable graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub usize);
