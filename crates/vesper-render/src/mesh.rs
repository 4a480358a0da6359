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

//! GPU mesh handles, vertex layouts, and per-draw render commands.

use vesper_core::error::ResourceError;
use vesper_core::gpu::{
    BufferDescriptor, BufferId, BufferUsage, DescriptorSetId, GraphicsDevice, IndexFormat,
    VertexAttribute, VertexBufferLayout, VertexFormat,
};
use vesper_core::math::Mat4;

/// The standard mesh vertex: position, normal, texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

/// The attributes of [`MeshVertex`], in shader-location order.
pub const MESH_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        location: 2,
    },
];

/// Returns the vertex buffer layout of [`MeshVertex`].
pub fn mesh_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        stride: std::mem::size_of::<MeshVertex>() as u32,
        attributes: &MESH_VERTEX_ATTRIBUTES,
    }
}

/// A full-screen-quad vertex: clip-space position and texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Clip-space XY position.
    pub position: [f32; 2],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

/// The attributes of [`QuadVertex`], in shader-location order.
pub const QUAD_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 8,
        location: 1,
    },
];

/// Returns the vertex buffer layout of [`QuadVertex`].
pub fn quad_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        stride: std::mem::size_of::<QuadVertex>() as u32,
        attributes: &QUAD_VERTEX_ATTRIBUTES,
    }
}

/// The GPU resources of an uploaded mesh.
///
/// Meshes arrive pre-uploaded from the asset pipeline; the renderer never
/// owns them and never decodes asset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuMesh {
    /// The vertex buffer.
    pub vertex_buffer: BufferId,
    /// The index buffer.
    pub index_buffer: BufferId,
    /// The number of indices to draw.
    pub index_count: u32,
    /// The index element width.
    pub index_format: IndexFormat,
}

/// A transient per-draw-call command.
///
/// Built once per frame per visible mesh during `begin_scene` and cleared
/// at the start of the next one. The mesh handle is non-owning.
#[derive(Debug, Clone, Copy)]
pub struct RenderCommand {
    /// The mesh to draw.
    pub mesh: GpuMesh,
    /// The world transform pushed to the vertex stage.
    pub transform: Mat4,
    /// The material descriptor set, if the mesh has one.
    pub material: Option<DescriptorSetId>,
}

/// Creates the full-screen quad used by the deferred lighting pass.
pub fn create_screen_quad(device: &dyn GraphicsDevice) -> Result<GpuMesh, ResourceError> {
    let vertices = [
        QuadVertex {
            position: [-1.0, -1.0],
            uv: [0.0, 1.0],
        },
        QuadVertex {
            position: [1.0, -1.0],
            uv: [1.0, 1.0],
        },
        QuadVertex {
            position: [1.0, 1.0],
            uv: [1.0, 0.0],
        },
        QuadVertex {
            position: [-1.0, 1.0],
            uv: [0.0, 0.0],
        },
    ];
    let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];

    let vertex_buffer = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("screen_quad_vertices"),
            size: std::mem::size_of_val(&vertices) as u64,
            usage: BufferUsage::VERTEX,
        },
        bytemuck::cast_slice(&vertices),
    )?;
    let index_buffer = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("screen_quad_indices"),
            size: std::mem::size_of_val(&indices) as u64,
            usage: BufferUsage::INDEX,
        },
        bytemuck::cast_slice(&indices),
    )?;

    Ok(GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
        index_format: IndexFormat::Uint16,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_vertex_layout_matches_struct_size() {
        let layout = mesh_vertex_layout();
        assert_eq!(layout.stride as usize, std::mem::size_of::<MeshVertex>());
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn quad_vertex_layout_matches_struct_size() {
        let layout = quad_vertex_layout();
        assert_eq!(layout.stride as usize, std::mem::size_of::<QuadVertex>());
    }
}
