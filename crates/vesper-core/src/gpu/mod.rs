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

//! The backend-agnostic GPU contracts.
//!
//! This module defines the "common language" for all rendering operations:
//! descriptors and opaque ids for every GPU resource, plus the
//! [`GraphicsDevice`] and [`CommandEncoder`] traits a concrete backend
//! implements. The rendering pipeline crate consumes only these types and
//! never calls a specific graphics API.

pub mod buffer;
pub mod descriptor;
pub mod device;
pub mod encoder;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub use self::buffer::{BufferDescriptor, BufferId, BufferUsage, IndexFormat};
pub use self::descriptor::{
    validate_writes, DescriptorBinding, DescriptorResource, DescriptorSetId,
    DescriptorSetLayoutDescriptor, DescriptorSetLayoutId, DescriptorType, DescriptorWrite,
};
pub use self::device::GraphicsDevice;
pub use self::encoder::{CommandBufferId, CommandEncoder, RenderPassBegin, RenderPassRecorder};
pub use self::pass::{
    AttachmentDescription, AttachmentKind, FramebufferAttachment, FramebufferDescriptor,
    FramebufferId, LoadOp, RenderPassDescriptor, RenderPassId,
};
pub use self::pipeline::{
    CompareFunction, CullMode, DepthState, PipelineDescriptor, PipelineId, PolygonMode,
    PrimitiveTopology, VertexAttribute, VertexBufferLayout, VertexFormat,
};
pub use self::shader::{
    PushConstantRange, ShaderModuleDescriptor, ShaderModuleId, ShaderSource, ShaderStage,
    ShaderStageFlags,
};
pub use self::texture::{
    AddressMode, FilterMode, ImageCopy, SamplerDescriptor, SamplerId, TextureDescriptor,
    TextureDimension, TextureFormat, TextureId, TextureUsage, TextureViewDescriptor, TextureViewId,
};
