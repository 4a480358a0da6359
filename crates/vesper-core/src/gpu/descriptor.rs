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

//! Descriptor sets: the binding of buffers and textures to shader slots.
//!
//! Binding indices, types, and stage flags supplied at update time must
//! match the set's layout exactly; [`validate_writes`] performs that check
//! without a device so backends and tests share one implementation.

use crate::error::ResourceError;
use crate::gpu::buffer::BufferId;
use crate::gpu::shader::ShaderStageFlags;
use crate::gpu::texture::{SamplerId, TextureViewId};

/// The type of resource a descriptor binding holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// A uniform buffer range.
    UniformBuffer,
    /// A sampled texture paired with a sampler.
    CombinedImageSampler,
}

/// One binding slot within a descriptor set layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBinding {
    /// The binding index, matching the shader's declared slot.
    pub binding: u32,
    /// The kind of resource bound here.
    pub ty: DescriptorType,
    /// The stages that can read the binding.
    pub stages: ShaderStageFlags,
}

/// A descriptor for creating a descriptor set layout.
#[derive(Debug, Clone)]
pub struct DescriptorSetLayoutDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The binding slots of the layout.
    pub bindings: &'a [DescriptorBinding],
}

/// An opaque handle to a descriptor set layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetLayoutId(pub usize);

/// An opaque handle to a descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetId(pub usize);

/// The resource supplied by one descriptor write.
#[derive(Debug, Clone, Copy)]
pub enum DescriptorResource {
    /// A uniform buffer range.
    Buffer {
        /// The buffer bound to the slot.
        buffer: BufferId,
        /// The byte offset of the bound range.
        offset: u64,
        /// The byte size of the bound range.
        size: u64,
    },
    /// A sampled texture view paired with a sampler.
    Texture {
        /// The view bound to the slot.
        view: TextureViewId,
        /// The sampler used to read it.
        sampler: SamplerId,
    },
}

/// One write into a descriptor set.
///
/// The `binding`, `ty`, and `stages` fields restate the slot's expected
/// layout; the restatement is validated against the actual layout so that
/// a renderer/shader disagreement fails loudly at update time instead of
/// rendering garbage.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorWrite {
    /// The binding index to write.
    pub binding: u32,
    /// The expected type of the slot.
    pub ty: DescriptorType,
    /// The expected stage visibility of the slot.
    pub stages: ShaderStageFlags,
    /// The resource to bind.
    pub resource: DescriptorResource,
}

impl DescriptorWrite {
    /// A uniform-buffer write covering `size` bytes from offset 0.
    #[inline]
    pub fn uniform(binding: u32, stages: ShaderStageFlags, buffer: BufferId, size: u64) -> Self {
        Self {
            binding,
            ty: DescriptorType::UniformBuffer,
            stages,
            resource: DescriptorResource::Buffer {
                buffer,
                offset: 0,
                size,
            },
        }
    }

    /// A combined image/sampler write.
    #[inline]
    pub fn texture(
        binding: u32,
        stages: ShaderStageFlags,
        view: TextureViewId,
        sampler: SamplerId,
    ) -> Self {
        Self {
            binding,
            ty: DescriptorType::CombinedImageSampler,
            stages,
            resource: DescriptorResource::Texture { view, sampler },
        }
    }
}

/// Validates descriptor writes against a layout's binding slots.
///
/// Every write must name a binding that exists in the layout with the same
/// type and stage flags, and its resource variant must agree with the
/// declared type. Returns [`ResourceError::LayoutMismatch`] naming the
/// first offending binding.
pub fn validate_writes(
    bindings: &[DescriptorBinding],
    writes: &[DescriptorWrite],
) -> Result<(), ResourceError> {
    for write in writes {
        let Some(slot) = bindings.iter().find(|b| b.binding == write.binding) else {
            return Err(ResourceError::LayoutMismatch {
                binding: write.binding,
                details: "binding is not declared in the layout".to_string(),
            });
        };
        if slot.ty != write.ty {
            return Err(ResourceError::LayoutMismatch {
                binding: write.binding,
                details: format!("layout declares {:?}, write provides {:?}", slot.ty, write.ty),
            });
        }
        if slot.stages != write.stages {
            return Err(ResourceError::LayoutMismatch {
                binding: write.binding,
                details: format!(
                    "layout declares stages {:?}, write provides {:?}",
                    slot.stages, write.stages
                ),
            });
        }
        let resource_matches = matches!(
            (write.ty, &write.resource),
            (DescriptorType::UniformBuffer, DescriptorResource::Buffer { .. })
                | (
                    DescriptorType::CombinedImageSampler,
                    DescriptorResource::Texture { .. }
                )
        );
        if !resource_matches {
            return Err(ResourceError::LayoutMismatch {
                binding: write.binding,
                details: "resource variant does not match the declared type".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<DescriptorBinding> {
        vec![
            DescriptorBinding {
                binding: 0,
                ty: DescriptorType::UniformBuffer,
                stages: ShaderStageFlags::VERTEX,
            },
            DescriptorBinding {
                binding: 1,
                ty: DescriptorType::CombinedImageSampler,
                stages: ShaderStageFlags::FRAGMENT,
            },
        ]
    }

    #[test]
    fn matching_writes_validate() {
        let writes = [
            DescriptorWrite::uniform(0, ShaderStageFlags::VERTEX, BufferId(7), 256),
            DescriptorWrite::texture(1, ShaderStageFlags::FRAGMENT, TextureViewId(3), SamplerId(1)),
        ];
        assert!(validate_writes(&layout(), &writes).is_ok());
    }

    #[test]
    fn undeclared_binding_is_rejected() {
        let writes = [DescriptorWrite::uniform(
            5,
            ShaderStageFlags::VERTEX,
            BufferId(7),
            256,
        )];
        assert!(matches!(
            validate_writes(&layout(), &writes),
            Err(ResourceError::LayoutMismatch { binding: 5, .. })
        ));
    }

    #[test]
    fn stage_mismatch_is_rejected() {
        let writes = [DescriptorWrite::uniform(
            0,
            ShaderStageFlags::FRAGMENT,
            BufferId(7),
            256,
        )];
        assert!(matches!(
            validate_writes(&layout(), &writes),
            Err(ResourceError::LayoutMismatch { binding: 0, .. })
        ));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let writes = [DescriptorWrite::texture(
            0,
            ShaderStageFlags::VERTEX,
            TextureViewId(3),
            SamplerId(1),
        )];
        assert!(matches!(
            validate_writes(&layout(), &writes),
            Err(ResourceError::LayoutMismatch { binding: 0, .. })
        ));
    }
}
