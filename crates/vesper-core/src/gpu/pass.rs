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

//! Persistent render-pass and framebuffer objects.
//!
//! Unlike transient per-encoder pass descriptors, a render pass here is a
//! long-lived object describing attachment formats and clear behavior;
//! framebuffers are created *against* a pass and must match it exactly.
//! [`FramebufferDescriptor::validate_against`] performs that check without
//! a device, so backends and tests share one implementation.

use crate::error::ResourceError;
use crate::gpu::texture::{TextureFormat, TextureViewId};
use crate::math::Extent2D;

/// What an attachment slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// A color target.
    Color,
    /// A depth target.
    Depth,
}

/// What happens to an attachment's contents when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Clear to the value supplied when the pass is begun.
    Clear,
    /// Preserve the existing contents.
    Load,
}

/// One attachment slot of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDescription {
    /// The pixel format every compatible framebuffer must provide here.
    pub format: TextureFormat,
    /// Whether the slot holds color or depth.
    pub kind: AttachmentKind,
    /// The begin-of-pass behavior for the slot.
    pub load_op: LoadOp,
}

impl AttachmentDescription {
    /// A color attachment cleared at the start of the pass.
    #[inline]
    pub const fn color(format: TextureFormat) -> Self {
        Self {
            format,
            kind: AttachmentKind::Color,
            load_op: LoadOp::Clear,
        }
    }

    /// A depth attachment cleared at the start of the pass.
    #[inline]
    pub const fn depth(format: TextureFormat) -> Self {
        Self {
            format,
            kind: AttachmentKind::Depth,
            load_op: LoadOp::Clear,
        }
    }

    /// Switches the attachment to load (preserve) its previous contents.
    #[inline]
    pub const fn preserve(mut self) -> Self {
        self.load_op = LoadOp::Load;
        self
    }
}

/// A descriptor for creating a render pass.
#[derive(Debug, Clone)]
pub struct RenderPassDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The ordered attachment slots of the pass.
    pub attachments: &'a [AttachmentDescription],
}

/// An opaque handle to a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassId(pub usize);

/// One concrete attachment bound into a framebuffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferAttachment {
    /// The texture view to render into.
    pub view: TextureViewId,
    /// The format of the view. Must equal the pass slot's format.
    pub format: TextureFormat,
    /// The kind of the view. Must equal the pass slot's kind.
    pub kind: AttachmentKind,
}

/// A descriptor for creating a framebuffer against a render pass.
#[derive(Debug, Clone)]
pub struct FramebufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The pass this framebuffer is compatible with.
    pub render_pass: RenderPassId,
    /// The concrete attachments, in the pass's slot order.
    pub attachments: &'a [FramebufferAttachment],
    /// The dimensions shared by every attachment.
    pub extent: Extent2D,
    /// The array layer the attachments target (cascade index for
    /// depth-array shadow maps, 0 otherwise).
    pub layer: u32,
}

impl FramebufferDescriptor<'_> {
    /// Validates this framebuffer against the pass it claims compatibility
    /// with.
    ///
    /// Attachment count, per-slot format, and per-slot kind must match
    /// exactly; a mismatch is a wiring error that would be undefined
    /// behavior at the GPU-API level, reported as
    /// [`ResourceError::AttachmentMismatch`].
    pub fn validate_against(&self, pass: &RenderPassDescriptor<'_>) -> Result<(), ResourceError> {
        if self.attachments.len() != pass.attachments.len() {
            return Err(ResourceError::AttachmentMismatch {
                index: self.attachments.len().min(pass.attachments.len()),
                details: format!(
                    "render pass declares {} attachments, framebuffer provides {}",
                    pass.attachments.len(),
                    self.attachments.len()
                ),
            });
        }
        for (index, (bound, declared)) in self
            .attachments
            .iter()
            .zip(pass.attachments.iter())
            .enumerate()
        {
            if bound.format != declared.format {
                return Err(ResourceError::AttachmentMismatch {
                    index,
                    details: format!(
                        "expected format {:?}, got {:?}",
                        declared.format, bound.format
                    ),
                });
            }
            if bound.kind != declared.kind {
                return Err(ResourceError::AttachmentMismatch {
                    index,
                    details: format!("expected {:?} attachment, got {:?}", declared.kind, bound.kind),
                });
            }
        }
        Ok(())
    }
}

/// An opaque handle to a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn pass_attachments() -> [AttachmentDescription; 2] {
        [
            AttachmentDescription::color(TextureFormat::Rgba8Unorm),
            AttachmentDescription::depth(TextureFormat::Depth32Float),
        ]
    }

    #[test]
    fn matching_framebuffer_validates() {
        let attachments = pass_attachments();
        let pass = RenderPassDescriptor {
            label: None,
            attachments: &attachments,
        };
        let bound = [
            FramebufferAttachment {
                view: TextureViewId(1),
                format: TextureFormat::Rgba8Unorm,
                kind: AttachmentKind::Color,
            },
            FramebufferAttachment {
                view: TextureViewId(2),
                format: TextureFormat::Depth32Float,
                kind: AttachmentKind::Depth,
            },
        ];
        let fb = FramebufferDescriptor {
            label: None,
            render_pass: RenderPassId(0),
            attachments: &bound,
            extent: Extent2D::new(64, 64),
            layer: 0,
        };
        assert!(fb.validate_against(&pass).is_ok());
    }

    #[test]
    fn attachment_count_mismatch_is_rejected() {
        let attachments = pass_attachments();
        let pass = RenderPassDescriptor {
            label: None,
            attachments: &attachments,
        };
        let bound = [FramebufferAttachment {
            view: TextureViewId(1),
            format: TextureFormat::Rgba8Unorm,
            kind: AttachmentKind::Color,
        }];
        let fb = FramebufferDescriptor {
            label: None,
            render_pass: RenderPassId(0),
            attachments: &bound,
            extent: Extent2D::new(64, 64),
            layer: 0,
        };
        assert!(matches!(
            fb.validate_against(&pass),
            Err(ResourceError::AttachmentMismatch { .. })
        ));
    }

    #[test]
    fn format_mismatch_names_the_slot() {
        let attachments = pass_attachments();
        let pass = RenderPassDescriptor {
            label: None,
            attachments: &attachments,
        };
        let bound = [
            FramebufferAttachment {
                view: TextureViewId(1),
                format: TextureFormat::Rgba16Float,
                kind: AttachmentKind::Color,
            },
            FramebufferAttachment {
                view: TextureViewId(2),
                format: TextureFormat::Depth32Float,
                kind: AttachmentKind::Depth,
            },
        ];
        let fb = FramebufferDescriptor {
            label: None,
            render_pass: RenderPassId(0),
            attachments: &bound,
            extent: Extent2D::new(64, 64),
            layer: 0,
        };
        match fb.validate_against(&pass) {
            Err(ResourceError::AttachmentMismatch { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected attachment mismatch, got {other:?}"),
        }
    }
}
