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

//! The hierarchy of error types for the rendering subsystem.
//!
//! Resource-creation failures are programming errors in renderer wiring
//! (mismatched attachments, descriptor layouts) and surface at creation
//! time; they are never recovered at runtime. Frame-level conditions like
//! a missing light are *not* errors — renderers skip their work instead.

use std::fmt;

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The requested resource does not exist.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A framebuffer attachment does not match the render pass it targets.
    ///
    /// Attachment count, per-slot format, and per-slot kind must all match
    /// exactly; anything else is undefined behavior at the GPU-API level.
    AttachmentMismatch {
        /// The attachment slot that failed validation, or the count check.
        index: usize,
        /// What was expected versus what was provided.
        details: String,
    },
    /// A descriptor write does not match the set's layout.
    LayoutMismatch {
        /// The binding index that failed validation.
        binding: u32,
        /// What was expected versus what was provided.
        details: String,
    },
    /// A push-constant write fell outside every declared range.
    PushConstantOutOfRange {
        /// The byte offset of the rejected write.
        offset: u32,
        /// The byte size of the rejected write.
        size: u32,
    },
    /// An error originating from the concrete graphics backend.
    Backend(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::AttachmentMismatch { index, details } => {
                write!(f, "Framebuffer attachment {index} mismatch: {details}")
            }
            ResourceError::LayoutMismatch { binding, details } => {
                write!(f, "Descriptor binding {binding} mismatch: {details}")
            }
            ResourceError::PushConstantOutOfRange { offset, size } => {
                write!(
                    f,
                    "Push-constant write of {size} bytes at offset {offset} is outside every declared range"
                )
            }
            ResourceError::Backend(msg) => write!(f, "Backend resource error: {msg}"),
        }
    }
}

impl std::error::Error for ResourceError {}

/// An error related to the creation of a graphics pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// The backend failed to compile the pipeline state object.
    CompilationFailed {
        /// A descriptive label for the pipeline, if available.
        label: Option<String>,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// A shader module referenced by the pipeline was invalid or missing.
    InvalidShaderModule {
        /// The label of the pipeline being created.
        pipeline_label: Option<String>,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::CompilationFailed { label, details } => {
                write!(
                    f,
                    "Pipeline compilation failed for '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    details
                )
            }
            PipelineError::InvalidShaderModule { pipeline_label } => {
                write!(
                    f,
                    "Invalid shader module for pipeline '{}'",
                    pipeline_label.as_deref().unwrap_or("Unknown")
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Backend(err.to_string())
    }
}

/// A high-level error from the rendering system or graphics device.
#[derive(Debug)]
pub enum RenderError {
    /// An operation was attempted before the rendering system was initialized.
    NotInitialized,
    /// A failure occurred while initializing the graphics backend.
    InitializationFailed(String),
    /// Failed to acquire the next swapchain image for rendering.
    SurfaceAcquisitionFailed(String),
    /// An error occurred while managing a GPU resource.
    Resource(ResourceError),
    /// The graphics device was lost and must be reinitialized.
    DeviceLost,
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "The rendering system is not initialized.")
            }
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::DeviceLost => {
                write!(f, "The graphics device was lost and needs to be reinitialized.")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn attachment_mismatch_display() {
        let err = ResourceError::AttachmentMismatch {
            index: 2,
            details: "expected Rgba16Float, got Rgba8Unorm".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Framebuffer attachment 2 mismatch: expected Rgba16Float, got Rgba8Unorm"
        );
    }

    #[test]
    fn render_error_wraps_resource_error() {
        let res_err = ResourceError::InvalidHandle;
        let render_err: RenderError = res_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Invalid resource handle or ID."
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn pipeline_error_display_without_label() {
        let err = PipelineError::CompilationFailed {
            label: None,
            details: "stage mismatch".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Pipeline compilation failed for 'Unknown': stage mismatch"
        );
    }
}
