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

//! Errors produced by the rendering pipeline.

use crate::renderer::PassResource;
use vesper_core::error::{RenderError, ResourceError};
use vesper_core::graph::CycleError;

/// An error raised while building or driving the rendering pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// A pass consumes a resource no registered pass produces.
    ///
    /// Raised at pipeline-build time, turning a mis-registration that
    /// would otherwise be a silent visual bug into a hard error.
    #[error("pass '{consumer}' consumes {resource:?} but no registered pass produces it")]
    MissingProducer {
        /// The resource nobody produces.
        resource: PassResource,
        /// The pass that wanted it.
        consumer: &'static str,
    },

    /// Two passes claim to produce the same resource.
    #[error("both '{first}' and '{second}' produce {resource:?}")]
    DuplicateProducer {
        /// The doubly-produced resource.
        resource: PassResource,
        /// The pass registered first.
        first: &'static str,
        /// The pass registered second.
        second: &'static str,
    },

    /// The declared pass dependencies form a cycle.
    #[error("pass dependencies form a cycle")]
    DependencyCycle(#[from] CycleError),

    /// A GPU resource operation failed.
    #[error("graphics resource error: {0}")]
    Resource(#[from] ResourceError),

    /// A frame-level device operation failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The render manager was driven before `init`.
    #[error("render manager is not initialized")]
    NotInitialized,
}
