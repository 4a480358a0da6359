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

//! # Vesper Core
//!
//! Foundational crate with the math primitives, the backend-agnostic GPU
//! contracts, and the core rendering types shared by the Vesper engine.
//!
//! Nothing in this crate talks to a concrete graphics API. The [`gpu`]
//! module defines the 'what' of rendering (descriptors, resource ids, the
//! [`gpu::GraphicsDevice`] trait); a backend crate implements the 'how'.

#![warn(missing_docs)]

pub mod error;
pub mod gpu;
pub mod graph;
pub mod light;
pub mod math;
pub mod task;

pub use error::{PipelineError, RenderError, ResourceError};
pub use gpu::{CommandEncoder, GraphicsDevice};
pub use light::{DirectionalLight, GpuLight, LightType, PointLight, SpotLight, MAX_LIGHTS};
