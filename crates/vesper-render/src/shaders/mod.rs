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

//! Embedded GLSL sources for the pipeline's passes.
//!
//! The binding layouts declared here are mirrored by the `#[repr(C)]`
//! uniform and push-constant structs in each pass module; changing one
//! side means changing the other.

/// Depth-only vertex shader for the cascaded shadow pass.
pub const SHADOW_VERT: &str = include_str!("shadow.vert");

/// Vertex shader for the omni (cube face) shadow pass.
pub const OMNI_VERT: &str = include_str!("omni.vert");
/// Fragment shader writing normalized light distance for the omni pass.
pub const OMNI_FRAG: &str = include_str!("omni.frag");

/// Vertex shader for the deferred off-screen (G-buffer fill) pass.
pub const GBUFFER_VERT: &str = include_str!("gbuffer.vert");
/// Fragment shader writing the G-buffer attachments.
pub const GBUFFER_FRAG: &str = include_str!("gbuffer.frag");

/// Full-screen-quad vertex shader for the lighting pass.
pub const LIGHTING_VERT: &str = include_str!("lighting.vert");
/// Fragment shader combining G-buffer, shadows, lights, and IBL.
pub const LIGHTING_FRAG: &str = include_str!("lighting.frag");

/// Vertex shader for batched debug lines.
pub const LINE_VERT: &str = include_str!("line.vert");
/// Fragment shader for batched debug lines.
pub const LINE_FRAG: &str = include_str!("line.frag");
