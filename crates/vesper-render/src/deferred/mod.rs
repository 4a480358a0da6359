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

//! The deferred rendering pair.
//!
//! [`DeferredOffScreenRenderer`] rasterizes all opaque geometry into the
//! G-buffer; [`DeferredLightingRenderer`] then shades a full-screen quad
//! from the G-buffer, the shadow maps, the packed light list, and the
//! optional IBL environment.

mod lighting;
mod offscreen;

pub use lighting::{pack_lights, DeferredLightingRenderer};
pub use offscreen::DeferredOffScreenRenderer;
