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

//! The per-frame pass board.
//!
//! Producer passes publish their frame outputs (shadow map views, light
//! matrices) here; consumer passes read them during their own
//! `begin_scene`. The board is a typed key→value map keyed by concrete
//! type, cleared by the render manager at the start of every frame.
//! Values are owned — the board never erases lifetimes.

use crate::cascade::SHADOW_CASCADES;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use vesper_core::gpu::TextureViewId;
use vesper_core::math::{Mat4, Vec3};

/// A type-keyed map of per-frame pass outputs.
#[derive(Default)]
pub struct PassBoard {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PassBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a value, replacing any previous value of the same type.
    pub fn publish<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Reads a published value by type.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries.get(&TypeId::of::<T>())?.downcast_ref()
    }

    /// Returns `true` when a value of the given type has been published.
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Removes all published values, readying the board for a new frame.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for PassBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassBoard")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// The cascaded shadow renderer's published frame output.
#[derive(Debug, Clone, Copy)]
pub struct CascadeShadowOutput {
    /// The depth-array view over all cascade layers.
    pub shadow_map: TextureViewId,
    /// Per-cascade light-space projection-view matrices.
    pub proj_view: [Mat4; SHADOW_CASCADES],
    /// Per-cascade view-space split depths (negative, view looks down -Z).
    pub split_depths: [f32; SHADOW_CASCADES],
    /// The first cascade's light view matrix.
    pub light_view: Mat4,
    /// The depth bias consumers should sample with.
    pub bias: f32,
    /// The apparent light size for the softening filter.
    pub light_size: f32,
    /// Whether a directional light was found this frame.
    pub has_light: bool,
}

/// The omni shadow renderer's published frame output.
#[derive(Debug, Clone, Copy)]
pub struct OmniShadowOutput {
    /// The cube-map view.
    pub shadow_cube: TextureViewId,
    /// The point light's world position.
    pub light_position: Vec3,
    /// The light radius (cube far plane).
    pub radius: f32,
    /// Whether a point light was found this frame.
    pub has_light: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_then_get() {
        let mut board = PassBoard::new();
        board.publish(OmniShadowOutput {
            shadow_cube: TextureViewId(9),
            light_position: Vec3::ZERO,
            radius: 50.0,
            has_light: true,
        });
        let output = board.get::<OmniShadowOutput>().unwrap();
        assert_eq!(output.shadow_cube, TextureViewId(9));
        assert!(!board.contains::<CascadeShadowOutput>());
    }

    #[test]
    fn clear_removes_everything() {
        let mut board = PassBoard::new();
        board.publish(42u32);
        board.clear();
        assert!(board.get::<u32>().is_none());
    }

    #[test]
    fn publish_replaces_previous_value() {
        let mut board = PassBoard::new();
        board.publish(1u32);
        board.publish(2u32);
        assert_eq!(*board.get::<u32>().unwrap(), 2);
    }
}
