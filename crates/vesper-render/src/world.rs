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

//! The intermediate `RenderWorld` the pipeline consumes.
//!
//! The application extracts its scene (entities, components, whatever
//! structure it uses) into this flat, per-frame representation; renderers
//! only ever read it. The extraction boundary keeps the scene collaborator
//! external to the rendering core.

use crate::mesh::GpuMesh;
use vesper_core::gpu::{DescriptorSetId, TextureViewId};
use vesper_core::light::LightType;
use vesper_core::math::{Mat4, Vec3};

/// The camera extracted for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedCamera {
    /// The projection matrix.
    pub projection: Mat4,
    /// The view matrix (inverse of the camera's world transform).
    pub view: Mat4,
    /// The camera's world position.
    pub position: Vec3,
    /// The near clip distance.
    pub near: f32,
    /// The far clip distance.
    pub far: f32,
}

impl ExtractedCamera {
    /// Returns `projection * view`.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One light extracted for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedLight {
    /// The light's parameters.
    pub light: LightType,
    /// The light's world position.
    pub position: Vec3,
}

/// One mesh to draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedMesh {
    /// The GPU resources of the mesh.
    pub mesh: GpuMesh,
    /// The mesh's world transform.
    pub transform: Mat4,
    /// The material descriptor set; the off-screen pass substitutes its
    /// default material when absent.
    pub material: Option<DescriptorSetId>,
    /// Whether the mesh is rendered into shadow maps.
    pub casts_shadows: bool,
}

/// Image-based-lighting environment extracted for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedEnvironment {
    /// The prefiltered environment cube map.
    pub prefiltered: TextureViewId,
    /// The irradiance cube map.
    pub irradiance: TextureViewId,
    /// The mip count of the prefiltered map, for specular LOD selection.
    pub prefiltered_mip_levels: u32,
}

/// Everything the pipeline needs to render one frame.
///
/// Cleared and refilled by the application before each
/// [`RenderManager::begin_scene`](crate::manager::RenderManager::begin_scene).
#[derive(Debug, Default)]
pub struct RenderWorld {
    /// The active camera, if any. Without one every pass skips its work.
    pub camera: Option<ExtractedCamera>,
    /// All lights visible this frame.
    pub lights: Vec<ExtractedLight>,
    /// All meshes visible this frame.
    pub meshes: Vec<ExtractedMesh>,
    /// The IBL environment, if any.
    pub environment: Option<ExtractedEnvironment>,
}

impl RenderWorld {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all per-frame data for the next extraction.
    pub fn clear(&mut self) {
        self.camera = None;
        self.lights.clear();
        self.meshes.clear();
        self.environment = None;
    }

    /// Returns the first directional light, if any.
    pub fn first_directional_light(&self) -> Option<&ExtractedLight> {
        self.lights
            .iter()
            .find(|l| matches!(l.light, LightType::Directional(_)))
    }

    /// Returns the first point light, if any.
    pub fn first_point_light(&self) -> Option<&ExtractedLight> {
        self.lights
            .iter()
            .find(|l| matches!(l.light, LightType::Point(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_core::light::{DirectionalLight, PointLight};

    #[test]
    fn first_light_queries_respect_type() {
        let mut world = RenderWorld::new();
        assert!(world.first_directional_light().is_none());

        world.lights.push(ExtractedLight {
            light: LightType::Point(PointLight::default()),
            position: Vec3::new(1.0, 0.0, 0.0),
        });
        world.lights.push(ExtractedLight {
            light: LightType::Directional(DirectionalLight::default()),
            position: Vec3::ZERO,
        });

        assert!(matches!(
            world.first_directional_light().unwrap().light,
            LightType::Directional(_)
        ));
        assert_eq!(world.first_point_light().unwrap().position.x, 1.0);
    }

    #[test]
    fn clear_resets_every_field() {
        let mut world = RenderWorld::new();
        world.camera = Some(ExtractedCamera {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            position: Vec3::ZERO,
            near: 0.1,
            far: 100.0,
        });
        world.lights.push(ExtractedLight {
            light: LightType::default(),
            position: Vec3::ZERO,
        });
        world.clear();
        assert!(world.camera.is_none());
        assert!(world.lights.is_empty());
    }
}
