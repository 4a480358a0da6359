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

//! Light types and their GPU-packed representation.
//!
//! Lights are owned by the scene; renderers only borrow them during a
//! frame. [`GpuLight`] is the shader-visible layout the deferred lighting
//! pass uploads, up to [`MAX_LIGHTS`] per frame.

use crate::math::{LinearRgba, Vec3};

/// The maximum number of lights the deferred lighting pass packs into its
/// uniform buffer. Submitting more truncates with a logged warning.
pub const MAX_LIGHTS: usize = 32;

/// A directional light source illuminating from a uniform direction.
///
/// Simulates an infinitely distant source like the sun: no position, no
/// falloff, parallel rays. The first directional light in a scene drives
/// the cascaded shadow maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The direction the light is pointing (normalized), from the light
    /// towards the scene.
    pub direction: Vec3,
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity multiplier.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, -0.5).normalize(),
            color: LinearRgba::WHITE,
            intensity: 1.0,
        }
    }
}

/// A point light emitting in all directions from a single point.
///
/// The first point light in a scene drives the omni-directional (cube)
/// shadow map; its `radius` defines that map's far plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity multiplier.
    pub intensity: f32,
    /// The maximum range of the light in world units. Beyond it the light
    /// has no effect; it is also the omni shadow far plane.
    pub radius: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: LinearRgba::WHITE,
            intensity: 1.0,
            radius: 10.0,
        }
    }
}

/// A spot light emitting a cone from a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// The direction the cone is pointing (normalized).
    pub direction: Vec3,
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// The intensity multiplier.
    pub intensity: f32,
    /// The maximum range of the light in world units.
    pub radius: f32,
    /// The full cone angle in radians.
    pub angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: LinearRgba::WHITE,
            intensity: 1.0,
            radius: 15.0,
            angle: 0.6,
        }
    }
}

/// All supported light types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightType {
    /// A directional light (sun-like, infinite distance, no falloff).
    Directional(DirectionalLight),
    /// A point light (omni-directional with distance falloff).
    Point(PointLight),
    /// A spotlight (cone-shaped with distance and angular falloff).
    Spot(SpotLight),
}

impl Default for LightType {
    fn default() -> Self {
        LightType::Directional(DirectionalLight::default())
    }
}

/// Shader-side discriminants for [`GpuLight::light_type`].
const GPU_LIGHT_DIRECTIONAL: f32 = 0.0;
const GPU_LIGHT_SPOT: f32 = 1.0;
const GPU_LIGHT_POINT: f32 = 2.0;

/// One light, packed for GPU consumption.
///
/// The trailing scalar quad keeps the struct 16-byte aligned; `light_type`
/// carries the shader discriminant (0 directional, 1 spot, 2 point).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// Color (rgb) and a padding alpha channel.
    pub color: [f32; 4],
    /// World position (xyz), w = 1.
    pub position: [f32; 4],
    /// Direction (xyz), w = 1. Meaningful for directional and spot lights.
    pub direction: [f32; 4],
    /// The light range; the omni shadow far plane for point lights.
    pub radius: f32,
    /// The intensity multiplier.
    pub intensity: f32,
    /// The shader discriminant (0 directional, 1 spot, 2 point).
    pub light_type: f32,
    /// The full cone angle in radians for spot lights, 0 otherwise.
    pub angle: f32,
}

impl GpuLight {
    /// Packs a light and its world position into the shader layout.
    pub fn pack(light: &LightType, position: Vec3) -> Self {
        let position = [position.x, position.y, position.z, 1.0];
        match light {
            LightType::Directional(l) => Self {
                color: l.color.to_array(),
                position,
                direction: direction_xyzw(l.direction),
                radius: 0.0,
                intensity: l.intensity,
                light_type: GPU_LIGHT_DIRECTIONAL,
                angle: 0.0,
            },
            LightType::Spot(l) => Self {
                color: l.color.to_array(),
                position,
                direction: direction_xyzw(l.direction),
                radius: l.radius,
                intensity: l.intensity,
                light_type: GPU_LIGHT_SPOT,
                angle: l.angle,
            },
            LightType::Point(l) => Self {
                color: l.color.to_array(),
                position,
                direction: [0.0, 0.0, 0.0, 1.0],
                radius: l.radius,
                intensity: l.intensity,
                light_type: GPU_LIGHT_POINT,
                angle: 0.0,
            },
        }
    }
}

#[inline]
fn direction_xyzw(direction: Vec3) -> [f32; 4] {
    let d = direction.normalize();
    [d.x, d.y, d.z, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn directional_default_is_normalized() {
        let light = DirectionalLight::default();
        assert!(approx_eq(light.direction.length(), 1.0));
    }

    #[test]
    fn default_light_type_is_directional() {
        assert!(matches!(LightType::default(), LightType::Directional(_)));
    }

    #[test]
    fn packed_point_light_carries_radius_and_type() {
        let light = LightType::Point(PointLight {
            radius: 25.0,
            ..Default::default()
        });
        let packed = GpuLight::pack(&light, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(packed.radius, 25.0);
        assert_eq!(packed.light_type, GPU_LIGHT_POINT);
        assert_eq!(packed.position, [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn packed_directional_direction_is_normalized() {
        let light = LightType::Directional(DirectionalLight {
            direction: Vec3::new(0.0, -2.0, 0.0),
            ..Default::default()
        });
        let packed = GpuLight::pack(&light, Vec3::ZERO);
        assert_eq!(packed.direction, [0.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn gpu_light_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GpuLight>() % 16, 0);
    }
}
