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

//! Cascade partitioning math for directional shadow maps.
//!
//! Pure functions: split computation blends logarithmic and uniform depth
//! partitioning (GPU Gems 3, ch. 10), and each cascade gets a tight
//! light-space orthographic projection around its frustum slice. Keeping
//! this free of GPU state makes the partition invariants directly
//! testable.

use vesper_core::math::{Frustum, Mat4, Vec3};

/// The fixed number of cascade slots in shader-visible arrays. The active
/// count is configurable up to this bound.
pub const SHADOW_CASCADES: usize = 4;

/// One depth slice of the directional shadow map.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    /// The view-space depth at the far edge of the slice, negated so it
    /// compares directly against view-space Z (which looks down -Z).
    pub split_depth: f32,
    /// The bounding-sphere radius of the slice, quantized to 1/16.
    pub radius: f32,
    /// The light-space view matrix.
    pub view: Mat4,
    /// The orthographic projection sized to the bounding sphere.
    pub projection: Mat4,
    /// `projection * view`.
    pub proj_view: Mat4,
}

impl Default for Cascade {
    fn default() -> Self {
        Self {
            split_depth: 0.0,
            radius: 0.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            proj_view: Mat4::IDENTITY,
        }
    }
}

/// Computes normalized cascade split fractions over `(0, 1]`.
///
/// Each split blends a logarithmic and a uniform distribution:
/// `d = lambda * (near * ratio^p) + (1 - lambda) * (near + range * p)`,
/// normalized against the clip range. `lambda` is clamped into `[0, 1]`;
/// the result is strictly increasing and ends at exactly 1.
pub fn compute_cascade_splits(near: f32, far: f32, lambda: f32) -> [f32; SHADOW_CASCADES] {
    let lambda = lambda.clamp(0.0, 1.0);
    let clip_range = far - near;
    let ratio = far / near;

    let mut splits = [0.0; SHADOW_CASCADES];
    for (i, split) in splits.iter_mut().enumerate() {
        let p = (i + 1) as f32 / SHADOW_CASCADES as f32;
        let log = near * ratio.powf(p);
        let uniform = near + clip_range * p;
        let d = lambda * (log - uniform) + uniform;
        *split = (d - near) / clip_range;
    }
    splits
}

/// Rounds a radius up to the nearest 1/16 world unit.
///
/// Sub-pixel camera motion jitters the raw bounding radius every frame;
/// quantizing it keeps the shadow projection stable and prevents edge
/// shimmering.
#[inline]
pub fn quantize_radius(radius: f32) -> f32 {
    (radius * 16.0).ceil() / 16.0
}

/// The world up vector used for light views, with a Z fallback when the
/// light points nearly straight up or down.
fn light_up(light_dir: Vec3) -> Vec3 {
    if light_dir.y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

/// Computes all cascades for one frame.
///
/// `frustum` is the camera's full view frustum in world space; `splits`
/// comes from [`compute_cascade_splits`]. Consecutive slices share their
/// boundary corners exactly — the cascades partition the frustum along
/// view depth with no gap or overlap.
pub fn compute_cascades(
    frustum: &Frustum,
    light_direction: Vec3,
    splits: &[f32; SHADOW_CASCADES],
    near: f32,
    clip_range: f32,
) -> [Cascade; SHADOW_CASCADES] {
    let light_dir = light_direction.normalize();
    let mut cascades = [Cascade::default(); SHADOW_CASCADES];

    let mut last_split = 0.0;
    for (i, cascade) in cascades.iter_mut().enumerate() {
        let split = splits[i];
        let slice = frustum.slice(last_split, split);

        let center = slice.center();
        let radius = quantize_radius(slice.bounding_radius());

        let eye = center - light_dir * radius;
        let view =
            Mat4::look_at_rh(eye, center, light_up(light_dir)).unwrap_or(Mat4::IDENTITY);
        let projection =
            Mat4::orthographic_rh_zo(-radius, radius, -radius, radius, 0.0, 2.0 * radius);

        *cascade = Cascade {
            split_depth: -(near + split * clip_range),
            radius,
            view,
            projection,
            proj_view: projection * view,
        };
        last_split = split;
    }
    cascades
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_frustum(eye: Vec3) -> Frustum {
        let proj = Mat4::perspective_rh_zo(1.1, 16.0 / 9.0, 0.5, 200.0);
        let view = Mat4::look_at_rh(eye, eye + Vec3::new(0.0, 0.0, -1.0), Vec3::Y).unwrap();
        Frustum::from_matrix(&(proj * view))
    }

    #[test]
    fn splits_are_strictly_increasing_and_end_at_one() {
        for lambda in [0.0, 0.5, 0.95, 1.0] {
            let splits = compute_cascade_splits(0.5, 200.0, lambda);
            assert!(splits[0] > 0.0, "lambda {lambda}: first split must be > 0");
            for window in splits.windows(2) {
                assert!(
                    window[0] < window[1],
                    "lambda {lambda}: splits must increase"
                );
            }
            assert_relative_eq!(splits[SHADOW_CASCADES - 1], 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn uniform_lambda_gives_even_splits() {
        let splits = compute_cascade_splits(1.0, 101.0, 0.0);
        for (i, split) in splits.iter().enumerate() {
            assert_relative_eq!(*split, (i + 1) as f32 / 4.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn slices_partition_the_frustum() {
        let frustum = camera_frustum(Vec3::new(0.0, 2.0, 5.0));
        let splits = compute_cascade_splits(0.5, 200.0, 0.95);

        let mut last_split = 0.0;
        for window_index in 0..SHADOW_CASCADES - 1 {
            let split = splits[window_index];
            let current = frustum.slice(last_split, split);
            let next = frustum.slice(split, splits[window_index + 1]);
            // Far corners of slice i equal near corners of slice i+1.
            for corner in 0..4 {
                assert!(
                    current.corners()[corner + 4].distance(next.corners()[corner]) < 1e-3,
                    "gap or overlap between cascades {window_index} and {}",
                    window_index + 1
                );
            }
            last_split = split;
        }
    }

    #[test]
    fn quantization_rounds_up_to_sixteenths() {
        assert_eq!(quantize_radius(1.0), 1.0);
        assert_eq!(quantize_radius(1.01), 1.0625);
        assert_eq!(quantize_radius(0.0), 0.0);
    }

    #[test]
    fn radius_is_stable_under_subpixel_camera_motion() {
        let splits = compute_cascade_splits(0.5, 200.0, 0.95);
        let light = Vec3::new(-0.4, -1.0, -0.3).normalize();

        let baseline = compute_cascades(
            &camera_frustum(Vec3::new(0.0, 2.0, 5.0)),
            light,
            &splits,
            0.5,
            199.5,
        );
        for offset in [0.01, 0.05] {
            let moved = compute_cascades(
                &camera_frustum(Vec3::new(offset, 2.0, 5.0)),
                light,
                &splits,
                0.5,
                199.5,
            );
            for (a, b) in baseline.iter().zip(moved.iter()) {
                // Quantized radii may differ by at most one 1/16 step.
                assert!(
                    (a.radius - b.radius).abs() <= 1.0 / 16.0 + 1e-6,
                    "radius jumped from {} to {} for offset {offset}",
                    a.radius,
                    b.radius
                );
            }
        }
    }

    #[test]
    fn split_depths_are_negative_and_decreasing() {
        let splits = compute_cascade_splits(0.5, 200.0, 0.95);
        let cascades = compute_cascades(
            &camera_frustum(Vec3::ZERO),
            Vec3::new(0.0, -1.0, -0.2),
            &splits,
            0.5,
            199.5,
        );
        for window in cascades.windows(2) {
            assert!(window[0].split_depth < 0.0);
            assert!(window[0].split_depth > window[1].split_depth);
        }
    }

    #[test]
    fn vertical_light_uses_fallback_up_vector() {
        let splits = compute_cascade_splits(0.5, 200.0, 0.95);
        let cascades = compute_cascades(
            &camera_frustum(Vec3::ZERO),
            Vec3::new(0.0, -1.0, 0.0),
            &splits,
            0.5,
            199.5,
        );
        // A degenerate look-at would have fallen back to identity.
        for cascade in &cascades {
            assert_ne!(cascade.view, Mat4::IDENTITY);
        }
    }

    #[test]
    fn cascade_projection_covers_the_slice() {
        let frustum = camera_frustum(Vec3::new(1.0, 3.0, -2.0));
        let splits = compute_cascade_splits(0.5, 200.0, 0.95);
        let cascades = compute_cascades(
            &frustum,
            Vec3::new(-0.3, -1.0, -0.4).normalize(),
            &splits,
            0.5,
            199.5,
        );

        let mut last_split = 0.0;
        for (i, cascade) in cascades.iter().enumerate() {
            let slice = frustum.slice(last_split, splits[i]);
            for corner in slice.corners() {
                let clip = cascade.proj_view.project_point(*corner);
                assert!(
                    clip.x.abs() <= 1.0 + 1e-3 && clip.y.abs() <= 1.0 + 1e-3,
                    "cascade {i} does not cover its slice: {clip:?}"
                );
                assert!((-1e-3..=1.0 + 1e-3).contains(&clip.z));
            }
            last_split = splits[i];
        }
    }
}
