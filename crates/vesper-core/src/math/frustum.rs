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

//! A camera view frustum described by its eight corner points.

use super::matrix::Mat4;
use super::vector::{Vec3, Vec4};

/// The number of corner points of a frustum.
pub const FRUSTUM_CORNERS: usize = 8;

/// The corners of the clip-space cube in normalized device coordinates,
/// near plane first. Corner `i + 4` shares its x/y with corner `i`.
const NDC_CORNERS: [Vec3; FRUSTUM_CORNERS] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// A view frustum as eight corner points.
///
/// Corners `0..4` form the near-plane quad and `4..8` the far-plane quad;
/// corner `i + 4` lies behind corner `i` along the view direction. The
/// corners live in whatever space the source matrix maps *from*: building
/// from `projection * view` yields world-space corners.
///
/// A frustum is a per-frame snapshot — it must be rebuilt whenever the
/// projection or view changes. Cascade computation rebuilds one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frustum {
    corners: [Vec3; FRUSTUM_CORNERS],
}

impl Frustum {
    /// Pairs of corner indices forming the 12 edges of the frustum,
    /// used for debug line rendering.
    pub const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    /// Builds a frustum by un-projecting the NDC cube through `matrix`.
    ///
    /// `matrix` is typically `projection * view`. Each clip-cube corner is
    /// transformed through the inverse and divided by `w`. A singular
    /// matrix yields a frustum with all corners at the origin.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let Some(inverse) = matrix.inverse() else {
            return Self::default();
        };
        let mut corners = [Vec3::ZERO; FRUSTUM_CORNERS];
        for (corner, ndc) in corners.iter_mut().zip(NDC_CORNERS.iter()) {
            let p = inverse * Vec4::from_vec3(*ndc, 1.0);
            *corner = p.truncate() / p.w;
        }
        Self { corners }
    }

    /// Creates a frustum directly from eight corner points.
    #[inline]
    pub fn from_corners(corners: [Vec3; FRUSTUM_CORNERS]) -> Self {
        Self { corners }
    }

    /// Returns the corner points, near plane first.
    #[inline]
    pub fn corners(&self) -> &[Vec3; FRUSTUM_CORNERS] {
        &self.corners
    }

    /// Returns the centroid of the eight corners.
    pub fn center(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for corner in &self.corners {
            sum += *corner;
        }
        sum / FRUSTUM_CORNERS as f32
    }

    /// Extracts the sub-frustum between two normalized depth fractions.
    ///
    /// For each of the four near/far corner pairs, the slice's near corner
    /// sits at fraction `near_split` along the pair and its far corner at
    /// `far_split`. Consecutive slices with shared split values therefore
    /// partition the frustum exactly, with no gap or overlap.
    pub fn slice(&self, near_split: f32, far_split: f32) -> Self {
        let mut corners = [Vec3::ZERO; FRUSTUM_CORNERS];
        for i in 0..4 {
            let near = self.corners[i];
            let far = self.corners[i + 4];
            corners[i] = Vec3::lerp(near, far, near_split);
            corners[i + 4] = Vec3::lerp(near, far, far_split);
        }
        Self { corners }
    }

    /// Returns the radius of the bounding sphere centered at [`center`]
    /// that encloses all corners.
    ///
    /// [`center`]: Self::center
    pub fn bounding_radius(&self) -> f32 {
        let center = self.center();
        self.corners
            .iter()
            .map(|c| c.distance(center))
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq_eps;

    #[test]
    fn round_trips_through_the_projection() {
        let proj = Mat4::perspective_rh_zo(1.2, 16.0 / 9.0, 0.1, 250.0);
        let view = Mat4::look_at_rh(
            Vec3::new(3.0, 4.0, -5.0),
            Vec3::ZERO,
            Vec3::Y,
        )
        .unwrap();
        let view_proj = proj * view;
        let frustum = Frustum::from_matrix(&view_proj);

        for (corner, ndc) in frustum.corners().iter().zip(NDC_CORNERS.iter()) {
            let reprojected = view_proj.project_point(*corner);
            assert!(approx_eq_eps(reprojected.x, ndc.x, 1e-3));
            assert!(approx_eq_eps(reprojected.y, ndc.y, 1e-3));
            assert!(approx_eq_eps(reprojected.z, ndc.z, 1e-3));
        }
    }

    #[test]
    fn near_corners_precede_far_corners() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let proj = Mat4::perspective_rh_zo(1.0, 1.0, 1.0, 100.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).unwrap();
        let frustum = Frustum::from_matrix(&(proj * view));
        for i in 0..4 {
            let near_dist = frustum.corners()[i].distance(eye);
            let far_dist = frustum.corners()[i + 4].distance(eye);
            assert!(near_dist < far_dist);
        }
    }

    #[test]
    fn singular_matrix_collapses_to_origin() {
        let frustum = Frustum::from_matrix(&Mat4::ZERO);
        assert_eq!(frustum.corners(), &[Vec3::ZERO; FRUSTUM_CORNERS]);
    }

    #[test]
    fn full_slice_is_identity() {
        let proj = Mat4::perspective_rh_zo(1.0, 1.0, 0.5, 50.0);
        let frustum = Frustum::from_matrix(&proj);
        let sliced = frustum.slice(0.0, 1.0);
        for (a, b) in frustum.corners().iter().zip(sliced.corners().iter()) {
            assert!(a.distance(*b) < 1e-4);
        }
    }

    #[test]
    fn adjacent_slices_share_a_boundary() {
        let proj = Mat4::perspective_rh_zo(1.0, 1.0, 0.5, 50.0);
        let frustum = Frustum::from_matrix(&proj);
        let first = frustum.slice(0.0, 0.4);
        let second = frustum.slice(0.4, 1.0);
        for i in 0..4 {
            assert!(first.corners()[i + 4].distance(second.corners()[i]) < 1e-4);
        }
    }
}
