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

//! A 4x4 column-major matrix for 3D transforms and projections.

use super::vector::{Vec3, Vec4};
use super::EPSILON;
use std::ops::Mul;

/// A 4x4 column-major matrix.
///
/// Used for model/view transforms and camera projection matrices. The
/// memory layout is column-major, compatible with modern graphics APIs.
/// Projection constructors use a right-handed coordinate system with a
/// `[0, 1]` clip-space depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(
            Vec4::X,
            Vec4::Y,
            Vec4::Z,
            Vec4::new(v.x, v.y, v.z, 1.0),
        )
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Returns a row of the matrix as a [`Vec4`].
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0].get(index),
            self.cols[1].get(index),
            self.cols[2].get(index),
            self.cols[3].get(index),
        )
    }

    /// Creates a right-handed perspective projection with `[0, 1]` depth.
    ///
    /// `fov_y_radians` is the vertical field of view; `z_near` and `z_far`
    /// must both be positive with `z_far > z_near`.
    #[inline]
    pub fn perspective_rh_zo(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        debug_assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z_far / (z_near - z_far), -1.0),
            Vec4::new(0.0, 0.0, (z_near * z_far) / (z_near - z_far), 0.0),
        )
    }

    /// Creates a right-handed orthographic projection with `[0, 1]` depth.
    #[inline]
    pub fn orthographic_rh_zo(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rcp_w = 1.0 / (right - left);
        let rcp_h = 1.0 / (top - bottom);
        let rcp_d = 1.0 / (z_far - z_near);
        Self::from_cols(
            Vec4::new(2.0 * rcp_w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * rcp_h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -rcp_d, 0.0),
            Vec4::new(
                -(right + left) * rcp_w,
                -(top + bottom) * rcp_h,
                -z_near * rcp_d,
                1.0,
            ),
        )
    }

    /// Creates a right-handed view matrix looking from `eye` towards `target`.
    ///
    /// Returns `None` when `eye` and `target` coincide or `up` is parallel
    /// to the view direction.
    #[inline]
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = target - eye;
        if forward.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let f = forward.normalize();
        let side = f.cross(up);
        if side.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let s = side.normalize();
        let u = s.cross(f);
        Some(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    /// Returns the transpose of the matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }

    /// Returns the inverse of the matrix, or `None` when it is singular.
    pub fn inverse(&self) -> Option<Self> {
        let m = self.to_flat_array();
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det.abs() < f32::MIN_POSITIVE {
            return None;
        }
        let rcp = 1.0 / det;
        for value in &mut inv {
            *value *= rcp;
        }
        Some(Self::from_flat_array(&inv))
    }

    /// Transforms a point, applying the perspective divide.
    #[inline]
    pub fn project_point(&self, p: Vec3) -> Vec3 {
        let v = *self * Vec4::from_vec3(p, 1.0);
        v.truncate() / v.w
    }

    /// Returns the matrix as a 2D array of columns for GPU uploads.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
            self.cols[3].to_array(),
        ]
    }

    #[inline]
    fn to_flat_array(self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4] = col.x;
            out[c * 4 + 1] = col.y;
            out[c * 4 + 2] = col.z;
            out[c * 4 + 3] = col.w;
        }
        out
    }

    #[inline]
    fn from_flat_array(values: &[f32; 16]) -> Self {
        Self::from_cols(
            Vec4::new(values[0], values[1], values[2], values[3]),
            Vec4::new(values[4], values[5], values[6], values[7]),
            Vec4::new(values[8], values[9], values[10], values[11]),
            Vec4::new(values[12], values[13], values[14], values[15]),
        )
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq_eps;

    fn mat_approx_eq(a: &Mat4, b: &Mat4, eps: f32) -> bool {
        a.cols.iter().zip(b.cols.iter()).all(|(ca, cb)| {
            approx_eq_eps(ca.x, cb.x, eps)
                && approx_eq_eps(ca.y, cb.y, eps)
                && approx_eq_eps(ca.z, cb.z, eps)
                && approx_eq_eps(ca.w, cb.w, eps)
        })
    }

    #[test]
    fn identity_is_multiplicative_neutral() {
        let m = Mat4::from_translation(Vec3::new(3.0, -2.0, 7.5));
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn translation_moves_points() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = m * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p.truncate(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn inverse_of_affine_transform() {
        let m = Mat4::from_translation(Vec3::new(4.0, -1.0, 2.0))
            * Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));
        let inv = m.inverse().expect("invertible");
        assert!(mat_approx_eq(&(m * inv), &Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn inverse_of_perspective() {
        let p = Mat4::perspective_rh_zo(1.0, 16.0 / 9.0, 0.1, 100.0);
        let inv = p.inverse().expect("invertible");
        assert!(mat_approx_eq(&(p * inv), &Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat4::ZERO.inverse().is_none());
    }

    #[test]
    fn look_at_rejects_degenerate_inputs() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        assert!(Mat4::look_at_rh(eye, eye, Vec3::Y).is_none());
        assert!(Mat4::look_at_rh(eye, eye + Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye = Vec3::new(5.0, 1.0, -2.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).unwrap();
        let p = view * Vec4::from_vec3(eye, 1.0);
        assert!(p.truncate().length() < 1e-5);
    }

    #[test]
    fn orthographic_maps_near_to_zero_and_far_to_one() {
        let proj = Mat4::orthographic_rh_zo(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0);
        // Right-handed view space looks down -Z.
        let near = proj * Vec4::new(0.0, 0.0, -0.0, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!(approx_eq_eps(near.z, 0.0, 1e-6));
        assert!(approx_eq_eps(far.z, 1.0, 1e-6));
    }
}
