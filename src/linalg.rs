//! Minimal 3D linear algebra for the wave scene.
//!
//! Matrices are stored as four rows and follow the row-vector convention:
//! a point is transformed as `p * M` and `Mat4::mul(a, b)` applies `a` first,
//! then `b`. Translation lives in row 3.
//!
//! The row-major memory image of a row-vector matrix is the column-major
//! image of the equivalent column-vector matrix, so [`Mat4::to_rows_array`]
//! can be handed to WGSL `mat4x4<f32>` as-is.

use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

pub const PI: f32 = std::f32::consts::PI;

pub fn to_radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

pub fn to_degrees(radians: f32) -> f32 {
    radians * 180.0 / PI
}

fn almost_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index out of range: {}", index),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index out of range: {}", index),
        }
    }
}

/// Scales `v` to unit length.
///
/// Vectors whose magnitude is already within `f32::EPSILON` of one are
/// returned untouched. `v` must not be the zero vector; doing so yields NaN.
pub fn normalize(v: Vec3) -> Vec3 {
    let magnitude = v.length();
    debug_assert!(magnitude != 0.0, "normalize called with a zero vector");

    if almost_equal(magnitude, 1.0) {
        v
    } else {
        v / magnitude
    }
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// 4x4 matrix stored as four rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub rows: [Vec4; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4::from_rows([
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    ]);

    pub const ZERO: Mat4 = Mat4::from_rows([Vec4::ZERO; 4]);

    /// Maps OpenGL clip depth (`-w..w`) onto the `0..w` range wgpu keeps.
    ///
    /// Row-vector form of the usual `OPENGL_TO_WGPU_MATRIX`: `z' = (z + w) / 2`.
    pub const GL_TO_WGPU_DEPTH: Mat4 = Mat4::from_rows([
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 1.0),
    ]);

    pub const fn from_rows(rows: [Vec4; 4]) -> Self {
        Self { rows }
    }

    pub fn from_rows_array(m: [[f32; 4]; 4]) -> Self {
        Self::from_rows(m.map(|r| Vec4::new(r[0], r[1], r[2], r[3])))
    }

    pub fn to_rows_array(&self) -> [[f32; 4]; 4] {
        self.rows.map(Vec4::to_array)
    }

    /// Matrix product: row `i`, column `j` is the sum over `k` of
    /// `a[i][k] * b[k][j]`. Under the row-vector convention this is
    /// "apply `a`, then `b`".
    pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut result = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += a[i][k] * b[k][j];
                }
            }
        }
        result
    }

    pub fn transpose(&self) -> Mat4 {
        let mut result = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result[i][j] = self[j][i];
            }
        }
        result
    }

    /// Perspective projection from a vertical field of view in degrees.
    ///
    /// Requires `far > near > 0`; anything else produces a degenerate
    /// matrix (division by zero or an inverted depth range).
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        debug_assert!(near > 0.0 && far > near, "invalid clip range {}..{}", near, far);

        let top = (to_radians(fov_degrees) / 2.0).tan() * near;
        let right = top * aspect;
        let depth = far - near;

        Mat4::from_rows([
            Vec4::new(near / right, 0.0, 0.0, 0.0),
            Vec4::new(0.0, near / top, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -(far + near) / depth, -1.0),
            Vec4::new(0.0, 0.0, -2.0 * far * near / depth, 0.0),
        ])
    }

    /// Applies [`Mat4::GL_TO_WGPU_DEPTH`] after `self`.
    ///
    /// Use on the last transform a clip-space position goes through
    /// (`pv` or `projection`) before it is handed to wgpu.
    pub fn to_wgpu_depth(&self) -> Mat4 {
        Mat4::mul(self, &Mat4::GL_TO_WGPU_DEPTH)
    }

    /// View matrix looking from `eye` towards `target`.
    ///
    /// `up` must not be parallel to `eye - target`, otherwise the basis is
    /// not orthonormal.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let z_axis = normalize(eye - target);
        let x_axis = normalize(cross(normalize(up), z_axis));
        let y_axis = cross(z_axis, x_axis);

        let translation = Mat4::IDENTITY.translate(-eye);
        let rotation = Mat4::from_rows([
            Vec4::new(x_axis.x, y_axis.x, z_axis.x, 0.0),
            Vec4::new(x_axis.y, y_axis.y, z_axis.y, 0.0),
            Vec4::new(x_axis.z, y_axis.z, z_axis.z, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ]);

        Mat4::mul(&translation, &rotation)
    }

    /// Returns a copy with `v` added to the translation row.
    ///
    /// This edits entries; it is not the product `self · T(v)`. On a matrix
    /// that already carries a scale or rotation, `v` is not transformed by
    /// it, so `scale(s).translate(v)` leaves `v` unscaled.
    pub fn translate(&self, v: Vec3) -> Mat4 {
        let mut result = *self;
        result[3][0] += v.x;
        result[3][1] += v.y;
        result[3][2] += v.z;
        result
    }

    /// Returns a copy with the first three diagonal entries scaled by `v`.
    ///
    /// Like [`Mat4::translate`] this is an entry edit, not `self · S(v)`:
    /// the translation row and off-diagonal entries are left alone. Cell
    /// matrices rely on that when they translate first and scale second.
    pub fn scale(&self, v: Vec3) -> Mat4 {
        let mut result = *self;
        result[0][0] *= v.x;
        result[1][1] *= v.y;
        result[2][2] *= v.z;
        result
    }

    pub fn translation(&self) -> Vec3 {
        self.rows[3].truncate()
    }

    pub fn diagonal(&self) -> Vec4 {
        Vec4::new(self[0][0], self[1][1], self[2][2], self[3][3])
    }

    /// Transforms a homogeneous row vector: `v * self`.
    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        let mut result = Vec4::ZERO;
        for j in 0..4 {
            for k in 0..4 {
                result[j] += v[k] * self[k][j];
            }
        }
        result
    }

    /// Transforms a point (w = 1) and applies the perspective divide.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let h = self.transform_vec4(p.extend(1.0));
        h.truncate() / h.w
    }

    pub fn is_finite(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.to_array().iter().all(|v| v.is_finite()))
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        (0..4).all(|i| (0..4).all(|j| (self[i][j] - other[i][j]).abs() <= epsilon))
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, row: usize) -> &Vec4 {
        &self.rows[row]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, row: usize) -> &mut Vec4 {
        &mut self.rows[row]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::mul(&self, &rhs)
    }
}
