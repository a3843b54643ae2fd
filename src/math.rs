//! 4x4 matrix helpers.
//!
//! Matrices are [`cgmath::Matrix4<f32>`] and follow the column-vector
//! convention: a point is transformed as `M * v`, so `multiply(a, b)` applied
//! to a point runs `b` first and `a` second. Flattening for upload is
//! column-major, one inner array per column.

use cgmath::{Rad, Vector3, Vector4};

pub type Matrix4 = cgmath::Matrix4<f32>;

/// `a * b`. Not commutative.
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    a * b
}

/// Pure translation by `(tx, ty, tz)`.
pub fn translation(tx: f32, ty: f32, tz: f32) -> Matrix4 {
    Matrix4::from_translation(Vector3::new(tx, ty, tz))
}

/// Right-handed rotation about the X axis; positive angles turn +Y towards +Z.
pub fn rotation_x(angle: impl Into<Rad<f32>>) -> Matrix4 {
    Matrix4::from_angle_x(angle)
}

/// Right-handed rotation about the Y axis; positive angles turn +Z towards +X.
pub fn rotation_y(angle: impl Into<Rad<f32>>) -> Matrix4 {
    Matrix4::from_angle_y(angle)
}

pub fn to_column_major(m: &Matrix4) -> [[f32; 4]; 4] {
    (*m).into()
}

/// Applies `m` to the point `p` (w = 1) and returns the homogeneous result.
pub fn transform_point(m: &Matrix4, p: [f32; 3]) -> Vector4<f32> {
    m * Vector3::from(p).extend(1.0)
}
