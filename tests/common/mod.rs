#![allow(dead_code)]

pub mod mock_backend;

use approx::assert_abs_diff_eq;
use mesh_drawer::cgmath::Vector4;

pub const EPSILON: f32 = 1e-5;

pub fn assert_vec4_eq(actual: Vector4<f32>, expected: [f32; 4]) {
    let actual: [f32; 4] = actual.into();
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*a, *e, epsilon = EPSILON);
    }
}
