//! Model-view-projection composition.
//!
//! The scene is positioned by five independent parameters: a translation and
//! two rotation angles. [`model_view_projection`] turns them, together with a
//! projection matrix, into the single matrix uploaded as the `mvp` uniform.

use cgmath::{Rad, Vector3};

use crate::math::{self, Matrix4};

/// wgpu clip space has z in [0, 1] while cgmath projections produce OpenGL's
/// [-1, 1]. This remaps z and leaves x, y and w untouched.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4 = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Builds `projection * (T * (Ry * Rx))`.
///
/// A point is rotated about X first, then about Y, then translated and
/// finally projected. Swapping any two of these steps changes the picture,
/// e.g. rotating after translating spins the mesh around the camera instead
/// of around its own origin.
pub fn model_view_projection(
    projection: &Matrix4,
    tx: f32,
    ty: f32,
    tz: f32,
    rotation_x: impl Into<Rad<f32>>,
    rotation_y: impl Into<Rad<f32>>,
) -> Matrix4 {
    let rotation = math::multiply(&math::rotation_y(rotation_y), &math::rotation_x(rotation_x));
    let model = math::multiply(&math::translation(tx, ty, tz), &rotation);
    math::multiply(projection, &model)
}

/// Host-controlled placement of the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub translation: Vector3<f32>,
    pub rotation_x: Rad<f32>,
    pub rotation_y: Rad<f32>,
}

impl SceneTransform {
    pub fn new(translation: impl Into<Vector3<f32>>) -> Self {
        Self {
            translation: translation.into(),
            rotation_x: Rad(0.0),
            rotation_y: Rad(0.0),
        }
    }

    /// Adds to both rotation angles (radians).
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.rotation_x += Rad(delta_x);
        self.rotation_y += Rad(delta_y);
    }

    /// Moves the mesh along the view axis. Positive values bring it closer.
    pub fn zoom(&mut self, delta: f32) {
        self.translation.z += delta;
    }

    pub fn mvp(&self, projection: &Projection) -> Matrix4 {
        model_view_projection(
            &projection.calc_matrix(),
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.rotation_x,
            self.rotation_y,
        )
    }
}

/// Perspective projection that tracks the surface aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4 {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
