//! Fragment shading model.
//!
//! The GPU evaluates `shaders/mesh.wgsl`; this module holds the uniform block
//! that feeds it and a CPU rendition of the same fragment function so the
//! colour math can be checked without a device.
//!
//! Every fragment first blends its two texture samples into a base colour and
//! then takes one of three paths, chosen by [`ShadingMode::select`]:
//!
//! | `show_texture` | `lighting_enabled` | output |
//! |---|---|---|
//! | false | any | flat red |
//! | true | false | base colour |
//! | true | true | diffuse + specular + ambient |

use cgmath::{InnerSpace, Vector3, Vector4};

use crate::math::{self, Matrix4};

/// Colour written when textures are hidden, uploaded as the `color` uniform.
/// Alpha is always 1.
pub const FLAT_COLOUR: [f32; 3] = [1.0, 0.0, 0.0];

/// Mirror of the `MeshUniforms` block in `mesh.wgsl`.
///
/// Field order matches the WGSL struct so that every member lands on its WGSL
/// offset without explicit padding. Booleans travel as `u32`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniforms {
    pub mvp: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    pub ambient: f32,
    pub color: [f32; 3],
    pub specular_intensity: f32,
    pub shininess: f32,
    pub blend_factor: f32,
    pub show_tex: u32,
    pub enable_lighting: u32,
}

impl MeshUniforms {
    pub fn mvp_matrix(&self) -> Matrix4 {
        self.mvp.into()
    }

    pub fn set_mvp(&mut self, mvp: &Matrix4) {
        self.mvp = math::to_column_major(mvp);
    }

    pub fn mode(&self) -> ShadingMode {
        ShadingMode::select(self.show_tex != 0, self.enable_lighting != 0)
    }
}

/// The three reachable output paths of the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Flat,
    Textured,
    Lit,
}

impl ShadingMode {
    pub fn select(show_texture: bool, lighting_enabled: bool) -> Self {
        match (show_texture, lighting_enabled) {
            (false, _) => ShadingMode::Flat,
            (true, false) => ShadingMode::Textured,
            (true, true) => ShadingMode::Lit,
        }
    }
}

/// Linear interpolation between two samples; 0 gives `a`, 1 gives `b`.
pub fn blend(a: Vector4<f32>, b: Vector4<f32>, factor: f32) -> Vector4<f32> {
    a * (1.0 - factor) + b * factor
}

/// GLSL/WGSL `reflect`: mirrors `incident` about the plane with normal `normal`.
pub fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Single white directional light.
///
/// `light_pos` is used as a direction, and the eye direction is taken as
/// `normalize(-light_pos)`. The sum is not clamped.
pub fn lit_colour(
    normal: Vector3<f32>,
    light_pos: Vector3<f32>,
    ambient: f32,
    specular_intensity: f32,
    shininess: f32,
    base: Vector4<f32>,
) -> Vector4<f32> {
    let normal = normal.normalize();
    let light_dir = light_pos.normalize();

    let diffuse = base.truncate() * normal.dot(light_dir).max(0.0);

    let view_dir = (-light_pos).normalize();
    let reflect_dir = reflect(-light_dir, normal);
    let highlight = specular_intensity * view_dir.dot(reflect_dir).max(0.0).powf(shininess);
    let specular = Vector3::new(highlight, highlight, highlight);

    let ambient = base.truncate() * ambient;

    (diffuse + specular + ambient).extend(base.w)
}

/// CPU rendition of `fs_main`.
///
/// `normal` is the interpolated vertex normal, `samples` the two texture
/// lookups at the fragment's texture coordinate.
pub fn shade_fragment(
    uniforms: &MeshUniforms,
    normal: Vector3<f32>,
    samples: [Vector4<f32>; 2],
) -> Vector4<f32> {
    let base = blend(samples[0], samples[1], uniforms.blend_factor);
    match uniforms.mode() {
        ShadingMode::Flat => Vector3::from(uniforms.color).extend(1.0),
        ShadingMode::Textured => base,
        ShadingMode::Lit => lit_colour(
            normal,
            uniforms.light_pos.into(),
            uniforms.ambient,
            uniforms.specular_intensity,
            uniforms.shininess,
            base,
        ),
    }
}
