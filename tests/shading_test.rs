use cgmath::{Vector3, Vector4};
use mesh_drawer::shading::{
    FLAT_COLOUR, MeshUniforms, ShadingMode, blend, lit_colour, reflect, shade_fragment,
};

mod common;
use common::assert_vec4_eq;

fn uniforms(show_tex: bool, enable_lighting: bool) -> MeshUniforms {
    MeshUniforms {
        mvp: [[0.0; 4]; 4],
        light_pos: [0.0, 0.0, 1.0],
        ambient: 0.5,
        color: FLAT_COLOUR,
        specular_intensity: 0.5,
        shininess: 16.0,
        blend_factor: 0.0,
        show_tex: show_tex as u32,
        enable_lighting: enable_lighting as u32,
    }
}

const RED: Vector4<f32> = Vector4::new(1.0, 0.0, 0.0, 1.0);
const GREEN: Vector4<f32> = Vector4::new(0.0, 1.0, 0.0, 1.0);
const BLUE: Vector4<f32> = Vector4::new(0.0, 0.0, 1.0, 1.0);
const WHITE: Vector4<f32> = Vector4::new(1.0, 1.0, 1.0, 1.0);

#[test]
fn uniform_block_matches_wgsl_layout() {
    assert_eq!(std::mem::size_of::<MeshUniforms>(), 112);
    assert_eq!(std::mem::offset_of!(MeshUniforms, light_pos), 64);
    assert_eq!(std::mem::offset_of!(MeshUniforms, ambient), 76);
    assert_eq!(std::mem::offset_of!(MeshUniforms, color), 80);
    assert_eq!(std::mem::offset_of!(MeshUniforms, specular_intensity), 92);
    assert_eq!(std::mem::offset_of!(MeshUniforms, shininess), 96);
    assert_eq!(std::mem::offset_of!(MeshUniforms, blend_factor), 100);
    assert_eq!(std::mem::offset_of!(MeshUniforms, show_tex), 104);
    assert_eq!(std::mem::offset_of!(MeshUniforms, enable_lighting), 108);
}

#[test]
fn mode_follows_texture_and_lighting_flags() {
    assert_eq!(ShadingMode::select(false, false), ShadingMode::Flat);
    assert_eq!(ShadingMode::select(false, true), ShadingMode::Flat);
    assert_eq!(ShadingMode::select(true, false), ShadingMode::Textured);
    assert_eq!(ShadingMode::select(true, true), ShadingMode::Lit);

    assert_eq!(uniforms(false, true).mode(), ShadingMode::Flat);
    assert_eq!(uniforms(true, true).mode(), ShadingMode::Lit);
}

#[test]
fn hidden_textures_give_flat_red_even_with_lighting() {
    let normal = Vector3::new(0.0, 0.0, 1.0);
    for lighting in [false, true] {
        let colour = shade_fragment(&uniforms(false, lighting), normal, [GREEN, BLUE]);
        assert_vec4_eq(colour, [1.0, 0.0, 0.0, 1.0]);
    }
}

#[test]
fn textured_mode_outputs_the_blended_sample() {
    let normal = Vector3::new(0.0, 0.0, 1.0);
    let mut u = uniforms(true, false);

    assert_vec4_eq(shade_fragment(&u, normal, [GREEN, BLUE]), [0.0, 1.0, 0.0, 1.0]);

    u.blend_factor = 1.0;
    assert_vec4_eq(shade_fragment(&u, normal, [GREEN, BLUE]), [0.0, 0.0, 1.0, 1.0]);

    u.blend_factor = 0.25;
    assert_vec4_eq(shade_fragment(&u, normal, [GREEN, BLUE]), [0.0, 0.75, 0.25, 1.0]);
}

#[test]
fn blend_interpolates_linearly() {
    assert_vec4_eq(blend(RED, BLUE, 0.0), [1.0, 0.0, 0.0, 1.0]);
    assert_vec4_eq(blend(RED, BLUE, 0.5), [0.5, 0.0, 0.5, 1.0]);
    assert_vec4_eq(blend(RED, BLUE, 1.0), [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn reflect_mirrors_about_the_normal() {
    let r = reflect(Vector3::new(1.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    assert_vec4_eq(r.extend(0.0), [1.0, 1.0, 0.0, 0.0]);
}

#[test]
fn light_along_the_normal_adds_diffuse_and_ambient() {
    // diffuse 1 + specular 0 (the eye looks along -light) + ambient 0.5
    let colour = lit_colour(
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, 1.0),
        0.5,
        0.5,
        16.0,
        WHITE,
    );
    assert_vec4_eq(colour, [1.5, 1.5, 1.5, 1.0]);
}

#[test]
fn grazing_light_is_specular_plus_ambient() {
    let colour = lit_colour(
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
        0.5,
        0.5,
        16.0,
        WHITE,
    );
    assert_vec4_eq(colour, [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn light_behind_the_surface_leaves_only_ambient() {
    let colour = lit_colour(
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, -1.0),
        0.25,
        0.5,
        16.0,
        GREEN,
    );
    assert_vec4_eq(colour, [0.0, 0.25, 0.0, 1.0]);
}

#[test]
fn lit_mode_keeps_the_sample_alpha_and_unnormalised_normals() {
    let half_transparent = Vector4::new(1.0, 1.0, 1.0, 0.5);
    let colour = shade_fragment(
        &uniforms(true, true),
        Vector3::new(0.0, 0.0, 4.0),
        [half_transparent, half_transparent],
    );
    assert_vec4_eq(colour, [1.5, 1.5, 1.5, 0.5]);
}
