use approx::assert_abs_diff_eq;
use cgmath::{SquareMatrix, Vector3};
use mesh_drawer::{
    config::DrawerConfig,
    context::drawable_count,
    data_structures::{
        mesh::MeshGeometry,
        texture::{Texture, TextureSampling},
    },
    drawer::{BASE_SLOT, BLEND_SLOT, MeshDrawer},
    image::DynamicImage,
    input::{HeldKeys, LightKey},
    math::{self, Matrix4},
    shading::{FLAT_COLOUR, ShadingMode},
};

mod common;
use common::{EPSILON, mock_backend::MockBackend};

fn triangle() -> MeshGeometry {
    MeshGeometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
    )
}

fn quad() -> MeshGeometry {
    let mut geometry = triangle();
    geometry
        .positions
        .extend_from_slice(&[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    geometry
        .texcoords
        .extend_from_slice(&[1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    geometry
        .normals
        .extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    geometry
}

fn setup() -> (MeshDrawer<MockBackend>, MockBackend) {
    (MeshDrawer::new(&DrawerConfig::default()), MockBackend::default())
}

#[test]
fn starts_flat_with_defaults() {
    let (drawer, _) = setup();
    assert_eq!(drawer.shading_mode(), ShadingMode::Flat);
    assert_eq!(drawer.vertex_count(), 0);
    assert_eq!(drawer.blend_factor(), 0.0);
    assert!(!drawer.texture_loaded(BASE_SLOT));
    assert!(!drawer.texture_loaded(BLEND_SLOT));

    let light = drawer.light();
    assert_eq!(light.position(), Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(light.ambient(), 0.5);
    assert_eq!(light.specular_intensity(), 0.5);
    assert_eq!(light.shininess(), 16.0);
    assert!(!light.is_enabled());
}

#[test]
fn blend_is_forced_to_zero_without_a_blend_texture() {
    let (mut drawer, mut backend) = setup();
    drawer.set_texture_blend(0.7);
    assert_eq!(drawer.blend_factor(), 0.0);

    // A base texture alone is not enough.
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(4, 4), BASE_SLOT)
        .unwrap();
    drawer.set_texture_blend(0.7);
    assert_eq!(drawer.blend_factor(), 0.0);

    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(4, 4), BLEND_SLOT)
        .unwrap();
    drawer.set_texture_blend(0.7);
    assert_abs_diff_eq!(drawer.blend_factor(), 0.7, epsilon = EPSILON);

    drawer.draw(&mut backend, &Matrix4::identity()).unwrap();
    assert_abs_diff_eq!(
        backend.last_draw().uniforms.blend_factor,
        0.7,
        epsilon = EPSILON
    );
}

#[test]
fn loading_the_blend_texture_keeps_a_previously_forced_blend() {
    let (mut drawer, mut backend) = setup();
    drawer.set_texture_blend(0.5);
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(2, 2), BLEND_SLOT)
        .unwrap();
    assert_eq!(drawer.blend_factor(), 0.0);
}

#[test]
fn texture_sampling_depends_on_power_of_two_dimensions() {
    let (mut drawer, mut backend) = setup();
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(256, 64), BASE_SLOT)
        .unwrap();
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(100, 64), BLEND_SLOT)
        .unwrap();

    assert_eq!(backend.textures.len(), 2);
    assert_eq!(backend.textures[0].sampling, TextureSampling::Mipmapped);
    assert_eq!(backend.textures[1].sampling, TextureSampling::ClampLinear);
    assert_eq!((backend.textures[1].width, backend.textures[1].height), (100, 64));
}

#[test]
fn mip_chain_goes_down_to_one_pixel() {
    assert_eq!(TextureSampling::Mipmapped.mip_level_count(256, 64), 9);
    assert_eq!(TextureSampling::Mipmapped.mip_level_count(1, 1), 1);
    assert_eq!(TextureSampling::ClampLinear.mip_level_count(100, 64), 1);
}

#[test]
fn textures_are_sampled_without_srgb_decoding() {
    assert_eq!(Texture::COLOR_FORMAT, mesh_drawer::wgpu::TextureFormat::Rgba8Unorm);
    assert!(!Texture::COLOR_FORMAT.is_srgb());
}

#[test]
fn unknown_texture_slot_is_ignored() {
    let (mut drawer, mut backend) = setup();
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(4, 4), 2)
        .unwrap();

    assert!(backend.textures.is_empty());
    assert!(!drawer.texture_loaded(BASE_SLOT));
    assert!(!drawer.texture_loaded(BLEND_SLOT));
    assert!(!drawer.texture_loaded(2));
}

#[test]
fn replacing_a_texture_rebinds_the_slot() {
    let (mut drawer, mut backend) = setup();
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(4, 4), BASE_SLOT)
        .unwrap();
    drawer
        .set_texture(&mut backend, &DynamicImage::new_rgb8(8, 8), BASE_SLOT)
        .unwrap();
    drawer.draw(&mut backend, &Matrix4::identity()).unwrap();

    let bound = backend.last_draw().textures;
    assert_eq!(bound[0].map(|t| (t.id, t.width)), Some((1, 8)));
    assert_eq!(bound[1], None);
}

#[test]
fn draw_without_a_mesh_still_submits_state() {
    let (drawer, mut backend) = setup();
    drawer.draw(&mut backend, &Matrix4::identity()).unwrap();

    let draw = backend.last_draw();
    assert_eq!(draw.mesh, None);
    assert_eq!(draw.vertex_count, 0);
    assert_eq!(draw.textures, [None, None]);
}

#[test]
fn set_mesh_replaces_the_previous_mesh() {
    let (mut drawer, mut backend) = setup();
    drawer.set_mesh(&mut backend, &quad());
    assert_eq!(drawer.vertex_count(), 6);

    drawer.set_mesh(&mut backend, &triangle());
    assert_eq!(drawer.vertex_count(), 3);

    drawer.draw(&mut backend, &Matrix4::identity()).unwrap();
    let draw = backend.last_draw();
    assert_eq!(draw.mesh, Some(1));
    assert_eq!(draw.vertex_count, 3);
    assert_eq!(backend.meshes[1], triangle());
}

#[test]
fn vertex_count_comes_from_positions() {
    let (mut drawer, mut backend) = setup();
    let mut geometry = triangle();
    geometry.normals.truncate(3);
    drawer.set_mesh(&mut backend, &geometry);

    assert!(!geometry.is_consistent());
    assert_eq!(drawer.vertex_count(), 3);
}

#[test]
fn drawable_vertices_are_limited_by_the_shortest_stream() {
    assert_eq!(triangle().drawable_vertex_count(), 3);

    let mut no_normals = triangle();
    no_normals.normals.clear();
    assert_eq!(no_normals.vertex_count(), 3);
    assert_eq!(no_normals.drawable_vertex_count(), 0);

    let mut short_texcoords = quad();
    short_texcoords.texcoords.truncate(6);
    assert_eq!(short_texcoords.drawable_vertex_count(), 3);
}

#[test]
fn draw_count_is_clamped_to_the_uploaded_streams() {
    assert_eq!(drawable_count(6, 6), 6);
    assert_eq!(drawable_count(6, 3), 3);
    assert_eq!(drawable_count(3, 0), 0);
    assert_eq!(drawable_count(0, 3), 0);
}

#[test]
fn uniforms_carry_the_current_state() {
    let (mut drawer, mut backend) = setup();
    drawer.set_mesh(&mut backend, &triangle());
    drawer.show_texture(true);
    drawer.enable_lighting(true);
    drawer.set_ambient_light(0.2);
    drawer.set_specular_light(0.9);
    assert_eq!(drawer.shading_mode(), ShadingMode::Lit);

    let mvp = math::translation(1.0, 2.0, 3.0);
    drawer.draw(&mut backend, &mvp).unwrap();

    let uniforms = backend.last_draw().uniforms;
    assert_eq!(uniforms.mvp, math::to_column_major(&mvp));
    assert_eq!(uniforms.mvp_matrix(), mvp);
    assert_eq!(uniforms.light_pos, [1.0, 1.0, 1.0]);
    assert_eq!(uniforms.ambient, 0.2);
    assert_eq!(uniforms.specular_intensity, 0.9);
    assert_eq!(uniforms.shininess, 16.0);
    assert_eq!(uniforms.color, FLAT_COLOUR);
    assert_eq!(uniforms.show_tex, 1);
    assert_eq!(uniforms.enable_lighting, 1);
    assert_eq!(uniforms.mode(), ShadingMode::Lit);
}

#[test]
fn toggling_flags_walks_the_shading_modes() {
    let (mut drawer, _) = setup();
    drawer.enable_lighting(true);
    assert_eq!(drawer.shading_mode(), ShadingMode::Flat);

    drawer.show_texture(true);
    assert_eq!(drawer.shading_mode(), ShadingMode::Lit);

    drawer.enable_lighting(false);
    assert_eq!(drawer.shading_mode(), ShadingMode::Textured);

    drawer.show_texture(false);
    assert_eq!(drawer.shading_mode(), ShadingMode::Flat);
}

#[test]
fn held_arrow_keys_move_the_light_in_x_and_y() {
    let (mut drawer, _) = setup();

    drawer.update_light_position(&[LightKey::Up, LightKey::Right].into_iter().collect());
    assert_eq!(drawer.light().position(), Vector3::new(2.0, 2.0, 1.0));

    drawer.update_light_position(&[LightKey::Left].into_iter().collect());
    drawer.update_light_position(&[LightKey::Down].into_iter().collect());
    drawer.update_light_position(&[LightKey::Down].into_iter().collect());
    assert_eq!(drawer.light().position(), Vector3::new(1.0, 0.0, 1.0));

    // Opposite keys cancel and nothing held means no movement.
    drawer.update_light_position(&[LightKey::Up, LightKey::Down].into_iter().collect());
    drawer.update_light_position(&HeldKeys::new());
    assert_eq!(drawer.light().position(), Vector3::new(1.0, 0.0, 1.0));
}

#[test]
fn light_step_comes_from_config() {
    let config = DrawerConfig {
        light_step: 0.5,
        light_position: [0.0, 0.0, 3.0],
        ..Default::default()
    };
    let mut drawer = MeshDrawer::<MockBackend>::new(&config);
    drawer.update_light_position(&[LightKey::Left].into_iter().collect());
    assert_eq!(drawer.light().position(), Vector3::new(-0.5, 0.0, 3.0));
}

#[test]
fn held_keys_track_presses_and_releases() {
    let mut held = HeldKeys::new();
    assert!(held.is_empty());

    held.press(LightKey::Up);
    held.press(LightKey::Up);
    held.press(LightKey::Left);
    assert!(held.is_held(LightKey::Up));
    assert!(held.is_held(LightKey::Left));

    held.release(LightKey::Up);
    assert!(!held.is_held(LightKey::Up));

    held.clear();
    assert!(held.is_empty());
}

#[test]
fn arrow_key_codes_map_to_light_keys() {
    use mesh_drawer::input::LightKey as K;
    use winit::keyboard::KeyCode;

    assert_eq!(K::from_key_code(KeyCode::ArrowUp), Some(K::Up));
    assert_eq!(K::from_key_code(KeyCode::ArrowDown), Some(K::Down));
    assert_eq!(K::from_key_code(KeyCode::ArrowLeft), Some(K::Left));
    assert_eq!(K::from_key_code(KeyCode::ArrowRight), Some(K::Right));
    assert_eq!(K::from_key_code(KeyCode::KeyW), None);
}
