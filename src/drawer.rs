//! The renderable state.
//!
//! [`MeshDrawer`] owns everything the shader reads: the current mesh, the two
//! texture slots, the light and the display flags. Its setters are the only
//! way to change shading inputs, and [`MeshDrawer::draw`] re-submits all of
//! it together with the caller's MVP matrix.

use image::DynamicImage;

use crate::{
    backend::{DrawCall, RenderBackend},
    config::DrawerConfig,
    data_structures::{light::LightState, mesh::MeshGeometry, texture::TextureSampling},
    input::HeldKeys,
    math::Matrix4,
    shading::{FLAT_COLOUR, MeshUniforms, ShadingMode},
};

/// Base texture slot.
pub const BASE_SLOT: usize = 0;
/// Blend texture slot.
pub const BLEND_SLOT: usize = 1;

/// A texture unit that either has an uploaded image or does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSlot<T> {
    Unloaded,
    Loaded(T),
}

impl<T> TextureSlot<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TextureSlot::Loaded(_))
    }

    pub fn handle(&self) -> Option<&T> {
        match self {
            TextureSlot::Loaded(handle) => Some(handle),
            TextureSlot::Unloaded => None,
        }
    }
}

impl<T> Default for TextureSlot<T> {
    fn default() -> Self {
        TextureSlot::Unloaded
    }
}

pub struct MeshDrawer<B: RenderBackend> {
    mesh: Option<B::Mesh>,
    vertex_count: u32,
    textures: [TextureSlot<B::Texture>; 2],
    light: LightState,
    light_step: f32,
    show_texture: bool,
    blend_factor: f32,
}

impl<B: RenderBackend> MeshDrawer<B> {
    pub fn new(config: &DrawerConfig) -> Self {
        Self {
            mesh: None,
            vertex_count: 0,
            textures: Default::default(),
            light: LightState::new(config),
            light_step: config.light_step,
            show_texture: false,
            blend_factor: 0.0,
        }
    }

    /// Replaces the geometry. The previous mesh is dropped once the new one
    /// has been uploaded.
    pub fn set_mesh(&mut self, backend: &mut B, geometry: &MeshGeometry) {
        if !geometry.is_consistent() {
            log::warn!(
                "mesh streams disagree: {} position, {} texcoord and {} normal floats",
                geometry.positions.len(),
                geometry.texcoords.len(),
                geometry.normals.len()
            );
        }
        let mesh = backend.create_mesh(geometry);
        self.mesh = Some(mesh);
        self.vertex_count = geometry.vertex_count();
        log::debug!("mesh set with {} vertices", self.vertex_count);
    }

    /// Uploads `image` into `slot` (0 = base, 1 = blend).
    ///
    /// Power-of-two images are mipmapped, others are clamped and linearly
    /// filtered. Any other slot index is ignored.
    pub fn set_texture(
        &mut self,
        backend: &mut B,
        image: &DynamicImage,
        slot: usize,
    ) -> anyhow::Result<()> {
        let Some(target) = self.textures.get_mut(slot) else {
            log::warn!("ignoring texture for unknown slot {}", slot);
            return Ok(());
        };
        let sampling = TextureSampling::for_dimensions(image.width(), image.height());
        let handle = backend.create_texture(image, sampling)?;
        *target = TextureSlot::Loaded(handle);
        log::debug!(
            "texture slot {} loaded ({}x{}, {:?})",
            slot,
            image.width(),
            image.height(),
            sampling
        );
        Ok(())
    }

    /// Sets the mix between slot 0 and slot 1. Stays 0 while slot 1 is empty.
    pub fn set_texture_blend(&mut self, factor: f32) {
        self.blend_factor = if self.textures[BLEND_SLOT].is_loaded() {
            factor
        } else {
            0.0
        };
    }

    pub fn show_texture(&mut self, show: bool) {
        self.show_texture = show;
    }

    pub fn enable_lighting(&mut self, enabled: bool) {
        self.light.set_enabled(enabled);
    }

    pub fn set_ambient_light(&mut self, ambient: f32) {
        self.light.set_ambient(ambient);
    }

    pub fn set_specular_light(&mut self, specular_intensity: f32) {
        self.light.set_specular_intensity(specular_intensity);
    }

    /// Applies one fixed step per held arrow key to the light's x/y.
    pub fn update_light_position(&mut self, held: &HeldKeys) {
        self.light.step(held, self.light_step);
    }

    /// The uniform block for the next draw.
    pub fn uniforms(&self, mvp: &Matrix4) -> MeshUniforms {
        let mut uniforms = MeshUniforms {
            mvp: [[0.0; 4]; 4],
            light_pos: self.light.position().into(),
            ambient: self.light.ambient(),
            color: FLAT_COLOUR,
            specular_intensity: self.light.specular_intensity(),
            shininess: self.light.shininess(),
            blend_factor: self.blend_factor,
            show_tex: self.show_texture as u32,
            enable_lighting: self.light.is_enabled() as u32,
        };
        uniforms.set_mvp(mvp);
        uniforms
    }

    /// Binds the full current state and issues one draw over the current mesh.
    pub fn draw(&self, backend: &mut B, mvp: &Matrix4) -> Result<(), B::Error> {
        backend.draw(DrawCall {
            mesh: self.mesh.as_ref(),
            vertex_count: self.vertex_count,
            uniforms: self.uniforms(mvp),
            textures: [
                self.textures[BASE_SLOT].handle(),
                self.textures[BLEND_SLOT].handle(),
            ],
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    pub fn light(&self) -> &LightState {
        &self.light
    }

    pub fn is_texture_shown(&self) -> bool {
        self.show_texture
    }

    pub fn texture_loaded(&self, slot: usize) -> bool {
        self.textures.get(slot).is_some_and(TextureSlot::is_loaded)
    }

    pub fn shading_mode(&self) -> ShadingMode {
        ShadingMode::select(self.show_texture, self.light.is_enabled())
    }
}
