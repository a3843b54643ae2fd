//! The seam between the renderable state and the GPU.
//!
//! [`crate::drawer::MeshDrawer`] never touches wgpu directly. It creates
//! meshes and textures through a [`RenderBackend`] and describes each frame as
//! a [`DrawCall`], which bundles every piece of state the shader needs. The
//! wgpu implementation lives in [`crate::context::Context`]; tests substitute
//! a recording backend.

use image::DynamicImage;

use crate::{
    data_structures::{mesh::MeshGeometry, texture::TextureSampling},
    shading::MeshUniforms,
};

/// One complete, self-contained draw: geometry, uniforms and both texture
/// slots. Backends bind all of it on every call.
#[derive(Debug)]
pub struct DrawCall<'a, M, T> {
    /// `None` until a mesh has been set.
    pub mesh: Option<&'a M>,
    pub vertex_count: u32,
    pub uniforms: MeshUniforms,
    /// Slot 0 is the base texture, slot 1 the blend texture.
    pub textures: [Option<&'a T>; 2],
}

pub trait RenderBackend {
    type Mesh;
    type Texture;
    type Error;

    fn create_mesh(&mut self, geometry: &MeshGeometry) -> Self::Mesh;

    fn create_texture(
        &mut self,
        image: &DynamicImage,
        sampling: TextureSampling,
    ) -> anyhow::Result<Self::Texture>;

    fn draw(&mut self, call: DrawCall<'_, Self::Mesh, Self::Texture>) -> Result<(), Self::Error>;
}
