use std::convert::Infallible;

use mesh_drawer::{
    backend::{DrawCall, RenderBackend},
    data_structures::{mesh::MeshGeometry, texture::TextureSampling},
    image::DynamicImage,
    shading::MeshUniforms,
};

/// A texture as the mock backend remembers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTexture {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub sampling: TextureSampling,
}

/// Everything the drawer handed over in one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub mesh: Option<usize>,
    pub vertex_count: u32,
    pub uniforms: MeshUniforms,
    pub textures: [Option<MockTexture>; 2],
}

/// Records uploads and draws instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub meshes: Vec<MeshGeometry>,
    pub textures: Vec<MockTexture>,
    pub draws: Vec<RecordedDraw>,
}

impl MockBackend {
    pub fn last_draw(&self) -> &RecordedDraw {
        self.draws.last().expect("nothing was drawn")
    }
}

impl RenderBackend for MockBackend {
    type Mesh = usize;
    type Texture = MockTexture;
    type Error = Infallible;

    fn create_mesh(&mut self, geometry: &MeshGeometry) -> usize {
        self.meshes.push(geometry.clone());
        self.meshes.len() - 1
    }

    fn create_texture(
        &mut self,
        image: &DynamicImage,
        sampling: TextureSampling,
    ) -> anyhow::Result<MockTexture> {
        let texture = MockTexture {
            id: self.textures.len(),
            width: image.width(),
            height: image.height(),
            sampling,
        };
        self.textures.push(texture);
        Ok(texture)
    }

    fn draw(&mut self, call: DrawCall<'_, usize, MockTexture>) -> Result<(), Infallible> {
        self.draws.push(RecordedDraw {
            mesh: call.mesh.copied(),
            vertex_count: call.vertex_count,
            uniforms: call.uniforms,
            textures: [call.textures[0].copied(), call.textures[1].copied()],
        });
        Ok(())
    }
}
