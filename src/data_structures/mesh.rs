//! Mesh geometry on the host and on the GPU.
//!
//! [`MeshGeometry`] is a non-indexed triangle list stored as three parallel
//! attribute streams. [`GpuMesh`] keeps one vertex buffer per stream so each
//! attribute binds to its own slot, mirroring the `pos`, `texCoord` and
//! `normal` inputs of the mesh shader.

use wgpu::util::DeviceExt;

/// Three parallel vertex streams: positions (xyz), texture coordinates (uv)
/// and normals (xyz). Every three consecutive vertices form one triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshGeometry {
    pub fn new(positions: Vec<f32>, texcoords: Vec<f32>, normals: Vec<f32>) -> Self {
        Self {
            positions,
            texcoords,
            normals,
        }
    }

    /// Number of vertices handed to the draw call (`positions.len() / 3`).
    pub fn vertex_count(&self) -> u32 {
        (self.positions.len() / 3) as u32
    }

    /// Vertices every stream has data for. Zero if any stream is empty.
    pub fn drawable_vertex_count(&self) -> u32 {
        self.vertex_count()
            .min((self.texcoords.len() / 2) as u32)
            .min((self.normals.len() / 3) as u32)
    }

    /// Whether the three streams describe the same number of vertices.
    pub fn is_consistent(&self) -> bool {
        let vertices = self.positions.len() / 3;
        self.positions.len() % 3 == 0
            && self.texcoords.len() == vertices * 2
            && self.normals.len() == vertices * 3
    }
}

/// GPU copy of a [`MeshGeometry`].
#[derive(Debug)]
pub struct GpuMesh {
    pub positions: wgpu::Buffer,
    pub texcoords: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    /// Vertices every stream has data for.
    pub vertex_count: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, geometry: &MeshGeometry) -> Self {
        let buffer = |label: &str, data: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        Self {
            positions: buffer("Mesh Position Buffer", &geometry.positions),
            texcoords: buffer("Mesh TexCoord Buffer", &geometry.texcoords),
            normals: buffer("Mesh Normal Buffer", &geometry.normals),
            vertex_count: geometry.drawable_vertex_count(),
        }
    }

    const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
    const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

    /// Layouts for vertex buffer slots 0 (`pos`), 1 (`texCoord`) and 2 (`normal`).
    pub fn desc() -> [wgpu::VertexBufferLayout<'static>; 3] {
        [
            wgpu::VertexBufferLayout {
                array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: (2 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::TEXCOORD_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::NORMAL_ATTRIBUTES,
            },
        ]
    }
}

pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &GpuMesh, vertex_count: u32);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &GpuMesh, vertex_count: u32) {
        self.set_vertex_buffer(0, mesh.positions.slice(..));
        self.set_vertex_buffer(1, mesh.texcoords.slice(..));
        self.set_vertex_buffer(2, mesh.normals.slice(..));
        self.draw(0..vertex_count, 0..1);
    }
}
