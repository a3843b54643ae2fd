//! Renderer data structures: mesh geometry, textures and the light.
//!
//! - `mesh` holds host-side geometry streams and their GPU buffers
//! - `texture` is the GPU texture wrapper and the image sampling rule
//! - `light` is the single light with its ambient/specular terms

pub mod light;
pub mod mesh;
pub mod texture;
