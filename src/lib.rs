//! mesh-drawer
//!
//! Renders one textured triangle mesh with wgpu. The mesh is placed by a
//! translation and two rotation angles, its surface blends two textures and
//! can be lit by a single white light with ambient, diffuse and specular
//! terms.
//!
//! High-level modules
//! - `math`: 4x4 matrix helpers (column-vector convention)
//! - `transform`: MVP composition, scene placement and perspective projection
//! - `shading`: the fragment shading model, its uniform block and a CPU rendition
//! - `drawer`: the renderable state (mesh, texture slots, light, flags) and `draw`
//! - `backend`: the trait the drawer renders through
//! - `context`: wgpu implementation of the backend (window or offscreen)
//! - `data_structures`: mesh geometry, GPU textures and the light
//! - `pipelines`: the mesh render pipeline
//! - `resources`: OBJ and image loading
//! - `input`: held arrow keys for moving the light
//! - `config`: start-up configuration
//! - `viewer`: the interactive window
//!

pub mod backend;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod drawer;
pub mod input;
pub mod math;
pub mod pipelines;
pub mod resources;
pub mod shading;
pub mod transform;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use image;
pub use wgpu;
