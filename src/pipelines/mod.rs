//! Render pipelines.
//!
//! - `mesh` is the textured, optionally lit mesh pipeline

pub mod mesh;
