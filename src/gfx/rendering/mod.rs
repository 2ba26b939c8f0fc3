// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Turns the scene graph into draw calls and owns the GPU side of meshes.

pub mod draw_list;
pub mod gpu_mesh;
pub mod render_engine;

pub use draw_list::{collect_draws, DrawItem, ObjectUniform};
pub use render_engine::RenderEngine;
