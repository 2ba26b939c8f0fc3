// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Depth targets and the per-frame global uniforms.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform, PointLightUniform};
pub use texture_resource::TextureResource;
