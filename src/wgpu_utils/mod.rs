// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Small typed wrappers over buffers and bind group layouts.

pub mod binding_types;
pub mod uniform_buffer;

pub use binding_types::*;
pub use uniform_buffer::{align_to, DynamicUniformBuffer, UniformBuffer};
