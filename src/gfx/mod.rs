//! # Graphics Module
//!
//! Everything between the folder logic and the GPU.
//!
//! - **Scene** ([`scene`]) - Node arena, shared meshes and materials
//! - **Camera** ([`camera`]) - Fixed perspective camera and click-ray unprojection
//! - **Picking** ([`picking`]) - Ray casting against scene meshes
//! - **Geometry** ([`geometry`]) - Procedural primitives (the trigger sphere)
//! - **Rendering** ([`rendering`]) - Forward renderer with ambient and point lights
//! - **Resources** ([`resources`]) - Global uniforms and depth textures

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use rendering::RenderEngine;
