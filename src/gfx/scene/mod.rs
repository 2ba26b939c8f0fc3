//! # Scene Management Module
//!
//! Node hierarchy, shared geometry and vertex formats for the desk scene.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Arena of nodes with parent/child links and shared meshes
//! - [`Node`] - Name, local [`Transform`], optional mesh, [`Material`] and flags
//! - [`Mesh`] - Immutable CPU geometry with local bounds
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ## Usage
//!
//! ```rust
//! use deskfolders::gfx::scene::SceneGraph;
//!
//! let mut scene = SceneGraph::new();
//! let holder = scene.create_node("fileHolder");
//! scene.add_to_root(holder);
//! assert_eq!(scene.find_by_name(scene.root(), "fileHolder"), Some(holder));
//! ```
//!
//! Cloning a subtree copies transforms and materials but shares geometry, so
//! spawning many copies of a model is cheap and every copy moves on its own.

pub mod graph;
pub mod mesh;
pub mod vertex;

pub use graph::{Material, MeshId, Node, NodeId, NodeTag, SceneGraph, Transform};
pub use mesh::Mesh;
pub use vertex::Vertex3D;
