//! # Asset Loading
//!
//! Model files are read on a background thread and handed to the render loop
//! as [`LoadEvent`]s. The world always loads first so its holder can be found
//! before the folder template arrives.

pub mod obj_loader;
pub mod pipeline;
pub mod world;

pub use obj_loader::{AssetLoader, ModelBundle, ModelPart, ObjLoader};
pub use pipeline::{run_pipeline, start_loading, AssetKind, LoadEvent, LoadingHandle};
pub use world::{prepare_world, PreparedWorld};
