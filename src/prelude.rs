//! # Desk Folders Prelude
//!
//! Brings the types most callers need into scope:
//!
//! ```no_run
//! use deskfolders::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = DeskConfig::default();
//!     config.folder_count = 6;
//!     DeskApp::with_config(config)?.run()
//! }
//! ```

pub use crate::anim::{AnimationHandle, AnimationOutcome, Ease, Property, Timeline, Tweener};
pub use crate::app::DeskApp;
pub use crate::config::{AssetPaths, CameraConfig, DeskConfig, LightingConfig, TriggerConfig};
pub use crate::error::{LoadError, RenderError};
pub use crate::folders::{ClickOutcome, FolderDesk, FolderInstance, InteractionRouter};
pub use crate::gfx::scene::{NodeId, SceneGraph};

pub use cgmath::{Deg, Point3, Vector3};
