//! # Folder Desk
//!
//! Folder clones that sit in the holder and fly onto the table when clicked.
//!
//! - [`layout`] - resting positions on the table
//! - [`spawner`] - cloning the template into the holder
//! - [`animator`] - the lift, re-entry and slide sequence
//! - [`roles`] - which nodes count as trigger or holder for clicks
//! - [`interaction`] - click routing
//! - [`desk`] - the context object tying them together

pub mod animator;
pub mod desk;
pub mod interaction;
pub mod layout;
pub mod roles;
pub mod spawner;

pub use animator::FolderAnimator;
pub use desk::FolderDesk;
pub use interaction::{ClickOutcome, InteractionRouter};
pub use layout::{compute_target, compute_target_with, scatter_center_x, ScatterTransform};
pub use roles::{NodeRole, RoleMap, HOLDER_NAME};
pub use spawner::{spawn, FolderInstance};
