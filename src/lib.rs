// src/lib.rs
//! Desk Folders
//!
//! An interactive desk scene built on wgpu and winit: folders are cloned into a
//! holder on a shelf and tweened onto the table when the holder or the trigger
//! next to it is clicked.

pub mod anim;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod folders;
pub mod gfx;
pub mod loading;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::DeskApp;
pub use config::DeskConfig;
