//! Cache Viewer UI Layer
//!
//! Provides:
//! - egui components for the gallery
//! - wgpu rendering pipeline
//! - Input handling

pub mod renderer;
pub mod components;
pub mod input;
pub mod theme;

pub use renderer::{FrameOutput, Renderer};
pub use input::InputHandler;
pub use theme::Theme;
