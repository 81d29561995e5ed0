//! # Rendering System
//!
//! Frames are drawn on the CPU into a [`Canvas`] and handed to a [`Display`]
//! for presentation.
//!
//! ## Architecture
//!
//! - **Canvas**: RGBA software raster with fills, blits and progress bars
//! - **Text**: `fontdue` glyph rasterization straight onto a canvas
//! - **Display**: window + event source abstraction used by the loading
//!   screen and the scene loop
//! - **Vulkan Backend**: copies finished canvases into swapchain images

pub mod canvas;
pub mod display;
pub mod text;
pub mod vulkan;
pub mod window;

pub use canvas::{colors, Canvas, Color};
pub use display::Display;
pub use text::TextRenderer;
pub use window::GlfwDisplay;

use thiserror::Error;

/// Rendering and windowing errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Window system failure
    #[error("Window error: {0}")]
    Window(String),

    /// Vulkan presentation failure
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vulkan::VulkanError),

    /// Font could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// A frame could not be shown
    #[error("Failed to present frame: {0}")]
    Present(String),
}
