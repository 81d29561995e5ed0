//! Presentation surface abstraction

use crate::events::AppEvent;
use crate::render::{Canvas, RenderError};

/// A window the engine can draw into and read events from
///
/// Implemented by [`GlfwDisplay`](crate::render::GlfwDisplay); tests use an
/// in-memory implementation.
pub trait Display {
    /// Pump the window system and return events since the last call
    fn poll_events(&mut self) -> Vec<AppEvent>;

    /// Show a finished frame
    fn present(&mut self, canvas: &Canvas) -> Result<(), RenderError>;

    /// Change the window title
    fn set_title(&mut self, title: &str);

    /// Change the client size, optionally re-centering on the primary monitor
    fn resize(&mut self, width: u32, height: u32, centered: bool) -> Result<(), RenderError>;

    /// Current client size in pixels
    fn size(&self) -> (u32, u32);
}
