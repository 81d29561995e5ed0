//! Application-level error type

use crate::config::ConfigError;
use crate::render::RenderError;
use thiserror::Error;

/// Errors that end the application
///
/// Audio problems never show up here: the sound store absorbs them and
/// keeps the game running silently.
#[derive(Error, Debug)]
pub enum AppError {
    /// Window or presentation failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
