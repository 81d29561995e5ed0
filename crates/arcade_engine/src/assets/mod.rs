//! Asset loading helpers

pub mod image_loader;

pub use image_loader::load_scaled;

use std::path::PathBuf;
use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File does not exist
    #[error("Asset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but could not be decoded
    #[error("Failed to load '{}': {source}", path.display())]
    LoadFailed {
        /// Asset path
        path: PathBuf,
        /// Decoder error
        source: image::ImageError,
    },
}
