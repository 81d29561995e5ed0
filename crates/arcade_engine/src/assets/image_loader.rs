//! Image loading utilities

use crate::assets::AssetError;
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;

/// Load an image and scale it to exactly `width` x `height`
///
/// Aspect ratio is not preserved, matching a stretched background.
pub fn load_scaled(path: &Path, width: u32, height: u32) -> Result<RgbaImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    log::debug!("Loading image from: {:?}", path);
    let image = image::open(path).map_err(|source| AssetError::LoadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let (source_width, source_height) = (image.width(), image.height());
    let rgba = if (source_width, source_height) == (width, height) {
        image.to_rgba8()
    } else {
        image.resize_exact(width, height, FilterType::Triangle).to_rgba8()
    };

    log::info!(
        "Loaded image {}x{} from {:?} (scaled to {}x{})",
        source_width,
        source_height,
        path,
        width,
        height
    );
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_is_scaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splash.png");
        RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let image = load_scaled(&path, 8, 8).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        assert_eq!(*image.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_scaled(&dir.path().join("splash.png"), 200, 200);
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splash.png");
        std::fs::write(&path, b"not a png").unwrap();

        let result = load_scaled(&path, 200, 200);
        assert!(matches!(result, Err(AssetError::LoadFailed { .. })));
    }
}
