use image::{GrayImage, ImageReader};
use std::path::Path;
use crate::error::{PipError, Result};

/// Read an already-thresholded image from disk as a single-channel raster.
/// No binarization happens here: every non-zero pixel is later treated as foreground.
pub fn load_binary(path: &Path) -> Result<GrayImage> {
    let unreadable = |source| PipError::UnreadableImage {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(|e| unreadable(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| unreadable(image::ImageError::IoError(e)))?
        .decode()
        .map_err(unreadable)?;

    Ok(img.to_luma8())
}
