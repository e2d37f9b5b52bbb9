use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use std::path::{Path, PathBuf};
use crate::error::{PipError, Result};
use crate::models::Pip;

pub const INPUT_FILENAME: &str = "1_input_binary.jpg";
pub const ANNOTATED_FILENAME: &str = "2_detected_pips.jpg";

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_HALF_WIDTH: i32 = 1;
const CENTER_RADIUS: i32 = 2;

/// Debug configuration for per-image artifacts
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Whether debug images are written at all
    pub enabled: bool,
    /// Folder created next to each input image to hold its artifacts
    pub dir_name: String,
}

impl DebugConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir_name: "debug".to_string(),
        }
    }
}

/// `<parent>/<dir_name>/<file stem>/` for an input image
pub fn artifact_dir(image_path: &Path, dir_name: &str) -> PathBuf {
    let parent = image_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parent.join(dir_name).join(stem)
}

/// Color copy of the input with every pip outlined and its center marked
pub fn render_annotated(binary: &GrayImage, pips: &[Pip]) -> RgbImage {
    let mut canvas = RgbImage::from_fn(binary.width(), binary.height(), |x, y| {
        let v = binary.get_pixel(x, y)[0];
        Rgb([v, v, v])
    });

    for pip in pips {
        // Stroke straddles the pip radius
        for offset in -OUTLINE_HALF_WIDTH..=OUTLINE_HALF_WIDTH {
            let r = (pip.radius + offset).max(0);
            draw_hollow_circle_mut(&mut canvas, pip.center, r, OUTLINE_COLOR);
        }
        draw_filled_circle_mut(&mut canvas, pip.center, CENTER_RADIUS, CENTER_COLOR);
    }

    canvas
}

/// Write the input raster and its annotated copy; returns the artifact folder
pub fn write_artifacts(
    image_path: &Path,
    binary: &GrayImage,
    pips: &[Pip],
    dir_name: &str,
) -> Result<PathBuf> {
    let dir = artifact_dir(image_path, dir_name);
    std::fs::create_dir_all(&dir).map_err(|e| PipError::DebugOutput {
        path: dir.clone(),
        source: image::ImageError::IoError(e),
    })?;

    let input_path = dir.join(INPUT_FILENAME);
    binary.save(&input_path).map_err(|source| PipError::DebugOutput {
        path: input_path.clone(),
        source,
    })?;

    let annotated_path = dir.join(ANNOTATED_FILENAME);
    render_annotated(binary, pips)
        .save(&annotated_path)
        .map_err(|source| PipError::DebugOutput {
            path: annotated_path.clone(),
            source,
        })?;

    Ok(dir)
}
