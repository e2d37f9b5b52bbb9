use image::{DynamicImage, GrayImage, Luma};
use std::path::{Path, PathBuf};

/// Black raster with white filled disks given as (cx, cy, radius)
pub fn disk_image(width: u32, height: u32, disks: &[(i32, i32, i32)]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inside = disks.iter().any(|&(cx, cy, r)| {
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            dx * dx + dy * dy <= r * r
        });
        if inside { Luma([255]) } else { Luma([0]) }
    })
}

/// Three well separated pips of radius 12 to 14
pub fn three_pips() -> GrayImage {
    disk_image(160, 60, &[(25, 30, 12), (75, 30, 13), (125, 30, 14)])
}

/// Two pips on a white domino face: black tile, white pips, white background
pub fn two_pips_on_tile() -> GrayImage {
    let pips = disk_image(200, 120, &[(70, 60, 13), (130, 60, 13)]);
    GrayImage::from_fn(200, 120, |x, y| {
        let on_tile = (20..180).contains(&x) && (15..105).contains(&y);
        if !on_tile || pips.get_pixel(x, y)[0] > 0 {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Save a raster into `dir`, picking the encoder from the file extension
pub fn save_image(dir: &Path, name: &str, img: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    DynamicImage::ImageLuma8(img.clone())
        .to_rgb8()
        .save(&path)
        .expect("Failed to save fixture image");
    path
}

/// Write arbitrary bytes into `dir`
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture file");
    path
}

/// Detector with debug images switched on
pub fn debug_detector() -> dominopips::PipDetector {
    dominopips::PipDetector::new().with_debug(dominopips::DebugConfig::enabled())
}
