use image::GrayImage;
use imageproc::contours::find_contours;
use crate::models::Contour;

/// Source of closed boundary curves for a binary raster
pub trait ContourExtractor {
    /// Every contour in the image, outer borders and hole borders alike, with nesting discarded
    fn extract(&self, binary: &GrayImage) -> Vec<Contour>;
}

/// Border following from `imageproc`. Any non-zero pixel counts as foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderFollowing;

impl ContourExtractor for BorderFollowing {
    fn extract(&self, binary: &GrayImage) -> Vec<Contour> {
        find_contours::<i32>(binary)
            .into_iter()
            .map(|c| Contour::new(c.points))
            .collect()
    }
}
