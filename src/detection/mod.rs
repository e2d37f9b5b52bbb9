pub mod preprocessing;
pub mod contours;
pub mod circles;

use image::GrayImage;
use std::path::Path;
use tracing::{debug, info};
use crate::debug::{self as debug_output, DebugConfig};
use crate::error::{PipError, Result};
use crate::models::PipDetection;
use self::contours::{BorderFollowing, ContourExtractor};

/// Geometric limits a contour must satisfy to count as a pip.
///
/// The defaults (5 to 50 px, circularity above 0.8) are fixed values with no
/// calibration behind them; override them when the image scale differs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipThresholds {
    /// Smallest accepted enclosing-circle radius, inclusive
    pub min_radius: u32,
    /// Largest accepted enclosing-circle radius, inclusive
    pub max_radius: u32,
    /// Circularity must be strictly greater than this
    pub circularity_threshold: f64,
}

impl PipThresholds {
    pub fn new() -> Self {
        Self {
            min_radius: 5,
            max_radius: 50,
            circularity_threshold: 0.8,
        }
    }

    pub fn with_min_radius(mut self, min_radius: u32) -> Self {
        self.min_radius = min_radius;
        self
    }

    pub fn with_max_radius(mut self, max_radius: u32) -> Self {
        self.max_radius = max_radius;
        self
    }

    pub fn with_circularity_threshold(mut self, threshold: f64) -> Self {
        self.circularity_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_radius < self.min_radius {
            return Err(PipError::InvalidThresholds(format!(
                "max radius {} is below min radius {}",
                self.max_radius, self.min_radius
            )));
        }
        if !self.circularity_threshold.is_finite() || self.circularity_threshold <= 0.0 {
            return Err(PipError::InvalidThresholds(format!(
                "circularity threshold must be a positive number, got {}",
                self.circularity_threshold
            )));
        }
        Ok(())
    }
}

impl Default for PipThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-pass pip detector: contour extraction followed by per-contour classification
pub struct PipDetector<E = BorderFollowing> {
    pub thresholds: PipThresholds,
    pub debug: DebugConfig,
    extractor: E,
}

impl PipDetector<BorderFollowing> {
    pub fn new() -> Self {
        Self::with_extractor(BorderFollowing)
    }
}

impl Default for PipDetector<BorderFollowing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ContourExtractor> PipDetector<E> {
    pub fn with_extractor(extractor: E) -> Self {
        Self {
            thresholds: PipThresholds::default(),
            debug: DebugConfig::default(),
            extractor,
        }
    }

    pub fn with_thresholds(mut self, thresholds: PipThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Classify every contour of an in-memory binary raster. Touches no files.
    pub fn detect(&self, binary: &GrayImage) -> PipDetection {
        let all_contours = self.extractor.extract(binary);
        debug!(contours = all_contours.len(), "extracted contours");

        let pips = circles::filter_pips(&all_contours, &self.thresholds);

        PipDetection {
            pips,
            contours_examined: all_contours.len(),
        }
    }

    /// Read one image, detect its pips and, when enabled, write the debug artifacts next to it
    pub fn process_file(&self, path: &Path) -> Result<PipDetection> {
        let binary = preprocessing::load_binary(path)?;
        debug!(path = %path.display(), width = binary.width(), height = binary.height(), "loaded image");

        let detection = self.detect(&binary);
        info!(
            path = %path.display(),
            pips = detection.count(),
            contours = detection.contours_examined,
            "detection finished"
        );

        if self.debug.enabled {
            let dir = debug_output::write_artifacts(path, &binary, &detection.pips, &self.debug.dir_name)?;
            debug!(dir = %dir.display(), "wrote debug images");
        }

        Ok(detection)
    }
}
