use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::detection::PipDetector;
use crate::detection::contours::ContourExtractor;
use crate::error::{PipError, Result};

/// Extensions picked up by the folder scan, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// What happened to one file of the batch
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Counted(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn count(&self) -> Option<usize> {
        match self.outcome {
            FileOutcome::Counted(n) => Some(n),
            FileOutcome::Failed(_) => None,
        }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            FileOutcome::Counted(n) => write!(f, "Found {} pips in {}", n, self.file_name),
            FileOutcome::Failed(reason) => {
                write!(f, "Error processing {}: {}", self.file_name, reason)
            }
        }
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name. Subfolders are not entered.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir_err = |source| PipError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.is_file() && is_image_file(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Collapse runs of whitespace, line breaks included, so a reason fits on one console line
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run the detector on a single file, turning any failure into a report
pub fn process_image<E: ContourExtractor>(detector: &PipDetector<E>, path: &Path) -> FileReport {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = match detector.process_file(path) {
        Ok(detection) => FileOutcome::Counted(detection.count()),
        Err(e) => {
            warn!(file = %file_name, error = %e, "skipping file");
            FileOutcome::Failed(single_line(&e.to_string()))
        }
    };

    FileReport { file_name, outcome }
}

/// Process every image in `dir`, writing one result line per file to `out`.
///
/// A file that fails is reported and skipped; only an unreadable folder or a
/// failing `out` ends the batch early.
pub fn process_folder<E, W>(dir: &Path, detector: &PipDetector<E>, out: &mut W) -> Result<Vec<FileReport>>
where
    E: ContourExtractor,
    W: Write,
{
    let images = list_images(dir)?;
    info!(folder = %dir.display(), images = images.len(), "processing folder");

    let mut reports = Vec::with_capacity(images.len());
    for path in &images {
        let report = process_image(detector, path);
        writeln!(out, "{}", report)?;
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| r.count().is_none()).count();
    info!(processed = reports.len(), failed, "folder done");

    Ok(reports)
}
