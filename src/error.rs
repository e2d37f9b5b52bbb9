use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipError {
    /// The file could not be opened or decoded as an image
    #[error("could not read image at {}: {source}", .path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Writing a debug artifact failed
    #[error("failed to write debug output {}: {source}", .path.display())]
    DebugOutput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to list folder {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a result line failed
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
}

pub type Result<T> = std::result::Result<T, PipError>;
