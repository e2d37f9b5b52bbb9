pub mod debug;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use detection::{PipDetector, PipThresholds};
pub use error::PipError;
pub use models::{CandidateCircle, Classification, Contour, Pip, PipDetection, RejectReason};
pub use pipeline::{process_folder, FileOutcome, FileReport};
pub use debug::DebugConfig;
