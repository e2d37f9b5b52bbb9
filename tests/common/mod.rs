mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from dominopips for tests
pub use dominopips::{
    process_folder, DebugConfig, FileOutcome, FileReport, PipDetector, PipThresholds,
};
