pub mod background;
pub mod scanner;

pub use background::{ExtractionWorker, RunHandle};
pub use scanner::{AssetCandidate, AssetKind, DirectoryScanner};

// Re-export crossbeam_channel for callers draining run events
pub use crossbeam_channel;
