pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod input;
pub mod launcher;
pub mod pipeline;
pub mod storage;
pub mod telemetry;
pub mod worker;

pub use config::{load_config, Config};
pub use error::{
    ConfigError, ExtractError, LaunchError, Result, ScanError, StorageError, WallgrabError,
    WorkerError,
};
pub use extractor::{ExternalExtractor, ExtractOutcome, ToolVariant};
pub use filter::{AssetFilter, FilterDecision};
pub use input::{parse_path_list, InputPath};
pub use launcher::{Launcher, NoopLauncher, SystemLauncher};
pub use pipeline::{ExtractionEvent, Pipeline, PipelineConfig, ProgressReporter, RunResult};
pub use storage::{OutputStore, ScratchSpace};
pub use worker::{ExtractionWorker, RunHandle};
