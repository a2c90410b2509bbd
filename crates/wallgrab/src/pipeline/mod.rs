pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::{RunContext, RunResult};
pub use error::RunIssue;
pub use progress::{
    BroadcastProgress, ChannelProgress, CollectingProgress, ExtractionEvent, NoopProgress,
    ProgressReporter, TimestampedEvent,
};
pub use runner::Pipeline;
