pub mod output;
pub mod scratch;

pub use output::OutputStore;
pub use scratch::{CleanupStatus, ScratchGuard, ScratchSpace};
