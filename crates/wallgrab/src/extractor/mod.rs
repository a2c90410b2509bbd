//! Package extraction through external tools with ordered fallback.

pub mod tool;

use std::path::Path;

use log::{info, warn};

use crate::error::ExtractError;
use crate::storage::ScratchSpace;

pub use tool::ToolVariant;

#[derive(Debug)]
pub enum ExtractOutcome {
    /// `tool` exited cleanly and the scratch directory holds only its output.
    Extracted {
        tool: String,
        failed_attempts: Vec<ExtractError>,
    },
    /// Every tool failed. Nothing in the scratch directory may be used.
    Failed { attempts: Vec<ExtractError> },
}

impl ExtractOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ExtractOutcome::Extracted { .. })
    }
}

pub struct ExternalExtractor {
    tools: Vec<ToolVariant>,
}

impl ExternalExtractor {
    /// `tools` are tried in order, newest first.
    pub fn new(tools: Vec<ToolVariant>) -> Self {
        Self { tools }
    }

    /// Extracts `archive` into `scratch`, falling back to the next tool when
    /// one fails to launch or exits non-zero. The scratch directory is
    /// emptied before each fallback so a failed attempt's partial output is
    /// never mixed into the next one. Never returns an error; failures are
    /// collected in the outcome.
    pub fn extract(&self, archive: &Path, scratch: &ScratchSpace) -> ExtractOutcome {
        let mut failures = Vec::new();

        for (index, tool) in self.tools.iter().enumerate() {
            if index > 0 {
                if let Err(e) = scratch.reset() {
                    failures.push(ExtractError::Scratch {
                        tool: tool.name.clone(),
                        source: e,
                    });
                    break;
                }
            }

            match tool.run(archive, scratch.path()) {
                Ok(()) => {
                    info!("Extracted {} with {}", archive.display(), tool.name);
                    return ExtractOutcome::Extracted {
                        tool: tool.name.clone(),
                        failed_attempts: failures,
                    };
                }
                Err(e) => {
                    warn!("{} failed on {}: {}", tool.name, archive.display(), e);
                    failures.push(e);
                }
            }
        }

        ExtractOutcome::Failed { attempts: failures }
    }
}
