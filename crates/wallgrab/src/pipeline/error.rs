use serde::Serialize;

/// Something that went wrong (or was merely noteworthy) for one path,
/// package or file. None of these stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunIssue {
    PathNotFound { path: String },
    DirectoryListError { path: String, error: String },
    /// Informational: the path held no packages.
    NoArchivesFound { path: String },
    ExtractionFailed { archive: String, error: String },
    CopyFailed { source: String, error: String },
    ScratchCleanupFailed { path: String, error: String },
}

impl RunIssue {
    pub fn is_error(&self) -> bool {
        !matches!(self, RunIssue::NoArchivesFound { .. })
    }
}
