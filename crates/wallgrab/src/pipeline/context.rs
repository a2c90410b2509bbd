use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::RunIssue;

/// Mutable state owned by the worker for the duration of one run.
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    // Every file written to the output folder, in copy order
    pub files: Vec<PathBuf>,

    pub issues: Vec<RunIssue>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            files: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn into_result(self) -> RunResult {
        RunResult {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            files: self.files,
            issues: self.issues,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Handed to the caller with the `Completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<PathBuf>,
    pub issues: Vec<RunIssue>,
}

impl RunResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }
}
