//! A single external package-extraction executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::config::ToolConfig;
use crate::error::ExtractError;

/// Longest slice of tool output kept in an error message.
const MAX_DETAIL_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVariant {
    pub name: String,
    pub path: PathBuf,
}

impl ToolVariant {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Runs `<tool> extract <archive> -o <destination>` and waits for it.
    pub fn run(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        let output = Command::new(&self.path)
            .arg("extract")
            .arg(archive)
            .arg("-o")
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ExtractError::Launch {
                tool: self.name.clone(),
                source: e,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ExtractError::ExitStatus {
                tool: self.name.clone(),
                status: output.status.to_string(),
                detail: format_tool_error(&output),
            })
        }
    }
}

impl From<&ToolConfig> for ToolVariant {
    fn from(config: &ToolConfig) -> Self {
        Self::new(&config.name, &config.path)
    }
}

/// Prefers stderr, falls back to stdout, trimmed to a readable length.
fn format_tool_error(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let detail = match (stderr.is_empty(), stdout.is_empty()) {
        (true, true) => return "no output".to_string(),
        (false, _) => stderr,
        (true, false) => stdout,
    };

    if detail.chars().count() > MAX_DETAIL_LEN {
        let cut: String = detail.chars().take(MAX_DETAIL_LEN).collect();
        format!("{}...", cut)
    } else {
        detail
    }
}
