//! Test harness for isolated pipeline runs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use wallgrab::config::FilterConfig;
use wallgrab::pipeline::{CollectingProgress, Pipeline, PipelineConfig, RunResult};
use wallgrab::{NoopLauncher, ToolVariant};

pub struct TestHarness {
    temp_dir: TempDir,
    /// Parent of all wallpaper folders handed to the pipeline.
    pub workshop_dir: PathBuf,
    pub output_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub tools_dir: PathBuf,
    tools: Vec<ToolVariant>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let workshop_dir = base.join("workshop");
        let tools_dir = base.join("tools");
        std::fs::create_dir_all(&workshop_dir).expect("Failed to create workshop dir");
        std::fs::create_dir_all(&tools_dir).expect("Failed to create tools dir");

        Self {
            output_dir: base.join("output"),
            scratch_dir: base.join("scratch"),
            temp_dir,
            workshop_dir,
            tools_dir,
            tools: Vec::new(),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates (or returns) a wallpaper folder below the workshop directory.
    pub fn wallpaper_dir(&self, name: &str) -> PathBuf {
        let dir = self.workshop_dir.join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create wallpaper dir");
        dir
    }

    pub fn write_file(&self, dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes a fake package. The fake tools "extract" it by creating one file
    /// per listed relative path, each containing its own path.
    pub fn write_package(&self, dir: &Path, name: &str, entries: &[&str]) -> PathBuf {
        let mut body = entries.join("\n");
        body.push('\n');
        self.write_file(dir, name, body.as_bytes())
    }

    /// Registers a tool that extracts fake packages and records its calls.
    #[cfg(unix)]
    pub fn add_working_tool(&mut self, name: &str) -> &mut Self {
        let body = format!(
            r#"echo {name} >> '{calls}'
while IFS= read -r entry; do
  [ -z "$entry" ] && continue
  mkdir -p "$4/$(dirname "$entry")"
  printf '%s' "$entry" > "$4/$entry"
done < "$2""#,
            name = name,
            calls = self.calls_log().display()
        );
        self.add_tool(name, &body)
    }

    /// Registers a tool that leaves partial output behind and exits non-zero.
    #[cfg(unix)]
    pub fn add_failing_tool(&mut self, name: &str) -> &mut Self {
        let body = format!(
            "echo {name} >> '{calls}'\nprintf junk > \"$4/partial.png\"\necho 'unsupported package version' >&2\nexit 1",
            name = name,
            calls = self.calls_log().display()
        );
        self.add_tool(name, &body)
    }

    /// Registers a tool path that does not exist.
    pub fn add_missing_tool(&mut self, name: &str) -> &mut Self {
        let path = self.tools_dir.join(format!("{}-missing", name));
        self.tools.push(ToolVariant::new(name, path));
        self
    }

    /// Registers a tool running `body` as a `sh` script. Arguments arrive as
    /// `extract <archive> -o <dir>` in `$1..$4`.
    #[cfg(unix)]
    pub fn add_tool(&mut self, name: &str, body: &str) -> &mut Self {
        use std::os::unix::fs::PermissionsExt;

        let path = self.tools_dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod tool");
        self.tools.push(ToolVariant::new(name, path));
        self
    }

    pub fn calls_log(&self) -> PathBuf {
        self.temp_dir.path().join("tool-calls.log")
    }

    /// Names of the tools invoked so far, in call order.
    pub fn tool_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.calls_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            output_directory: self.output_dir.clone(),
            scratch_directory: self.scratch_dir.clone(),
            tools: self.tools.clone(),
            asset_extensions: ["png", "jpg", "jpeg", "gif", "webp", "mp4", "webm"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            archive_extension: "pkg".to_string(),
            filter: FilterConfig::default(),
            open_results: false,
            open_delay: Duration::ZERO,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(Arc::new(self.config())).with_launcher(Arc::new(NoopLauncher))
    }

    pub fn run(&self, input: &str) -> (RunResult, CollectingProgress) {
        self.run_with_config(self.config(), input)
    }

    pub fn run_with_config(
        &self,
        config: PipelineConfig,
        input: &str,
    ) -> (RunResult, CollectingProgress) {
        let progress = CollectingProgress::new();
        let pipeline =
            Pipeline::from_config(Arc::new(config)).with_launcher(Arc::new(NoopLauncher));
        let result = pipeline.run(input, &progress);
        (result, progress)
    }

    /// False when running with privileges that ignore directory permissions.
    #[cfg(unix)]
    pub fn permissions_enforced(&self) -> bool {
        use std::os::unix::fs::PermissionsExt;

        let dir = self.temp_dir.path().join("perm-check");
        std::fs::create_dir_all(&dir).expect("Failed to create perm-check dir");
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555))
            .expect("Failed to chmod perm-check dir");
        let writable = std::fs::write(dir.join("write-check"), b"x").is_ok();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to restore perm-check dir");
        !writable
    }

    /// Sorted file names currently in the output directory.
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries
                .map(|e| {
                    e.expect("Failed to read entry")
                        .file_name()
                        .to_string_lossy()
                        .to_string()
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

/// Quotes and comma-joins paths the way a file manager's "copy as path" does.
pub fn quoted_list(paths: &[&Path]) -> String {
    paths
        .iter()
        .map(|p| format!("\"{}\"", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
