use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use crate::extractor::{ExtractOutcome, ExternalExtractor};
use crate::filter::{AssetFilter, FilterDecision};
use crate::input::{parse_path_list, InputPath};
use crate::launcher::{Launcher, SystemLauncher};
use crate::storage::{CleanupStatus, OutputStore, ScratchSpace};
use crate::worker::scanner::{AssetCandidate, DirectoryScanner};

use super::config::PipelineConfig;
use super::context::{RunContext, RunResult};
use super::error::RunIssue;
use super::progress::{ExtractionEvent, ProgressReporter};

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    scanner: DirectoryScanner,
    filter: AssetFilter,
    extractor: ExternalExtractor,
    store: OutputStore,
    scratch: ScratchSpace,
    launcher: Arc<dyn Launcher>,
}

impl Pipeline {
    /// Builds all sub-components from config.
    pub fn from_config(config: Arc<PipelineConfig>) -> Self {
        let scanner = DirectoryScanner::new(&config.asset_extensions, &config.archive_extension);
        let filter = AssetFilter::new(&config.filter);
        let extractor = ExternalExtractor::new(config.tools.clone());
        let store = OutputStore::new(&config.output_directory);
        let scratch = ScratchSpace::new(&config.scratch_directory);

        Self {
            config,
            scanner,
            filter,
            extractor,
            store,
            scratch,
            launcher: Arc::new(SystemLauncher),
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every path in `input` to completion. Blocks the calling thread;
    /// see [`crate::worker::ExtractionWorker`] for the background variant.
    ///
    /// Failures for single paths, packages or files are logged and recorded
    /// as issues, never returned. The last event is always `Completed`.
    pub fn run(&self, input: &str, progress: &dyn ProgressReporter) -> RunResult {
        let mut ctx = RunContext::new();
        let _run_span = info_span!("run", run_id = %ctx.run_id).entered();

        let paths = {
            let _step = info_span!("parse_input").entered();
            parse_path_list(input)
        };

        if paths.is_empty() {
            emit(progress, "No valid paths were detected".to_string());
            progress.report(ExtractionEvent::Progress(100));
            return complete(ctx, progress);
        }

        if let Err(e) = self.store.ensure_exists() {
            warn!("Output directory unavailable: {}", e);
            emit(progress, format!("Could not create output folder: {}", e));
        }

        let total = paths.len();
        for (index, path) in paths.iter().enumerate() {
            let _path_span = info_span!("path", index, total).entered();
            emit(progress, format!("Processing: {}", path));
            progress.report(ExtractionEvent::Progress(percent(index, total)));

            self.step_process_path(path, &mut ctx, progress);
        }

        progress.report(ExtractionEvent::Progress(100));
        emit(progress, "Extraction finished".to_string());
        emit(
            progress,
            format!("Total files extracted: {}", ctx.files.len()),
        );
        info!(
            files = ctx.files.len(),
            issues = ctx.issues.len(),
            "Run finished"
        );

        {
            let _step = info_span!("open_results").entered();
            self.step_open_results(&ctx, progress);
        }

        complete(ctx, progress)
    }

    fn step_process_path(
        &self,
        path: &InputPath,
        ctx: &mut RunContext,
        progress: &dyn ProgressReporter,
    ) {
        let dir = path.as_path();

        if !dir.exists() {
            emit(progress, "Path not found".to_string());
            ctx.issues.push(RunIssue::PathNotFound {
                path: path.to_string(),
            });
            return;
        }

        {
            let _step = info_span!("direct_assets").entered();
            match self.scanner.scan_assets(dir) {
                Ok(assets) => {
                    for asset in &assets {
                        self.admit(asset, ctx, progress);
                    }
                }
                Err(e) => {
                    emit(progress, format!("Error listing folder: {}", e));
                    ctx.issues.push(RunIssue::DirectoryListError {
                        path: path.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let archives = match self.scanner.scan_archives(dir) {
            Ok(archives) => archives,
            Err(e) => {
                debug!("Package scan failed for {}: {}", dir.display(), e);
                ctx.issues.push(RunIssue::DirectoryListError {
                    path: path.to_string(),
                    error: e.to_string(),
                });
                Vec::new()
            }
        };

        if archives.is_empty() {
            emit(
                progress,
                format!(
                    "No .{} files found to extract",
                    self.config.archive_extension
                ),
            );
            ctx.issues.push(RunIssue::NoArchivesFound {
                path: path.to_string(),
            });
            return;
        }

        for archive in &archives {
            let _step = info_span!("archive", name = %archive.name).entered();
            self.step_extract_archive(archive, ctx, progress);
        }
    }

    fn step_extract_archive(
        &self,
        archive: &AssetCandidate,
        ctx: &mut RunContext,
        progress: &dyn ProgressReporter,
    ) {
        emit(
            progress,
            format!("Extracting package: {}", archive.path.display()),
        );

        let guard = match self.scratch.prepare() {
            Ok(guard) => guard,
            Err(e) => {
                emit(progress, format!("Could not extract: {} ({})", archive.name, e));
                ctx.issues.push(RunIssue::ExtractionFailed {
                    archive: archive.path.display().to_string(),
                    error: e.to_string(),
                });
                return;
            }
        };

        match self.extractor.extract(&archive.path, guard.space()) {
            ExtractOutcome::Extracted { tool, .. } => {
                debug!("{} extracted by {}", archive.name, tool);
                match self.scanner.scan_extracted(guard.path()) {
                    Ok(assets) => {
                        for asset in &assets {
                            self.admit(asset, ctx, progress);
                        }
                    }
                    Err(e) => {
                        emit(progress, format!("Error listing folder: {}", e));
                        ctx.issues.push(RunIssue::DirectoryListError {
                            path: guard.path().display().to_string(),
                            error: e.to_string(),
                        });
                    }
                }
            }
            ExtractOutcome::Failed { attempts } => {
                emit(progress, format!("Could not extract: {}", archive.name));
                ctx.issues.push(RunIssue::ExtractionFailed {
                    archive: archive.path.display().to_string(),
                    error: attempts
                        .iter()
                        .map(|e| e.to_string())
                        .collect::<Vec<_>>()
                        .join("; "),
                });
            }
        }

        // Cleanup failures are recorded but never surfaced as log lines
        if let CleanupStatus::Failed(error) = guard.dispose() {
            ctx.issues.push(RunIssue::ScratchCleanupFailed {
                path: self.scratch.path().display().to_string(),
                error,
            });
        }
    }

    /// Filters one asset and copies it into the output folder if accepted.
    fn admit(
        &self,
        asset: &AssetCandidate,
        ctx: &mut RunContext,
        progress: &dyn ProgressReporter,
    ) {
        if self.filter.decide(&asset.name) == FilterDecision::Reject {
            emit(progress, format!("Ignored (filter): {}", asset.name));
            return;
        }

        match self.store.copy_in(&asset.path) {
            Ok(destination) => {
                ctx.files.push(destination);
                emit(progress, format!("Copied: {}", asset.name));
            }
            Err(e) => {
                warn!("Copy failed for {}: {}", asset.path.display(), e);
                emit(progress, format!("Copy failed: {} ({})", asset.name, e));
                ctx.issues.push(RunIssue::CopyFailed {
                    source: asset.path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn step_open_results(&self, ctx: &RunContext, progress: &dyn ProgressReporter) {
        if !self.config.open_results {
            return;
        }

        if let Err(e) = self.launcher.open(self.store.output_directory()) {
            debug!("Could not open output folder: {}", e);
        }

        if ctx.files.is_empty() {
            return;
        }

        emit(progress, format!("Opening {} file(s)", ctx.files.len()));
        for file in &ctx.files {
            if let Err(e) = self.launcher.open(file) {
                debug!("Open failed: {}", e);
                emit(progress, format!("Could not open: {}", display_name(file)));
            }
            if !self.config.open_delay.is_zero() {
                std::thread::sleep(self.config.open_delay);
            }
        }
    }
}

/// Share of paths already started, rounded down.
fn percent(index: usize, total: usize) -> u8 {
    (index * 100 / total.max(1)).min(100) as u8
}

fn emit(progress: &dyn ProgressReporter, line: String) {
    debug!(target: "wallgrab::log_line", "{}", line);
    progress.log(line);
}

fn complete(ctx: RunContext, progress: &dyn ProgressReporter) -> RunResult {
    let result = ctx.into_result();
    progress.report(ExtractionEvent::Completed(result.clone()));
    result
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
