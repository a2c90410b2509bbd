use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};
use log::{debug, error, info};

use crate::error::WorkerError;
use crate::launcher::{Launcher, SystemLauncher};
use crate::pipeline::{ChannelProgress, ExtractionEvent, Pipeline, PipelineConfig, RunResult};

/// Runs pipelines on a dedicated thread so the caller stays responsive.
/// One run at a time per worker.
pub struct ExtractionWorker {
    config: Arc<PipelineConfig>,
    launcher: Arc<dyn Launcher>,
    active: Arc<AtomicBool>,
}

impl ExtractionWorker {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self::with_launcher(config, Arc::new(SystemLauncher))
    }

    pub fn with_launcher(config: Arc<PipelineConfig>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            config,
            launcher,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True from `start` until the run's thread has finished.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Starts a run over `input` in the background.
    ///
    /// Fails with [`WorkerError::RunInProgress`] while a previous run's thread
    /// is still alive; call [`RunHandle::wait`] before starting the next one.
    pub fn start(&self, input: String) -> Result<RunHandle, WorkerError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkerError::RunInProgress);
        }

        // Unbounded so a slow consumer never stalls the run
        let (event_sender, event_receiver) = unbounded::<ExtractionEvent>();
        let active = Arc::clone(&self.active);
        let config = Arc::clone(&self.config);
        let launcher = Arc::clone(&self.launcher);

        let spawned = thread::Builder::new()
            .name("wallgrab-run".into())
            .spawn(move || {
                let _active = ActiveFlag(active);
                debug!("Run thread started");

                let pipeline = Pipeline::from_config(config).with_launcher(launcher);
                let progress = ChannelProgress::new(event_sender);
                let result = pipeline.run(&input, &progress);

                info!("Run {} produced {} file(s)", result.run_id, result.files.len());
                result
            });

        match spawned {
            Ok(handle) => Ok(RunHandle {
                events: event_receiver,
                handle,
            }),
            Err(e) => {
                self.active.store(false, Ordering::Release);
                Err(WorkerError::SpawnFailed(e.to_string()))
            }
        }
    }
}

/// Clears the worker's busy flag when the run thread ends, panics included.
struct ActiveFlag(Arc<AtomicBool>);

impl Drop for ActiveFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RunHandle {
    events: Receiver<ExtractionEvent>,
    handle: JoinHandle<RunResult>,
}

impl RunHandle {
    /// Event stream of the run. Safe to read from any thread; disconnects
    /// after `Completed` once the run thread exits.
    pub fn events(&self) -> &Receiver<ExtractionEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the run thread exits and returns its result.
    pub fn wait(self) -> Result<RunResult, WorkerError> {
        self.handle.join().map_err(|e| {
            error!("Run thread panicked: {:?}", e);
            WorkerError::WorkerPanicked
        })
    }
}
