//! Opening results in the desktop's default handlers once a run is done.

use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::error::LaunchError;

pub trait Launcher: Send + Sync {
    /// Opens `path` (a folder or a file) with whatever the desktop associates
    /// with it. Does not wait for the opened application to exit.
    fn open(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Program that opens a path with its default handler. The path is always
/// passed as a single argument and never goes through a shell, so names
/// taken from packages cannot inject commands.
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const OPENER: &str = "xdg-open";

/// Uses the platform's own opener.
pub struct SystemLauncher;

impl SystemLauncher {
    fn command(path: &Path) -> Command {
        let mut cmd = Command::new(OPENER);
        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> Result<(), LaunchError> {
        if !path.exists() {
            return Err(LaunchError::Missing(path.to_path_buf()));
        }

        let child = Self::command(path)
            .spawn()
            .map_err(|e| LaunchError::Spawn {
                program: OPENER.to_string(),
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Err(e) = reap(child) {
            warn!("Could not start opener reaper: {}", e);
        }

        Ok(())
    }
}

/// Waits for `child` on a background thread so it never lingers as a zombie.
fn reap(mut child: Child) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("wallgrab-opener".into())
        .spawn(move || {
            if let Err(e) = child.wait() {
                debug!("Waiting for {} failed: {}", OPENER, e);
            }
        })
}

/// Opens nothing.
pub struct NoopLauncher;

impl Launcher for NoopLauncher {
    fn open(&self, _path: &Path) -> Result<(), LaunchError> {
        Ok(())
    }
}
