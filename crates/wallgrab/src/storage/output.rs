use std::ffi::{OsStr, OsString};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use log::{debug, warn};

use crate::error::StorageError;

/// Upper bound on `_n` suffixes tried for a single file name.
const MAX_SUFFIX: u32 = 10_000;

/// The shared, append-only output folder. Files are only ever added; an
/// existing name is never reused.
pub struct OutputStore {
    output_directory: PathBuf,
}

impl OutputStore {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if !self.output_directory.is_dir() {
            std::fs::create_dir_all(&self.output_directory).map_err(|e| {
                StorageError::CreateDirectory {
                    path: self.output_directory.clone(),
                    source: e,
                }
            })?;
        }
        Ok(())
    }

    /// Copies `source` into the output folder and returns where it landed.
    ///
    /// The destination keeps the source's file name, or `{stem}_{n}{ext}` with
    /// the smallest free `n` starting at 1. The name is reserved with an
    /// exclusive create before any bytes are written, so a file that appears
    /// concurrently is never clobbered. Permissions and timestamps follow the
    /// source; the source itself is left untouched.
    pub fn copy_in(&self, source: &Path) -> Result<PathBuf, StorageError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| StorageError::NoFileName(source.to_path_buf()))?;

        self.ensure_exists()?;

        let destination = self.reserve(file_name)?;

        if let Err(e) = std::fs::copy(source, &destination) {
            // Don't leave the empty placeholder behind
            let _ = std::fs::remove_file(&destination);
            return Err(StorageError::CopyFile {
                from: source.to_path_buf(),
                to: destination,
                source: e,
            });
        }

        preserve_times(source, &destination);

        debug!("Copied {} -> {}", source.display(), destination.display());
        Ok(destination)
    }

    /// Atomically creates an empty file under the first free candidate name.
    fn reserve(&self, file_name: &OsStr) -> Result<PathBuf, StorageError> {
        for counter in 0..=MAX_SUFFIX {
            let candidate = self.output_directory.join(candidate_name(file_name, counter));

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(_) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::CopyFile {
                        from: PathBuf::from(file_name),
                        to: candidate,
                        source: e,
                    });
                }
            }
        }

        Err(StorageError::NameSpaceExhausted(
            self.output_directory.join(file_name),
        ))
    }
}

/// `scene.jpg` -> `scene.jpg`, `scene_1.jpg`, `scene_2.jpg`, ...
///
/// Works on raw OS strings so names that are not valid UTF-8 survive as-is.
fn candidate_name(file_name: &OsStr, counter: u32) -> OsString {
    if counter == 0 {
        return file_name.to_os_string();
    }

    let path = Path::new(file_name);
    let mut name = path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!("_{}", counter));

    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn preserve_times(source: &Path, destination: &Path) {
    let metadata = match std::fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Could not read metadata of {}: {}", source.display(), e);
            return;
        }
    };

    let accessed = FileTime::from_last_access_time(&metadata);
    let modified = FileTime::from_last_modification_time(&metadata);

    if let Err(e) = filetime::set_file_times(destination, accessed, modified) {
        warn!(
            "Could not preserve timestamps on {}: {}",
            destination.display(),
            e
        );
    }
}
