use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::StorageError;

/// Outcome of a best-effort scratch removal. Reported for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStatus {
    Removed,
    Absent,
    Failed(String),
}

/// The temporary directory a package is extracted into. One location is
/// reused for every package of a run, one package at a time.
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Recreates the directory empty. The returned guard removes it again
    /// when dropped, so every package starts from a clean slate even if the
    /// previous one bailed out halfway.
    pub fn prepare(&self) -> Result<ScratchGuard<'_>, StorageError> {
        self.reset()?;
        Ok(ScratchGuard {
            space: self,
            disposed: false,
        })
    }

    /// Empties the directory in place, leaving it existing.
    pub fn reset(&self) -> Result<(), StorageError> {
        if self.root.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.root) {
                debug!("Could not clear {}: {}", self.root.display(), e);
            }
        }

        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::CreateDirectory {
            path: self.root.clone(),
            source: e,
        })?;

        // A failed removal above must not leak old content into the next package
        let leftover = std::fs::read_dir(&self.root)
            .map(|mut entries| entries.next().is_some())
            .map_err(|e| StorageError::CreateDirectory {
                path: self.root.clone(),
                source: e,
            })?;
        if leftover {
            return Err(StorageError::ScratchNotEmpty(self.root.clone()));
        }

        Ok(())
    }

    /// Removes the directory. Never fails the caller.
    pub fn dispose(&self) -> CleanupStatus {
        if !self.root.exists() {
            return CleanupStatus::Absent;
        }

        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => CleanupStatus::Removed,
            Err(e) => {
                warn!("Failed to remove scratch {}: {}", self.root.display(), e);
                CleanupStatus::Failed(e.to_string())
            }
        }
    }
}

/// Disposes the scratch directory on drop unless [`ScratchGuard::dispose`]
/// was already called.
pub struct ScratchGuard<'a> {
    space: &'a ScratchSpace,
    disposed: bool,
}

impl ScratchGuard<'_> {
    pub fn path(&self) -> &Path {
        self.space.path()
    }

    pub fn space(&self) -> &ScratchSpace {
        self.space
    }

    pub fn dispose(mut self) -> CleanupStatus {
        self.disposed = true;
        self.space.dispose()
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        if !self.disposed {
            self.space.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let space = ScratchSpace::new(temp_dir.path().join("scratch"));

        let guard = space.prepare().unwrap();

        assert!(guard.path().is_dir());
        assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_clears_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("scratch");
        std::fs::create_dir_all(root.join("nested")).unwrap();
        std::fs::write(root.join("nested").join("stale.png"), b"old").unwrap();

        let space = ScratchSpace::new(&root);
        let guard = space.prepare().unwrap();

        assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_dispose_reports_status() {
        let temp_dir = TempDir::new().unwrap();
        let space = ScratchSpace::new(temp_dir.path().join("scratch"));

        let guard = space.prepare().unwrap();
        std::fs::write(guard.path().join("file.png"), b"x").unwrap();

        assert_eq!(guard.dispose(), CleanupStatus::Removed);
        assert!(!space.path().exists());
        assert_eq!(space.dispose(), CleanupStatus::Absent);
    }

    #[test]
    fn test_guard_disposes_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let space = ScratchSpace::new(temp_dir.path().join("scratch"));

        {
            let guard = space.prepare().unwrap();
            std::fs::write(guard.path().join("file.png"), b"x").unwrap();
        }

        assert!(!space.path().exists());
    }

    #[test]
    fn test_reset_keeps_directory() {
        let temp_dir = TempDir::new().unwrap();
        let space = ScratchSpace::new(temp_dir.path().join("scratch"));
        let guard = space.prepare().unwrap();
        std::fs::write(guard.path().join("partial.png"), b"x").unwrap();

        space.reset().unwrap();

        assert!(guard.path().is_dir());
        assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_fails_when_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let space = ScratchSpace::new(blocker.join("scratch"));

        assert!(matches!(
            space.prepare(),
            Err(StorageError::CreateDirectory { .. })
        ));
    }
}
