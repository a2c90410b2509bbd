use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::ScanError;

/// Files starting with this (case-insensitive) are wallpaper thumbnails and
/// never located, whatever the asset filter is configured to reject.
pub const PREVIEW_PREFIX: &str = "preview";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// An image or video usable as-is.
    Direct,
    /// A package that has to go through the external extraction tool.
    PackageArchive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    pub path: PathBuf,
    pub name: String,
    pub kind: AssetKind,
}

pub struct DirectoryScanner {
    /// Lower-cased, each with its leading dot.
    asset_suffixes: Vec<String>,
    archive_suffix: String,
}

impl DirectoryScanner {
    pub fn new(asset_extensions: &[String], archive_extension: &str) -> Self {
        Self {
            asset_suffixes: asset_extensions
                .iter()
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .collect(),
            archive_suffix: format!(".{}", archive_extension.to_lowercase()),
        }
    }

    /// Images and videos directly inside `dir`.
    pub fn scan_assets(&self, dir: &Path) -> Result<Vec<AssetCandidate>, ScanError> {
        let candidates = self.collect(dir, Some(1), AssetKind::Direct)?;
        debug!("Found {} direct assets in {}", candidates.len(), dir.display());
        Ok(candidates)
    }

    /// Package archives directly inside `dir`.
    pub fn scan_archives(&self, dir: &Path) -> Result<Vec<AssetCandidate>, ScanError> {
        let candidates = self.collect(dir, Some(1), AssetKind::PackageArchive)?;
        debug!("Found {} packages in {}", candidates.len(), dir.display());
        Ok(candidates)
    }

    /// Images and videos anywhere below `dir`. Used on the scratch directory
    /// after extraction, where the package layout is not known up front.
    pub fn scan_extracted(&self, dir: &Path) -> Result<Vec<AssetCandidate>, ScanError> {
        let candidates = self.collect(dir, None, AssetKind::Direct)?;
        debug!(
            "Found {} extracted assets below {}",
            candidates.len(),
            dir.display()
        );
        Ok(candidates)
    }

    fn collect(
        &self,
        dir: &Path,
        max_depth: Option<usize>,
        kind: AssetKind,
    ) -> Result<Vec<AssetCandidate>, ScanError> {
        let mut candidates = Vec::new();

        for entry in self.walk(dir, max_depth)? {
            let name = entry.file_name().to_string_lossy().to_string();
            if self.matches(&name, kind) {
                candidates.push(AssetCandidate {
                    path: entry.path().to_path_buf(),
                    name,
                    kind,
                });
            }
        }

        Ok(candidates)
    }

    fn matches(&self, name: &str, kind: AssetKind) -> bool {
        let lower = name.to_lowercase();

        if lower.starts_with(PREVIEW_PREFIX) {
            return false;
        }

        match kind {
            AssetKind::Direct => self
                .asset_suffixes
                .iter()
                .any(|suffix| lower.ends_with(suffix.as_str())),
            AssetKind::PackageArchive => lower.ends_with(&self.archive_suffix),
        }
    }

    fn walk(&self, dir: &Path, max_depth: Option<usize>) -> Result<Vec<DirEntry>, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    // Follows symlinks so linked files count as files
                    if entry.path().is_file() {
                        files.push(entry);
                    }
                }
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::ListFailed {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry below {}: {}", dir.display(), e);
                }
            }
        }

        Ok(files)
    }
}
