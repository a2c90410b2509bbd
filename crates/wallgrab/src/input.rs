//! Parsing of the free-form path list a user pastes in.
//!
//! Paths may be separated by line breaks or commas and may be wrapped in
//! double quotes, as produced by "Copy as path" in most file managers.

use std::fmt;
use std::path::{Path, PathBuf};

/// A single candidate directory from the user's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPath(String);

impl InputPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for InputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for InputPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Splits `text` into ordered input paths. Duplicates are kept.
pub fn parse_path_list(text: &str) -> Vec<InputPath> {
    text.lines()
        .flat_map(|line| line.split(','))
        .filter_map(clean_fragment)
        .map(InputPath)
        .collect()
}

fn clean_fragment(fragment: &str) -> Option<String> {
    let trimmed = fragment.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
