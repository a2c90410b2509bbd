use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_VERSION: &str = "1.0";

/// Image and video extensions copied into the output folder.
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "webp", "mp4", "webm", "mov", "avi",
];

pub const DEFAULT_ARCHIVE_EXTENSION: &str = "pkg";

pub const DEFAULT_REJECT_PREFIX: &str = "preview";

/// Auxiliary textures shipped inside wallpaper packages that are not
/// wallpapers themselves.
pub const DEFAULT_REJECT_KEYWORDS: &[&str] = &["mask", "waterwaves", "waterripplenormal"];

const DEFAULT_NEW_TOOL: &str = "RePKG040alpha";
const DEFAULT_OLD_TOOL: &str = "RePKG022";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    /// Empty means "resolve the per-user default at load time".
    #[serde(default)]
    pub output_directory: String,
    #[serde(default)]
    pub scratch_directory: String,
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolConfig>,
    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default = "default_true")]
    pub open_results: bool,
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_directory: String::new(),
            scratch_directory: String::new(),
            tools: default_tools(),
            asset_extensions: default_asset_extensions(),
            archive_extension: default_archive_extension(),
            filter: FilterConfig::default(),
            open_results: true,
            open_delay_ms: default_open_delay_ms(),
        }
    }
}

/// One external extraction tool. Tools are tried in list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_reject_prefix")]
    pub reject_prefix: String,
    #[serde(default = "default_reject_keywords")]
    pub reject_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            reject_prefix: default_reject_prefix(),
            reject_keywords: default_reject_keywords(),
        }
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_open_delay_ms() -> u64 {
    100
}

fn default_archive_extension() -> String {
    DEFAULT_ARCHIVE_EXTENSION.to_string()
}

fn default_asset_extensions() -> Vec<String> {
    DEFAULT_ASSET_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_reject_prefix() -> String {
    DEFAULT_REJECT_PREFIX.to_string()
}

fn default_reject_keywords() -> Vec<String> {
    DEFAULT_REJECT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

/// The two RePKG builds, newest first, expected next to the running binary.
fn default_tools() -> Vec<ToolConfig> {
    [DEFAULT_NEW_TOOL, DEFAULT_OLD_TOOL]
        .iter()
        .map(|name| ToolConfig {
            name: name.to_string(),
            path: tool_dir()
                .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
                .display()
                .to_string(),
        })
        .collect()
}

fn tool_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `<Desktop>/Wallpapers`, or `<home>/Wallpapers` on systems without a desktop folder.
pub fn default_output_directory() -> Option<PathBuf> {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("Wallpapers"))
}

pub fn default_scratch_directory() -> PathBuf {
    std::env::temp_dir().join("RePKGTemp")
}
