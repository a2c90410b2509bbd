use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WallgrabError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid tool entry '{entry}': expected NAME=PATH")]
    InvalidToolSpec { entry: String },

    #[error("Could not determine a default for {0}")]
    NoDefault(&'static str),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to list directory '{path}': {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("No free file name left for '{0}'")]
    NameSpaceExhausted(PathBuf),

    #[error("Scratch directory could not be emptied: {0}")]
    ScratchNotEmpty(PathBuf),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to launch '{tool}': {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}: {detail}")]
    ExitStatus {
        tool: String,
        status: String,
        detail: String,
    },

    #[error("Could not reset scratch directory before '{tool}': {source}")]
    Scratch {
        tool: String,
        #[source]
        source: StorageError,
    },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to start '{program}' for '{path}': {source}")]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to open at '{0}'")]
    Missing(PathBuf),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("A run is already in progress")]
    RunInProgress,

    #[error("Worker panicked before completing the run")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, WallgrabError>;
