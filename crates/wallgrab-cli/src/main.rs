//! wallgrab - batch extraction of wallpaper images and videos
//!
//! Collects the images and videos of one or more wallpaper folders into a
//! single output folder, unpacking `.pkg` packages with the external RePKG
//! tools on the way.
//!
//! Paths come from positional arguments, `--from-file`, or stdin. Each line
//! may hold several comma-separated, optionally quoted paths.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use wallgrab::config::{parse_tool_spec, validate_config, Config};
use wallgrab::pipeline::ExtractionEvent;
use wallgrab::telemetry::init_tracing;
use wallgrab::{load_config, ExtractionWorker, PipelineConfig, WallgrabError};

#[derive(Parser)]
#[command(name = "wallgrab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract wallpaper images and videos into one folder", long_about = None)]
struct Cli {
    /// Wallpaper folders to process
    paths: Vec<String>,

    /// Read the path list from a file instead
    #[arg(long, conflicts_with = "paths")]
    from_file: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, env = "WALLGRAB_CONFIG")]
    config: Option<PathBuf>,

    /// Output folder (default: Wallpapers on the desktop)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scratch folder used while unpacking packages
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// Extraction tool as NAME=PATH, tried in the given order
    #[arg(long = "tool", value_name = "NAME=PATH")]
    tools: Vec<String>,

    /// Do not open the output folder and files afterwards
    #[arg(long)]
    no_open: bool,

    /// Print every run event as a JSON line
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(cli.json, level);

    let input = read_input(&cli)?;
    if input.trim().is_empty() {
        eprintln!("Enter paths first");
        return Ok(ExitCode::FAILURE);
    }

    let config = build_config(&cli).context("Invalid configuration")?;
    let worker = ExtractionWorker::new(Arc::new(config));
    let handle = worker.start(input).map_err(WallgrabError::from)?;

    for event in handle.events().iter() {
        if cli.json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }
        match event {
            ExtractionEvent::LogLine(line) => println!("{}", line),
            ExtractionEvent::Progress(percent) => eprintln!("[{:>3}%]", percent),
            ExtractionEvent::Completed(result) => {
                debug!(
                    "Run {} finished with {} issue(s)",
                    result.run_id,
                    result.issues.len()
                );
            }
        }
    }

    handle.wait().map_err(WallgrabError::from)?;
    Ok(ExitCode::SUCCESS)
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(file) = &cli.from_file {
        return std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read path list {:?}", file));
    }

    if !cli.paths.is_empty() {
        return Ok(cli.paths.join("\n"));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste paths, then end input with Ctrl-D (Ctrl-Z on Windows):");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read paths from stdin")?;
    Ok(text)
}

/// Config file (or defaults) with command-line overrides applied on top.
fn build_config(cli: &Cli) -> wallgrab::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output_directory = output.display().to_string();
    }
    if let Some(scratch) = &cli.scratch {
        config.scratch_directory = scratch.display().to_string();
    }
    if !cli.tools.is_empty() {
        config.tools = cli
            .tools
            .iter()
            .map(|entry| parse_tool_spec(entry))
            .collect::<std::result::Result<_, _>>()?;
    }
    if cli.no_open {
        config.open_results = false;
    }

    validate_config(&config)?;
    Ok(PipelineConfig::from_config(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallgrab::ConfigError;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "wallgrab",
            "--output",
            "/data/out",
            "--scratch",
            "/data/scratch",
            "--tool",
            "new=/opt/repkg/new",
            "--no-open",
            "/walls/1",
        ]);

        let config = build_config(&cli).unwrap();

        assert_eq!(config.output_directory, PathBuf::from("/data/out"));
        assert_eq!(config.scratch_directory, PathBuf::from("/data/scratch"));
        assert_eq!(config.tools.len(), 1);
        assert_eq!(config.tools[0].name, "new");
        assert!(!config.open_results);
    }

    #[test]
    fn test_bad_tool_spec_rejected() {
        let cli = Cli::parse_from(["wallgrab", "--output", "/data/out", "--tool", "nopath"]);
        assert!(matches!(
            build_config(&cli),
            Err(WallgrabError::Config(ConfigError::InvalidToolSpec { .. }))
        ));
    }

    #[test]
    fn test_missing_config_file_is_a_config_error() {
        let cli = Cli::parse_from(["wallgrab", "--config", "/nonexistent/wallgrab.json"]);
        assert!(matches!(
            build_config(&cli),
            Err(WallgrabError::Config(ConfigError::ReadFile { .. }))
        ));
    }

    #[test]
    fn test_positional_paths_become_lines() {
        let cli = Cli::parse_from(["wallgrab", "/walls/1", "/walls/2"]);
        assert_eq!(read_input(&cli).unwrap(), "/walls/1\n/walls/2");
    }
}
