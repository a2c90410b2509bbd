use std::path::PathBuf;
use std::time::Duration;

use crate::config::schema::{default_output_directory, default_scratch_directory};
use crate::config::{Config, FilterConfig};
use crate::error::ConfigError;
use crate::extractor::ToolVariant;

/// Fully resolved settings for a pipeline. Built once per process and shared
/// read-only with the worker.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_directory: PathBuf,
    pub scratch_directory: PathBuf,
    pub tools: Vec<ToolVariant>,
    pub asset_extensions: Vec<String>,
    pub archive_extension: String,
    pub filter: FilterConfig,
    pub open_results: bool,
    pub open_delay: Duration,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let output_directory = if config.output_directory.is_empty() {
            default_output_directory().ok_or(ConfigError::NoDefault("the output directory"))?
        } else {
            PathBuf::from(&config.output_directory)
        };

        let scratch_directory = if config.scratch_directory.is_empty() {
            default_scratch_directory()
        } else {
            PathBuf::from(&config.scratch_directory)
        };

        // The scratch directory is wiped per package
        if output_directory == scratch_directory
            || output_directory.starts_with(&scratch_directory)
        {
            return Err(ConfigError::Validation {
                message: format!(
                    "Output directory {} must not live inside the scratch directory {}",
                    output_directory.display(),
                    scratch_directory.display()
                ),
            });
        }

        Ok(Self {
            output_directory,
            scratch_directory,
            tools: config.tools.iter().map(ToolVariant::from).collect(),
            asset_extensions: config.asset_extensions.clone(),
            archive_extension: config.archive_extension.clone(),
            filter: config.filter.clone(),
            open_results: config.open_results,
            open_delay: Duration::from_millis(config.open_delay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directories_are_kept() {
        let config = Config {
            output_directory: "/data/out".to_string(),
            scratch_directory: "/data/scratch".to_string(),
            open_delay_ms: 5,
            ..Config::default()
        };

        let resolved = PipelineConfig::from_config(&config).unwrap();

        assert_eq!(resolved.output_directory, PathBuf::from("/data/out"));
        assert_eq!(resolved.scratch_directory, PathBuf::from("/data/scratch"));
        assert_eq!(resolved.open_delay, Duration::from_millis(5));
        assert_eq!(resolved.tools.len(), 2);
        assert_eq!(resolved.tools[0].name, "RePKG040alpha");
    }

    #[test]
    fn test_empty_scratch_resolves_to_temp() {
        let config = Config {
            output_directory: "/data/out".to_string(),
            ..Config::default()
        };

        let resolved = PipelineConfig::from_config(&config).unwrap();

        assert_eq!(resolved.scratch_directory, default_scratch_directory());
    }

    #[test]
    fn test_output_inside_scratch_rejected() {
        let config = Config {
            output_directory: "/data/scratch/out".to_string(),
            scratch_directory: "/data/scratch".to_string(),
            ..Config::default()
        };

        assert!(matches!(
            PipelineConfig::from_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }
}
