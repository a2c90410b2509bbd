use std::path::Path;

use crate::config::schema::{Config, ToolConfig, CONFIG_VERSION};
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.tools.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one extraction tool must be configured".to_string(),
        });
    }

    let mut names = std::collections::HashSet::new();
    for tool in &config.tools {
        if tool.name.trim().is_empty() || tool.path.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("Tool entries need a name and a path: {:?}", tool),
            });
        }
        if !names.insert(&tool.name) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate tool name: {}", tool.name),
            });
        }
    }

    if config.asset_extensions.is_empty() {
        return Err(ConfigError::Validation {
            message: "asset_extensions must not be empty".to_string(),
        });
    }

    for ext in config
        .asset_extensions
        .iter()
        .chain(std::iter::once(&config.archive_extension))
    {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation {
                message: format!("Extensions are given without a leading dot: '{}'", ext),
            });
        }
    }

    if config.filter.reject_keywords.iter().any(|k| k.is_empty()) {
        return Err(ConfigError::Validation {
            message: "filter.reject_keywords must not contain empty entries".to_string(),
        });
    }

    Ok(())
}

/// Parses a `NAME=PATH` command-line tool override.
pub fn parse_tool_spec(entry: &str) -> Result<ToolConfig, ConfigError> {
    match entry.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok(ToolConfig {
                name: name.trim().to_string(),
                path: path.trim().to_string(),
            })
        }
        _ => Err(ConfigError::InvalidToolSpec {
            entry: entry.to_string(),
        }),
    }
}
