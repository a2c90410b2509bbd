pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, parse_tool_spec, validate_config};
pub use schema::{
    default_output_directory, default_scratch_directory, Config, FilterConfig, ToolConfig,
};
