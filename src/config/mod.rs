pub mod builder;
pub mod defaults;
pub mod filter;
pub mod merge;
pub mod types;


pub use builder::ConfigBuilder;
pub use filter::ObjectFilter;
pub use types::*;

use crate::diff::DiffOptions;
use crate::model::Model;
use anyhow::{Context, Result};
use std::path::Path;

/// Main configuration loading function
pub fn load_config(config_file: &str) -> Result<(ConfigInput, std::path::PathBuf)> {
    let config_dir = Path::new(config_file)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let config_input = if Path::new(config_file).exists() {
        let contents = std::fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {}", config_file))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_file))?
    } else {
        ConfigInput::default()
    };

    Ok((config_input, config_dir))
}

impl Config {
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            fuzzy_threshold: self.migration.fuzzy_threshold,
            temp_name_prefix: self.migration.temp_name_prefix.clone(),
        }
    }

    /// Gives a model without its own default schema the configured one.
    pub fn apply_default_schema(&self, model: &mut Model) {
        if model.default_schema.is_none() {
            model.default_schema = self.migration.default_schema.clone();
        }
    }

    pub fn object_filter(&self) -> ObjectFilter {
        ObjectFilter::new(&self.objects)
    }
}
