pub mod config;
pub mod diff;
pub mod migrate;
pub mod output;

// Re-export all command functions
pub use config::cmd_config;
pub use diff::{DiffOutcome, cmd_create, cmd_diff, cmd_drop};
pub use migrate::cmd_migrate_new;

use crate::catalog::Projection;
use crate::catalog::builder::DatabaseBuilder;
use crate::config::Config;
use crate::schema_loader::load_model;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a model, give it the configured default schema, project it and drop
/// filtered objects.
pub fn load_projection(config: &Config, path: &Path) -> Result<Projection> {
    let mut model = load_model(path)?;
    config.apply_default_schema(&mut model);
    let projection = DatabaseBuilder::project(&model)
        .with_context(|| format!("Invalid model {}", path.display()))?;
    Ok(config.object_filter().filter_projection(projection))
}
