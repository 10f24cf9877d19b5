use crate::config::Config;
use crate::migration::{MigrationScaffolder, ModelSnapshot};
use crate::diff::ModelDiffer;
use anyhow::{Result, bail};
use chrono::Utc;
use console::style;
use std::path::Path;
use tracing::debug;

use super::super::load_projection;

/// Scaffold a migration from the last snapshot to the current model and
/// advance the snapshot.
pub fn cmd_migrate_new(
    config: &Config,
    root_dir: &Path,
    name: &str,
    model: Option<&Path>,
) -> Result<()> {
    validate_name(name)?;

    let migrations_dir = config.directories.migrations_path(root_dir);
    let snapshot_path = config.directories.snapshot_path(root_dir);
    let model_path = match model {
        Some(path) => path.to_path_buf(),
        None => config.directories.models_path(root_dir),
    };

    println!("Generating migration: {}", name);

    let previous = ModelSnapshot::load(&snapshot_path)?;
    if previous.is_none() {
        debug!(
            "No snapshot at {}, diffing against an empty database",
            snapshot_path.display()
        );
    }
    let target = load_projection(config, &model_path)?;

    let scaffolder = MigrationScaffolder::with_differ(ModelDiffer::with_options(config.diff_options()));
    let migration = scaffolder.scaffold_projection(name, previous.as_ref(), target, Utc::now())?;

    if !migration.has_changes() {
        println!("No changes detected - no migration needed");
        return Ok(());
    }

    let path = migration.write_with_snapshot(&migrations_dir, &snapshot_path)?;
    println!(
        "{} Created migration: {} ({} operation(s))",
        style("✓").green(),
        path.display(),
        migration.up.len()
    );
    println!("Updated snapshot: {}", snapshot_path.display());
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Migration name cannot be empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("Migration name cannot contain path separators");
    }
    if name.len() > 100 {
        bail!("Migration name must be 100 characters or less");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("add blogs").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }
}
