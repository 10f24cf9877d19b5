//! modeldiff diff / create / drop - print the operations between two models

use crate::catalog::Projection;
use crate::config::Config;
use crate::diff::ModelDiffer;
use crate::diff::operations::MigrationOperation;
use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::load_projection;
use super::output::format_operations;

/// Whether a diff found anything to do; `diff --exit-code` turns this into
/// the process status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    NoChanges,
    Changes,
}

/// Compare two model files (or directories) and print the operations that
/// turn `from` into `to`.
pub fn cmd_diff(config: &Config, from: &Path, to: &Path) -> Result<DiffOutcome> {
    let source = load_projection(config, from)?;
    let target = load_projection(config, to)?;

    let operations = differ(config).diff_projections(&source, &target);
    info!(
        "{} -> {}: {} operation(s)",
        from.display(),
        to.display(),
        operations.len()
    );
    print_operations(config, &operations, &source)?;

    Ok(if operations.is_empty() {
        DiffOutcome::NoChanges
    } else {
        DiffOutcome::Changes
    })
}

/// Print the operations that build a model from an empty database.
pub fn cmd_create(config: &Config, model: &Path) -> Result<()> {
    let source = Projection::default();
    let target = load_projection(config, model)?;
    let operations = differ(config).diff_projections(&source, &target);
    print_operations(config, &operations, &source)
}

/// Print the operations that remove everything a model describes.
pub fn cmd_drop(config: &Config, model: &Path) -> Result<()> {
    let source = load_projection(config, model)?;
    let target = Projection::default();
    let operations = differ(config).diff_projections(&source, &target);
    print_operations(config, &operations, &source)
}

fn differ(config: &Config) -> ModelDiffer {
    ModelDiffer::with_options(config.diff_options())
}

fn print_operations(
    config: &Config,
    operations: &[MigrationOperation],
    source: &Projection,
) -> Result<()> {
    let output = format_operations(
        operations,
        config.output.format,
        config.dialect,
        &source.database,
    )?;
    println!("{}", output);
    Ok(())
}
