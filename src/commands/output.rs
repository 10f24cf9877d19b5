//! Printing operation lists in the formats `diff`, `create` and `drop` share.

use crate::catalog::Database;
use crate::codegen::MigrationCodeGenerator;
use crate::config::OutputFormat;
use crate::diff::operations::{MigrationOperation, Operation};
use crate::render::{Dialect, MigrationSqlGenerator};
use anyhow::Result;
use console::style;

/// Renders `operations` in `format`. `snapshot` is the database the
/// operations start from; SQL rendering needs it to look up old columns.
pub fn format_operations(
    operations: &[MigrationOperation],
    format: OutputFormat,
    dialect: Dialect,
    snapshot: &Database,
) -> Result<String> {
    match format {
        OutputFormat::Sql => format_sql(operations, dialect, snapshot),
        OutputFormat::Code => Ok(MigrationCodeGenerator::new().generate_operations(operations)),
        OutputFormat::Summary => Ok(format_summary(operations)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(operations)?),
    }
}

fn format_sql(
    operations: &[MigrationOperation],
    dialect: Dialect,
    snapshot: &Database,
) -> Result<String> {
    if operations.is_empty() {
        return Ok("-- No changes detected".to_string());
    }

    let rendered = MigrationSqlGenerator::new(dialect).generate(operations, snapshot)?;
    let statements: Vec<String> = rendered
        .iter()
        .map(|statement| {
            if statement.is_destructive() {
                format!("-- destructive\n{}", statement.sql)
            } else {
                statement.sql.clone()
            }
        })
        .collect();
    Ok(statements.join("\n\n"))
}

/// One line per operation, colored by what it does to the schema.
pub fn format_summary(operations: &[MigrationOperation]) -> String {
    if operations.is_empty() {
        return format!("{} No differences", style("✓").green());
    }

    let mut lines = Vec::with_capacity(operations.len() + 2);
    for operation in operations {
        let marker = if operation.is_create() {
            style("+").green()
        } else if operation.is_drop() {
            style("-").red()
        } else {
            style("~").yellow()
        };
        let mut line = format!("{} {}", marker, operation);
        if operation.is_destructive() {
            line.push_str(&format!(" {}", style("(destructive)").red()));
        }
        lines.push(line);
    }

    let destructive = operations.iter().filter(|op| op.is_destructive()).count();
    lines.push(String::new());
    lines.push(format!(
        "{} operation(s), {} destructive",
        style(operations.len()).bold(),
        destructive
    ));
    lines.join("\n")
}
