//! Shared SQL rendering for CREATE TABLE statements and column definitions

use super::SqlDialect;
use crate::catalog::{Column, ColumnDefault, ObjectName};
use crate::diff::operations::CreateTableOperation;
use crate::error::Result;
use crate::model::{ClrType, ValueGenerated};

/// Integer columns generated on add become identity columns.
pub fn is_identity(column: &Column) -> bool {
    column.value_generated == ValueGenerated::OnAdd
        && column.default.is_none()
        && column.computed_sql.is_none()
        && matches!(
            column.clr_type,
            ClrType::Int16 | ClrType::Int32 | ClrType::Int64
        )
}

/// Column definition as used by CREATE TABLE and ADD COLUMN, without the
/// leading indentation.
pub fn render_column_definition(
    dialect: &dyn SqlDialect,
    table: &ObjectName,
    column: &Column,
) -> Result<String> {
    let store_type = dialect.store_type(table, column)?;

    if let Some(sql) = &column.computed_sql {
        return Ok(dialect.computed_column(&column.name, &store_type, sql));
    }

    let mut definition = format!("{} {}", dialect.quote_ident(&column.name), store_type);
    if let Some(identity) = dialect.identity_clause(column) {
        definition.push(' ');
        definition.push_str(&identity);
    }
    definition.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
    if let Some(default) = render_default(dialect, column) {
        definition.push_str(" DEFAULT ");
        definition.push_str(&default);
    }
    Ok(definition)
}

/// The default expression of a column, literal or SQL.
pub fn render_default(dialect: &dyn SqlDialect, column: &Column) -> Option<String> {
    match &column.default {
        Some(ColumnDefault::Value(value)) => Some(dialect.literal(value)),
        Some(ColumnDefault::Sql(sql)) => Some(sql.clone()),
        None => None,
    }
}

/// Render a complete CREATE TABLE statement, with the primary key and
/// unique constraints inline. Foreign keys are added separately.
pub fn render_create_table(dialect: &dyn SqlDialect, table: &CreateTableOperation) -> Result<String> {
    let mut definitions = Vec::new();

    for column in &table.columns {
        definitions.push(format!(
            "    {}",
            render_column_definition(dialect, &table.name, column)?
        ));
    }

    if let Some(pk) = &table.primary_key {
        definitions.push(format!(
            "    CONSTRAINT {} PRIMARY KEY{} ({})",
            dialect.quote_ident(&pk.name),
            dialect.key_options(&pk.annotations),
            dialect.column_list(&pk.columns)
        ));
    }

    for unique in &table.unique_constraints {
        definitions.push(format!(
            "    CONSTRAINT {} UNIQUE{} ({})",
            dialect.quote_ident(&unique.name),
            dialect.key_options(&unique.annotations),
            dialect.column_list(&unique.columns)
        ));
    }

    Ok(format!(
        "CREATE TABLE {} (\n{}\n);",
        dialect.qualified(&table.name),
        definitions.join(",\n")
    ))
}
