//! Shared SQL rendering for key and foreign key statements

use super::SqlDialect;
use crate::catalog::{ForeignKey, ObjectName, PrimaryKey, UniqueConstraint};

pub fn render_add_primary_key(
    dialect: &dyn SqlDialect,
    table: &ObjectName,
    primary_key: &PrimaryKey,
) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY{} ({});",
        dialect.qualified(table),
        dialect.quote_ident(&primary_key.name),
        dialect.key_options(&primary_key.annotations),
        dialect.column_list(&primary_key.columns)
    )
}

pub fn render_add_unique_constraint(
    dialect: &dyn SqlDialect,
    table: &ObjectName,
    unique: &UniqueConstraint,
) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE{} ({});",
        dialect.qualified(table),
        dialect.quote_ident(&unique.name),
        dialect.key_options(&unique.annotations),
        dialect.column_list(&unique.columns)
    )
}

/// ON DELETE / ON UPDATE clauses are omitted for NO ACTION, the database
/// default.
pub fn render_add_foreign_key(
    dialect: &dyn SqlDialect,
    table: &ObjectName,
    foreign_key: &ForeignKey,
) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        dialect.qualified(table),
        dialect.quote_ident(&foreign_key.name),
        dialect.column_list(&foreign_key.columns),
        dialect.qualified(&foreign_key.principal_table),
        dialect.column_list(&foreign_key.principal_columns)
    );
    if !foreign_key.on_delete.is_no_action() {
        sql.push_str(&format!(" ON DELETE {}", foreign_key.on_delete.as_sql()));
    }
    if !foreign_key.on_update.is_no_action() {
        sql.push_str(&format!(" ON UPDATE {}", foreign_key.on_update.as_sql()));
    }
    sql.push(';');
    sql
}

/// Primary keys, unique constraints and foreign keys all drop the same way.
pub fn render_drop_constraint(dialect: &dyn SqlDialect, table: &ObjectName, name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        dialect.qualified(table),
        dialect.quote_ident(name)
    )
}
