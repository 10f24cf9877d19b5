//! PostgreSQL dialect: double-quoted identifiers, `ALTER TABLE .. RENAME`,
//! `SET SCHEMA` for moves and identity columns for generated keys.

use super::quote_ident;
use super::sql::table::{is_identity, render_default};
use super::sql::{SqlDialect, render_column_definition};
use crate::catalog::{Column, ObjectName};
use crate::diff::operations::AlterColumnOperation;
use crate::error::Result;
use crate::model::ClrType;

const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_ident(ident)
    }

    fn map_type(&self, column: &Column) -> Option<String> {
        let mapped = match &column.clr_type {
            ClrType::Bool => "boolean".to_string(),
            ClrType::Byte | ClrType::Int16 => "smallint".to_string(),
            ClrType::Int32 => "integer".to_string(),
            ClrType::Int64 => "bigint".to_string(),
            ClrType::Single => "real".to_string(),
            ClrType::Double => "double precision".to_string(),
            ClrType::Decimal => match (column.precision, column.scale) {
                (Some(precision), Some(scale)) => format!("numeric({},{})", precision, scale),
                (Some(precision), None) => format!("numeric({})", precision),
                _ => "numeric".to_string(),
            },
            ClrType::Char => "character(1)".to_string(),
            ClrType::String => match column.max_length {
                Some(length) if column.fixed_length == Some(true) => {
                    format!("character({})", length)
                }
                Some(length) => format!("character varying({})", length),
                None => "text".to_string(),
            },
            ClrType::Bytes => "bytea".to_string(),
            ClrType::DateTime => "timestamp without time zone".to_string(),
            ClrType::DateTimeOffset => "timestamp with time zone".to_string(),
            ClrType::TimeSpan => "interval".to_string(),
            ClrType::Guid => "uuid".to_string(),
            ClrType::Custom(_) => return None,
        };
        Some(mapped)
    }

    fn identity_clause(&self, column: &Column) -> Option<String> {
        is_identity(column).then(|| "GENERATED BY DEFAULT AS IDENTITY".to_string())
    }

    fn rename_table(&self, name: &ObjectName, new_name: &str) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} RENAME TO {};",
            self.qualified(name),
            self.quote_ident(new_name)
        )]
    }

    fn move_table(&self, name: &ObjectName, new_schema: Option<&str>) -> Vec<String> {
        let schema = new_schema.unwrap_or(DEFAULT_SCHEMA);
        let mut statements = Vec::new();
        if schema != DEFAULT_SCHEMA {
            statements.push(format!(
                "CREATE SCHEMA IF NOT EXISTS {};",
                self.quote_ident(schema)
            ));
        }
        statements.push(format!(
            "ALTER TABLE {} SET SCHEMA {};",
            self.qualified(name),
            self.quote_ident(schema)
        ));
        statements
    }

    fn rename_column(&self, table: &ObjectName, name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {};",
            self.qualified(table),
            self.quote_ident(name),
            self.quote_ident(new_name)
        )
    }

    /// Indexes live in the schema of their table.
    fn rename_index(&self, table: &ObjectName, name: &str, new_name: &str) -> String {
        format!(
            "ALTER INDEX {} RENAME TO {};",
            self.qualified(&table.with_name(name)),
            self.quote_ident(new_name)
        )
    }

    fn drop_index(&self, table: &ObjectName, name: &str) -> String {
        format!("DROP INDEX {};", self.qualified(&table.with_name(name)))
    }

    fn alter_column(&self, operation: &AlterColumnOperation) -> Result<Vec<String>> {
        let table = &operation.table;
        let old = &operation.old_column;
        let new = &operation.column;
        let target = format!(
            "ALTER TABLE {} ALTER COLUMN {}",
            self.qualified(table),
            self.quote_ident(&new.name)
        );

        // Generation expressions cannot be altered in place.
        if old.computed_sql != new.computed_sql {
            let mut statements = self.drop_column(table, &old.name, Some(old));
            statements.push(format!(
                "ALTER TABLE {} ADD {};",
                self.qualified(table),
                render_column_definition(self, table, new)?
            ));
            return Ok(statements);
        }

        let mut statements = Vec::new();
        let old_type = self.store_type(table, old)?;
        let new_type = self.store_type(table, new)?;
        if old_type != new_type {
            statements.push(format!(
                "{} TYPE {} USING {}::{};",
                target,
                new_type,
                self.quote_ident(&new.name),
                new_type
            ));
        }
        if old.nullable != new.nullable {
            let change = if new.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
            statements.push(format!("{} {};", target, change));
        }
        if is_identity(old) && !is_identity(new) {
            statements.push(format!("{} DROP IDENTITY IF EXISTS;", target));
        }
        if old.default != new.default {
            match render_default(self, new) {
                Some(default) => statements.push(format!("{} SET DEFAULT {};", target, default)),
                None => statements.push(format!("{} DROP DEFAULT;", target)),
            }
        }
        if !is_identity(old) && is_identity(new) {
            statements.push(format!("{} ADD GENERATED BY DEFAULT AS IDENTITY;", target));
        }
        Ok(statements)
    }

    fn rename_sequence(&self, name: &ObjectName, new_name: &ObjectName) -> Vec<String> {
        let mut statements = Vec::new();
        let mut current = name.clone();
        if current.schema != new_name.schema {
            let schema = new_name.schema().unwrap_or(DEFAULT_SCHEMA);
            statements.push(format!(
                "ALTER SEQUENCE {} SET SCHEMA {};",
                self.qualified(&current),
                self.quote_ident(schema)
            ));
            current = current.with_schema(new_name.schema());
        }
        if current.name != new_name.name {
            statements.push(format!(
                "ALTER SEQUENCE {} RENAME TO {};",
                self.qualified(&current),
                self.quote_ident(&new_name.name)
            ));
        }
        statements
    }
}
