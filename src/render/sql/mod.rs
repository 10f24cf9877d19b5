//! Migration SQL generation
//!
//! Statement shapes shared by every dialect live in the submodules; the
//! [`SqlDialect`] trait covers quoting, type mapping and the statements
//! whose syntax differs between databases.

pub mod constraint;
pub mod index;
pub mod table;

use super::{Dialect, RenderedSql, escape_string};
use crate::catalog::{Annotations, Column, Database, Index, ObjectName, Sequence, modifier};
use crate::diff::operations::{AlterColumnOperation, MigrationOperation, Operation};
use crate::error::{ModelError, Result};
use crate::model::DefaultValue;
use tracing::debug;

pub use constraint::{
    render_add_foreign_key, render_add_primary_key, render_add_unique_constraint,
    render_drop_constraint,
};
pub use index::render_create_index;
pub use table::{render_column_definition, render_create_table};

pub trait SqlDialect {
    fn name(&self) -> &'static str;

    fn quote_ident(&self, ident: &str) -> String;

    fn qualified(&self, name: &ObjectName) -> String {
        match name.schema() {
            Some(schema) => format!("{}.{}", self.quote_ident(schema), self.quote_ident(&name.name)),
            None => self.quote_ident(&name.name),
        }
    }

    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn string_literal(&self, value: &str) -> String {
        escape_string(value)
    }

    fn literal(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Bool(true) => "TRUE".to_string(),
            DefaultValue::Bool(false) => "FALSE".to_string(),
            DefaultValue::Int(value) => value.to_string(),
            DefaultValue::Float(value) => format!("{:?}", value),
            DefaultValue::String(value) => self.string_literal(value),
        }
    }

    /// Store type for a column without an explicit store type, or `None`
    /// when the logical type has no mapping.
    fn map_type(&self, column: &Column) -> Option<String>;

    /// The explicit store type wins over the mapping.
    fn store_type(&self, table: &ObjectName, column: &Column) -> Result<String> {
        if let Some(store_type) = &column.store_type {
            return Ok(store_type.clone());
        }
        self.map_type(column)
            .ok_or_else(|| ModelError::UnsupportedType {
                table: table.to_string(),
                column: column.name.clone(),
                clr_type: column.clr_type.to_string(),
            })
    }

    /// Clause appended to a column definition for store-generated keys.
    fn identity_clause(&self, _column: &Column) -> Option<String> {
        None
    }

    fn computed_column(&self, name: &str, store_type: &str, sql: &str) -> String {
        format!(
            "{} {} GENERATED ALWAYS AS ({}) STORED",
            self.quote_ident(name),
            store_type,
            sql
        )
    }

    /// Clustering keyword after `PRIMARY KEY` / `UNIQUE`, with leading space.
    fn key_options(&self, _annotations: &Annotations) -> &'static str {
        ""
    }

    /// Keyword between `UNIQUE` and `INDEX`, with trailing space.
    fn index_options(&self, _index: &Index) -> &'static str {
        ""
    }

    fn rename_table(&self, name: &ObjectName, new_name: &str) -> Vec<String>;

    fn move_table(&self, name: &ObjectName, new_schema: Option<&str>) -> Vec<String>;

    fn rename_column(&self, table: &ObjectName, name: &str, new_name: &str) -> String;

    fn rename_index(&self, table: &ObjectName, name: &str, new_name: &str) -> String;

    fn drop_index(&self, table: &ObjectName, name: &str) -> String;

    fn alter_column(&self, operation: &AlterColumnOperation) -> Result<Vec<String>>;

    /// `column` is the definition being dropped, when the snapshot has it.
    fn drop_column(&self, table: &ObjectName, name: &str, _column: Option<&Column>) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.qualified(table),
            self.quote_ident(name)
        )]
    }

    fn rename_sequence(&self, name: &ObjectName, new_name: &ObjectName) -> Vec<String>;

    fn create_sequence(&self, sequence: &Sequence) -> String {
        format!(
            "CREATE SEQUENCE {} AS {} START WITH {} INCREMENT BY {};",
            self.qualified(&sequence.name),
            sequence.type_name,
            sequence.start_value,
            sequence.increment_by
        )
    }

    fn alter_sequence(&self, name: &ObjectName, increment_by: i64) -> String {
        format!(
            "ALTER SEQUENCE {} INCREMENT BY {};",
            self.qualified(name),
            increment_by
        )
    }

    fn restart_sequence(&self, name: &ObjectName, start_value: i64) -> String {
        format!(
            "ALTER SEQUENCE {} RESTART WITH {};",
            self.qualified(name),
            start_value
        )
    }
}

/// Renders an operation list against a running snapshot. The snapshot is
/// advanced with the modifier after each operation, so every statement
/// sees the database as the previous statements left it.
pub struct MigrationSqlGenerator {
    dialect: Dialect,
}

impl MigrationSqlGenerator {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn generate(
        &self,
        operations: &[MigrationOperation],
        snapshot: &Database,
    ) -> Result<Vec<RenderedSql>> {
        let dialect = self.dialect.sql_dialect();
        let mut database = snapshot.clone();
        let mut rendered = Vec::new();

        for operation in operations {
            let statements = render_operation(dialect.as_ref(), operation, &database)?;
            debug!(
                "Rendered {} as {} {} statement(s)",
                operation,
                statements.len(),
                dialect.name()
            );
            let destructive = operation.is_destructive();
            rendered.extend(statements.into_iter().map(|sql| {
                if destructive {
                    RenderedSql::destructive(sql)
                } else {
                    RenderedSql::new(sql)
                }
            }));
            modifier::modify(&mut database, operation)?;
        }
        Ok(rendered)
    }

    /// Convenience for a whole script joined with blank lines.
    pub fn generate_script(
        &self,
        operations: &[MigrationOperation],
        snapshot: &Database,
    ) -> Result<String> {
        Ok(self
            .generate(operations, snapshot)?
            .iter()
            .map(|r| r.sql.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

fn render_operation(
    dialect: &dyn SqlDialect,
    operation: &MigrationOperation,
    database: &Database,
) -> Result<Vec<String>> {
    let statements = match operation {
        MigrationOperation::CreateTable(op) => vec![render_create_table(dialect, op)?],
        MigrationOperation::DropTable(op) => {
            vec![format!("DROP TABLE {};", dialect.qualified(&op.name))]
        }
        MigrationOperation::RenameTable(op) => dialect.rename_table(&op.name, &op.new_name),
        MigrationOperation::MoveTable(op) => {
            dialect.move_table(&op.name, op.new_schema.as_deref())
        }
        MigrationOperation::AddColumn(op) => vec![format!(
            "ALTER TABLE {} ADD {};",
            dialect.qualified(&op.table),
            render_column_definition(dialect, &op.table, &op.column)?
        )],
        MigrationOperation::DropColumn(op) => {
            let column = database
                .table(&op.table)
                .and_then(|t| t.column(&op.name));
            dialect.drop_column(&op.table, &op.name, column)
        }
        MigrationOperation::AlterColumn(op) => dialect.alter_column(op)?,
        MigrationOperation::RenameColumn(op) => {
            vec![dialect.rename_column(&op.table, &op.name, &op.new_name)]
        }
        MigrationOperation::AddPrimaryKey(op) => {
            vec![render_add_primary_key(dialect, &op.table, &op.primary_key)]
        }
        MigrationOperation::DropPrimaryKey(op) => {
            vec![render_drop_constraint(dialect, &op.table, &op.name)]
        }
        MigrationOperation::AddUniqueConstraint(op) => vec![render_add_unique_constraint(
            dialect,
            &op.table,
            &op.unique_constraint,
        )],
        MigrationOperation::DropUniqueConstraint(op) => {
            vec![render_drop_constraint(dialect, &op.table, &op.name)]
        }
        MigrationOperation::AddForeignKey(op) => {
            vec![render_add_foreign_key(dialect, &op.table, &op.foreign_key)]
        }
        MigrationOperation::DropForeignKey(op) => {
            vec![render_drop_constraint(dialect, &op.table, &op.name)]
        }
        MigrationOperation::CreateIndex(op) => {
            vec![render_create_index(dialect, &op.table, &op.index)]
        }
        MigrationOperation::DropIndex(op) => vec![dialect.drop_index(&op.table, &op.name)],
        MigrationOperation::RenameIndex(op) => {
            vec![dialect.rename_index(&op.table, &op.name, &op.new_name)]
        }
        MigrationOperation::CreateSequence(op) => vec![dialect.create_sequence(&op.sequence)],
        MigrationOperation::AlterSequence(op) => {
            vec![dialect.alter_sequence(&op.name, op.increment_by)]
        }
        MigrationOperation::DropSequence(op) => {
            vec![format!("DROP SEQUENCE {};", dialect.qualified(&op.name))]
        }
        MigrationOperation::RenameSequence(op) => dialect.rename_sequence(&op.name, &op.new_name),
        MigrationOperation::RestartSequence(op) => {
            vec![dialect.restart_sequence(&op.name, op.start_value)]
        }
        MigrationOperation::Sql(op) => vec![op.sql.clone()],
        MigrationOperation::CopyData(op) => vec![format!(
            "INSERT INTO {} ({})\nSELECT {}\nFROM {};",
            dialect.qualified(&op.target_table),
            dialect.column_list(&op.target_columns),
            dialect.column_list(&op.source_columns),
            dialect.qualified(&op.source_table)
        )],
    };
    Ok(statements)
}
