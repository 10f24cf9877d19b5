//! SQL Server dialect: bracketed identifiers, `sp_rename`, schema transfer
//! for moves, and clustering on keys and indexes.
//!
//! Dropping or altering a column that has a default first drops the
//! default constraint by looking up its generated name. Each lookup
//! declares its own `@varN`, numbered per dialect instance.

use super::quote_bracket;
use super::sql::table::{is_identity, render_default};
use super::sql::{SqlDialect, render_column_definition};
use crate::catalog::{Annotations, Column, Index, ObjectName};
use crate::diff::operations::AlterColumnOperation;
use crate::error::Result;
use crate::model::{ClrType, DefaultValue};
use std::cell::Cell;

const DEFAULT_SCHEMA: &str = "dbo";

#[derive(Debug, Default)]
pub struct SqlServerDialect {
    variable_counter: Cell<usize>,
}

impl SqlServerDialect {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_variable(&self) -> String {
        let n = self.variable_counter.get();
        self.variable_counter.set(n + 1);
        format!("@var{}", n)
    }

    fn sp_rename(&self, object: &str, new_name: &str, kind: Option<&str>) -> String {
        let mut sql = format!(
            "EXEC sp_rename {}, {}",
            self.string_literal(object),
            self.string_literal(new_name)
        );
        if let Some(kind) = kind {
            sql.push_str(", ");
            sql.push_str(&self.string_literal(kind));
        }
        sql.push(';');
        sql
    }

    fn ensure_schema(&self, schema: &str) -> Option<String> {
        (schema != DEFAULT_SCHEMA).then(|| {
            let create = format!("CREATE SCHEMA {};", self.quote_ident(schema));
            format!(
                "IF SCHEMA_ID({}) IS NULL EXEC({});",
                self.string_literal(schema),
                self.string_literal(&create)
            )
        })
    }

    fn transfer(&self, name: &ObjectName, schema: &str) -> Vec<String> {
        let mut statements: Vec<String> = self.ensure_schema(schema).into_iter().collect();
        statements.push(format!(
            "ALTER SCHEMA {} TRANSFER {};",
            self.quote_ident(schema),
            self.qualified(name)
        ));
        statements
    }

    /// Drops whatever default constraint the column has, under its
    /// server-generated name.
    fn drop_default_constraint(&self, table: &ObjectName, column: &str) -> String {
        let variable = self.next_variable();
        let drop = format!("ALTER TABLE {} DROP CONSTRAINT [", self.qualified(table));
        [
            format!("DECLARE {} sysname;", variable),
            format!("SELECT {} = [d].[name]", variable),
            "FROM [sys].[default_constraints] [d]".to_string(),
            "INNER JOIN [sys].[columns] [c] ON [d].[parent_column_id] = [c].[column_id] AND [d].[parent_object_id] = [c].[object_id]".to_string(),
            format!(
                "WHERE ([d].[parent_object_id] = OBJECT_ID({}) AND [c].[name] = {});",
                self.string_literal(&self.qualified(table)),
                self.string_literal(column)
            ),
            format!(
                "IF {} IS NOT NULL EXEC({} + {} + N'];');",
                variable,
                self.string_literal(&drop),
                variable
            ),
        ]
        .join("\n")
    }
}

impl SqlDialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_bracket(ident)
    }

    fn string_literal(&self, value: &str) -> String {
        format!("N'{}'", value.replace('\'', "''"))
    }

    fn literal(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Bool(true) => "CAST(1 AS bit)".to_string(),
            DefaultValue::Bool(false) => "CAST(0 AS bit)".to_string(),
            DefaultValue::Int(value) => value.to_string(),
            DefaultValue::Float(value) => format!("{:?}", value),
            DefaultValue::String(value) => self.string_literal(value),
        }
    }

    fn map_type(&self, column: &Column) -> Option<String> {
        let unicode = column.unicode != Some(false);
        let fixed = column.fixed_length == Some(true);
        let length = |l: Option<u32>| l.map_or_else(|| "max".to_string(), |l| l.to_string());

        let mapped = match &column.clr_type {
            ClrType::Bool => "bit".to_string(),
            ClrType::Byte => "tinyint".to_string(),
            ClrType::Int16 => "smallint".to_string(),
            ClrType::Int32 => "int".to_string(),
            ClrType::Int64 => "bigint".to_string(),
            ClrType::Single => "real".to_string(),
            ClrType::Double => "float".to_string(),
            ClrType::Decimal => format!(
                "decimal({},{})",
                column.precision.unwrap_or(18),
                column.scale.unwrap_or(if column.precision.is_some() { 0 } else { 2 })
            ),
            ClrType::Char => if unicode { "nchar(1)" } else { "char(1)" }.to_string(),
            ClrType::String => {
                let base = match (unicode, fixed && column.max_length.is_some()) {
                    (true, true) => "nchar",
                    (true, false) => "nvarchar",
                    (false, true) => "char",
                    (false, false) => "varchar",
                };
                format!("{}({})", base, length(column.max_length))
            }
            ClrType::Bytes => {
                let base = if fixed && column.max_length.is_some() {
                    "binary"
                } else {
                    "varbinary"
                };
                format!("{}({})", base, length(column.max_length))
            }
            ClrType::DateTime => "datetime2".to_string(),
            ClrType::DateTimeOffset => "datetimeoffset".to_string(),
            ClrType::TimeSpan => "time".to_string(),
            ClrType::Guid => "uniqueidentifier".to_string(),
            ClrType::Custom(_) => return None,
        };
        Some(mapped)
    }

    fn identity_clause(&self, column: &Column) -> Option<String> {
        is_identity(column).then(|| "IDENTITY(1,1)".to_string())
    }

    fn computed_column(&self, name: &str, _store_type: &str, sql: &str) -> String {
        format!("{} AS {}", self.quote_ident(name), sql)
    }

    fn key_options(&self, annotations: &Annotations) -> &'static str {
        match annotations.clustered() {
            Some(true) => " CLUSTERED",
            Some(false) => " NONCLUSTERED",
            None => "",
        }
    }

    fn index_options(&self, index: &Index) -> &'static str {
        match index.annotations.clustered() {
            Some(true) => "CLUSTERED ",
            Some(false) => "NONCLUSTERED ",
            None => "",
        }
    }

    fn rename_table(&self, name: &ObjectName, new_name: &str) -> Vec<String> {
        vec![self.sp_rename(&self.qualified(name), new_name, None)]
    }

    fn move_table(&self, name: &ObjectName, new_schema: Option<&str>) -> Vec<String> {
        self.transfer(name, new_schema.unwrap_or(DEFAULT_SCHEMA))
    }

    fn rename_column(&self, table: &ObjectName, name: &str, new_name: &str) -> String {
        let object = format!("{}.{}", self.qualified(table), self.quote_ident(name));
        self.sp_rename(&object, new_name, Some("COLUMN"))
    }

    fn rename_index(&self, table: &ObjectName, name: &str, new_name: &str) -> String {
        let object = format!("{}.{}", self.qualified(table), self.quote_ident(name));
        self.sp_rename(&object, new_name, Some("INDEX"))
    }

    fn drop_index(&self, table: &ObjectName, name: &str) -> String {
        format!(
            "DROP INDEX {} ON {};",
            self.quote_ident(name),
            self.qualified(table)
        )
    }

    fn alter_column(&self, operation: &AlterColumnOperation) -> Result<Vec<String>> {
        let table = &operation.table;
        let old = &operation.old_column;
        let new = &operation.column;

        if old.computed_sql != new.computed_sql || new.computed_sql.is_some() {
            let mut statements = self.drop_column(table, &old.name, Some(old));
            statements.push(format!(
                "ALTER TABLE {} ADD {};",
                self.qualified(table),
                render_column_definition(self, table, new)?
            ));
            return Ok(statements);
        }

        let mut statements = Vec::new();
        if old.default.is_some() {
            statements.push(self.drop_default_constraint(table, &old.name));
        }
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} {} {};",
            self.qualified(table),
            self.quote_ident(&new.name),
            self.store_type(table, new)?,
            if new.nullable { "NULL" } else { "NOT NULL" }
        ));
        if let Some(default) = render_default(self, new) {
            statements.push(format!(
                "ALTER TABLE {} ADD DEFAULT {} FOR {};",
                self.qualified(table),
                default,
                self.quote_ident(&new.name)
            ));
        }
        Ok(statements)
    }

    fn drop_column(&self, table: &ObjectName, name: &str, column: Option<&Column>) -> Vec<String> {
        let mut statements = Vec::new();
        if column.is_some_and(|c| c.default.is_some()) {
            statements.push(self.drop_default_constraint(table, name));
        }
        statements.push(format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.qualified(table),
            self.quote_ident(name)
        ));
        statements
    }

    fn rename_sequence(&self, name: &ObjectName, new_name: &ObjectName) -> Vec<String> {
        let mut statements = Vec::new();
        let mut current = name.clone();
        if current.schema != new_name.schema {
            statements.extend(self.transfer(&current, new_name.schema().unwrap_or(DEFAULT_SCHEMA)));
            current = current.with_schema(new_name.schema());
        }
        if current.name != new_name.name {
            statements.push(self.sp_rename(&self.qualified(&current), &new_name.name, None));
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Database, PrimaryKey, Table};
    use crate::diff::operations::{
        CreateIndexOperation, CreateTableOperation, DropColumnOperation, MigrationOperation,
        MoveTableOperation, RenameColumnOperation, RenameTableOperation,
    };
    use crate::model::ValueGenerated;
    use crate::render::{Dialect, MigrationSqlGenerator};
    use insta::assert_snapshot;
    use rstest::rstest;

    fn customers() -> Table {
        let mut table = Table::new(ObjectName::from("dbo.Customers"));
        let mut id = Column::new("Id", ClrType::Int32);
        id.value_generated = ValueGenerated::OnAdd;
        table.add_column(id).unwrap();
        table
            .add_column(Column::new("Name", ClrType::String).with_max_length(100))
            .unwrap();
        table
            .add_column(Column::new("Active", ClrType::Bool).with_default_value(true))
            .unwrap();
        let mut pk = PrimaryKey::new("PK_Customers", vec!["Id".to_string()]);
        pk.annotations.set_clustered(false);
        table.set_primary_key(pk).unwrap();
        table
    }

    fn with_customers() -> Database {
        let mut database = Database::new();
        database.add_table(customers()).unwrap();
        database
    }

    fn render(operations: Vec<MigrationOperation>, snapshot: &Database) -> String {
        MigrationSqlGenerator::new(Dialect::SqlServer)
            .generate_script(&operations, snapshot)
            .unwrap()
    }

    #[rstest]
    #[case::int(Column::new("c", ClrType::Int32), "int")]
    #[case::unicode_string(Column::new("c", ClrType::String), "nvarchar(max)")]
    #[case::bounded_string(Column::new("c", ClrType::String).with_max_length(64), "nvarchar(64)")]
    #[case::bytes(Column::new("c", ClrType::Bytes), "varbinary(max)")]
    #[case::decimal(Column::new("c", ClrType::Decimal), "decimal(18,2)")]
    #[case::date_time(Column::new("c", ClrType::DateTime), "datetime2")]
    fn test_store_type(#[case] column: Column, #[case] expected: &str) {
        let dialect = SqlServerDialect::new();
        assert_eq!(
            dialect.store_type(&ObjectName::from("T"), &column).unwrap(),
            expected
        );
    }

    #[test]
    fn test_ansi_string() {
        let mut column = Column::new("Code", ClrType::String).with_max_length(3);
        column.unicode = Some(false);
        column.fixed_length = Some(true);
        assert_eq!(
            SqlServerDialect::new().map_type(&column).as_deref(),
            Some("char(3)")
        );
    }

    #[test]
    fn test_create_table() {
        let sql = render(
            vec![CreateTableOperation::from_table(&customers()).into()],
            &Database::new(),
        );
        assert_snapshot!(sql, @r"
        CREATE TABLE [dbo].[Customers] (
            [Id] int IDENTITY(1,1) NOT NULL,
            [Name] nvarchar(100) NULL,
            [Active] bit NOT NULL DEFAULT CAST(1 AS bit),
            CONSTRAINT [PK_Customers] PRIMARY KEY NONCLUSTERED ([Id])
        );
        ");
    }

    #[test]
    fn test_clustered_index() {
        let mut index = Index::new("IX_Customers_Name", vec!["Name".to_string()], true);
        index.annotations.set_clustered(true);
        let sql = render(
            vec![CreateIndexOperation::new(ObjectName::from("dbo.Customers"), index).into()],
            &with_customers(),
        );
        assert_snapshot!(sql, @"CREATE UNIQUE CLUSTERED INDEX [IX_Customers_Name] ON [dbo].[Customers] ([Name]);");
    }

    #[test]
    fn test_renames_use_sp_rename() {
        let table = ObjectName::from("dbo.Customers");
        let sql = render(
            vec![
                RenameColumnOperation::new(table.clone(), "Name", "FullName").into(),
                RenameTableOperation::new(table, "Clients").into(),
            ],
            &with_customers(),
        );
        assert_snapshot!(sql, @r"
        EXEC sp_rename N'[dbo].[Customers].[Name]', N'FullName', N'COLUMN';

        EXEC sp_rename N'[dbo].[Customers]', N'Clients';
        ");
    }

    #[test]
    fn test_move_table_transfers_schema() {
        let sql = render(
            vec![MoveTableOperation::new(ObjectName::from("dbo.Customers"), Some("crm")).into()],
            &with_customers(),
        );
        assert_snapshot!(sql, @r"
        IF SCHEMA_ID(N'crm') IS NULL EXEC(N'CREATE SCHEMA [crm];');

        ALTER SCHEMA [crm] TRANSFER [dbo].[Customers];
        ");
    }

    #[test]
    fn test_drop_column_with_default_drops_constraint_first() {
        let table = ObjectName::from("dbo.Customers");
        let sql = render(
            vec![
                DropColumnOperation::new(table.clone(), "Active").into(),
                DropColumnOperation::new(table, "Name").into(),
            ],
            &with_customers(),
        );
        assert_snapshot!(sql, @r"
        DECLARE @var0 sysname;
        SELECT @var0 = [d].[name]
        FROM [sys].[default_constraints] [d]
        INNER JOIN [sys].[columns] [c] ON [d].[parent_column_id] = [c].[column_id] AND [d].[parent_object_id] = [c].[object_id]
        WHERE ([d].[parent_object_id] = OBJECT_ID(N'[dbo].[Customers]') AND [c].[name] = N'Active');
        IF @var0 IS NOT NULL EXEC(N'ALTER TABLE [dbo].[Customers] DROP CONSTRAINT [' + @var0 + N'];');

        ALTER TABLE [dbo].[Customers] DROP COLUMN [Active];

        ALTER TABLE [dbo].[Customers] DROP COLUMN [Name];
        ");
    }

    #[test]
    fn test_alter_column_numbers_variables_per_script() {
        let table = ObjectName::from("dbo.Customers");
        let old = Column::new("Active", ClrType::Bool).with_default_value(true);
        let new = Column::new("Active", ClrType::Bool).with_default_value(false);
        let dialect = SqlServerDialect::new();
        let first = dialect
            .alter_column(&AlterColumnOperation::new(table.clone(), old.clone(), new.clone()))
            .unwrap();
        let second = dialect
            .alter_column(&AlterColumnOperation::new(table, old, new))
            .unwrap();
        assert!(first[0].starts_with("DECLARE @var0 sysname;"));
        assert!(second[0].starts_with("DECLARE @var1 sysname;"));
        assert_eq!(
            first[1],
            "ALTER TABLE [dbo].[Customers] ALTER COLUMN [Active] bit NOT NULL;"
        );
        assert_eq!(
            first[2],
            "ALTER TABLE [dbo].[Customers] ADD DEFAULT CAST(0 AS bit) FOR [Active];"
        );
    }

    #[test]
    fn test_rename_sequence_moves_then_renames() {
        let statements = SqlServerDialect::new().rename_sequence(
            &ObjectName::from("dbo.Numbers"),
            &ObjectName::from("dbo.OrderNumbers"),
        );
        assert_eq!(
            statements,
            vec!["EXEC sp_rename N'[dbo].[Numbers]', N'OrderNumbers';".to_string()]
        );
    }
}
