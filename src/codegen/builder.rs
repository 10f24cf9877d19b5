//! The API generated migration code is written against.
//!
//! Every method appends one operation and returns it, so that generated
//! code can chain `.annotation(..)` for operation-level annotations.
//! Names are schema-qualified strings (`"dbo.Blogs"`).

use crate::catalog::{Column, ForeignKey, Index, ObjectName, PrimaryKey, Sequence, UniqueConstraint};
use crate::diff::operations::*;

#[derive(Debug, Default)]
pub struct MigrationBuilder {
    operations: Vec<MigrationOperation>,
}

impl MigrationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[MigrationOperation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<MigrationOperation> {
        self.operations
    }

    fn push(&mut self, operation: impl Into<MigrationOperation>) -> &mut MigrationOperation {
        let index = self.operations.len();
        self.operations.push(operation.into());
        &mut self.operations[index]
    }

    pub fn create_table(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut CreateTableOperation),
    ) -> &mut MigrationOperation {
        let mut operation = CreateTableOperation::new(ObjectName::from(name));
        build(&mut operation);
        self.push(operation)
    }

    pub fn drop_table(&mut self, name: &str) -> &mut MigrationOperation {
        self.push(DropTableOperation::new(ObjectName::from(name)))
    }

    pub fn rename_table(&mut self, name: &str, new_name: &str) -> &mut MigrationOperation {
        self.push(RenameTableOperation::new(ObjectName::from(name), new_name))
    }

    pub fn move_table(&mut self, name: &str, new_schema: Option<&str>) -> &mut MigrationOperation {
        self.push(MoveTableOperation::new(ObjectName::from(name), new_schema))
    }

    pub fn add_column(&mut self, table: &str, column: Column) -> &mut MigrationOperation {
        self.push(AddColumnOperation::new(ObjectName::from(table), column))
    }

    pub fn drop_column(&mut self, table: &str, name: &str) -> &mut MigrationOperation {
        self.push(DropColumnOperation::new(ObjectName::from(table), name))
    }

    pub fn alter_column(
        &mut self,
        table: &str,
        old_column: Column,
        column: Column,
    ) -> &mut MigrationOperation {
        self.push(AlterColumnOperation::new(
            ObjectName::from(table),
            old_column,
            column,
        ))
    }

    pub fn rename_column(
        &mut self,
        table: &str,
        name: &str,
        new_name: &str,
    ) -> &mut MigrationOperation {
        self.push(RenameColumnOperation::new(
            ObjectName::from(table),
            name,
            new_name,
        ))
    }

    pub fn add_primary_key(&mut self, table: &str, key: PrimaryKey) -> &mut MigrationOperation {
        self.push(AddPrimaryKeyOperation::new(ObjectName::from(table), key))
    }

    pub fn drop_primary_key(&mut self, table: &str, name: &str) -> &mut MigrationOperation {
        self.push(DropPrimaryKeyOperation::new(ObjectName::from(table), name))
    }

    pub fn add_unique_constraint(
        &mut self,
        table: &str,
        key: UniqueConstraint,
    ) -> &mut MigrationOperation {
        self.push(AddUniqueConstraintOperation::new(ObjectName::from(table), key))
    }

    pub fn drop_unique_constraint(&mut self, table: &str, name: &str) -> &mut MigrationOperation {
        self.push(DropUniqueConstraintOperation::new(
            ObjectName::from(table),
            name,
        ))
    }

    pub fn add_foreign_key(
        &mut self,
        table: &str,
        foreign_key: ForeignKey,
    ) -> &mut MigrationOperation {
        self.push(AddForeignKeyOperation::new(
            ObjectName::from(table),
            foreign_key,
        ))
    }

    pub fn drop_foreign_key(&mut self, table: &str, name: &str) -> &mut MigrationOperation {
        self.push(DropForeignKeyOperation::new(ObjectName::from(table), name))
    }

    pub fn create_index(&mut self, table: &str, index: Index) -> &mut MigrationOperation {
        self.push(CreateIndexOperation::new(ObjectName::from(table), index))
    }

    pub fn drop_index(&mut self, table: &str, name: &str) -> &mut MigrationOperation {
        self.push(DropIndexOperation::new(ObjectName::from(table), name))
    }

    pub fn rename_index(
        &mut self,
        table: &str,
        name: &str,
        new_name: &str,
    ) -> &mut MigrationOperation {
        self.push(RenameIndexOperation::new(
            ObjectName::from(table),
            name,
            new_name,
        ))
    }

    pub fn create_sequence(&mut self, sequence: Sequence) -> &mut MigrationOperation {
        self.push(CreateSequenceOperation::new(sequence))
    }

    pub fn alter_sequence(
        &mut self,
        name: &str,
        old_increment_by: i64,
        increment_by: i64,
    ) -> &mut MigrationOperation {
        self.push(AlterSequenceOperation::new(
            ObjectName::from(name),
            old_increment_by,
            increment_by,
        ))
    }

    pub fn drop_sequence(&mut self, name: &str) -> &mut MigrationOperation {
        self.push(DropSequenceOperation::new(ObjectName::from(name)))
    }

    pub fn rename_sequence(&mut self, name: &str, new_name: &str) -> &mut MigrationOperation {
        self.push(RenameSequenceOperation::new(
            ObjectName::from(name),
            ObjectName::from(new_name),
        ))
    }

    pub fn restart_sequence(&mut self, name: &str, start_value: i64) -> &mut MigrationOperation {
        self.push(RestartSequenceOperation::new(
            ObjectName::from(name),
            start_value,
        ))
    }

    pub fn sql(&mut self, sql: &str, suppress_transaction: bool) -> &mut MigrationOperation {
        let mut operation = SqlOperation::new(sql);
        operation.suppress_transaction = suppress_transaction;
        self.push(operation)
    }

    pub fn copy_data(
        &mut self,
        source_table: &str,
        source_columns: &[&str],
        target_table: &str,
        target_columns: &[&str],
    ) -> &mut MigrationOperation {
        let names = |columns: &[&str]| -> Vec<String> { columns.iter().map(|c| c.to_string()).collect() };
        self.push(CopyDataOperation::new(
            ObjectName::from(source_table),
            names(source_columns),
            ObjectName::from(target_table),
            names(target_columns),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Annotated;
    use crate::model::ClrType;

    #[test]
    fn test_create_table_collects_columns_and_keys() {
        let mut builder = MigrationBuilder::new();
        builder
            .create_table("dbo.Blogs", |table| {
                table.column(Column::new("Id", ClrType::Int32));
                table.primary_key(PrimaryKey::new("PK_Blogs", vec!["Id".into()]));
            })
            .annotation("Comment", "blogs");

        let operations = builder.into_operations();
        let MigrationOperation::CreateTable(create) = &operations[0] else {
            panic!("expected a create table operation");
        };
        assert_eq!(create.name, ObjectName::from("dbo.Blogs"));
        assert_eq!(create.columns.len(), 1);
        assert_eq!(create.annotations.get("Comment"), Some(&"blogs".into()));
    }

    #[test]
    fn test_annotation_lands_on_added_object() {
        let mut builder = MigrationBuilder::new();
        builder.create_index(
            "dbo.Blogs",
            Index::new("IX_Url", vec!["Url".into()], true).with_annotation("SqlServer:FillFactor", 80),
        );
        builder.drop_index("dbo.Blogs", "IX_Old").annotation("Online", true);

        let operations = builder.operations();
        let MigrationOperation::CreateIndex(create) = &operations[0] else {
            panic!("expected a create index operation");
        };
        assert!(!create.index.annotations.is_empty());
        let MigrationOperation::DropIndex(drop) = &operations[1] else {
            panic!("expected a drop index operation");
        };
        assert_eq!(drop.annotations.get("Online"), Some(&true.into()));
    }
}
