//! Replays migration operations onto a [`Database`].
//!
//! Every operation must fit the database it is applied to: dropping
//! something absent, creating something present, or dropping an object
//! that is still referenced is an error rather than a silent no-op.

use super::{Database, ObjectName, Table};
use crate::diff::operations::*;
use crate::error::{ModelError, Result};
use tracing::debug;

/// Applies one operation in place.
pub fn modify(database: &mut Database, operation: &MigrationOperation) -> Result<()> {
    debug!("Applying {}", operation);
    match operation {
        MigrationOperation::CreateTable(op) => create_table(database, op),
        MigrationOperation::DropTable(op) => drop_table(database, &op.name),
        MigrationOperation::RenameTable(op) => rename_table(database, &op.name, op.renamed()),
        MigrationOperation::MoveTable(op) => rename_table(database, &op.name, op.moved()),
        MigrationOperation::AddColumn(op) => database
            .require_table_mut(&op.table)?
            .add_column(op.column.clone()),
        MigrationOperation::DropColumn(op) => drop_column(database, &op.table, &op.name),
        MigrationOperation::AlterColumn(op) => {
            let table = database.require_table_mut(&op.table)?;
            let column = table
                .column_mut(&op.column.name)
                .ok_or_else(|| ModelError::not_found("column", column_path(&op.table, &op.column.name)))?;
            *column = op.column.clone();
            Ok(())
        }
        MigrationOperation::RenameColumn(op) => {
            rename_column(database, &op.table, &op.name, &op.new_name)
        }
        MigrationOperation::AddPrimaryKey(op) => database
            .require_table_mut(&op.table)?
            .set_primary_key(op.primary_key.clone()),
        MigrationOperation::DropPrimaryKey(op) => drop_primary_key(database, &op.table, &op.name),
        MigrationOperation::AddUniqueConstraint(op) => database
            .require_table_mut(&op.table)?
            .add_unique_constraint(op.unique_constraint.clone()),
        MigrationOperation::DropUniqueConstraint(op) => {
            drop_unique_constraint(database, &op.table, &op.name)
        }
        MigrationOperation::AddForeignKey(op) => add_foreign_key(database, op),
        MigrationOperation::DropForeignKey(op) => {
            let table = database.require_table_mut(&op.table)?;
            let position = table
                .foreign_keys
                .iter()
                .position(|fk| fk.name == op.name)
                .ok_or_else(|| ModelError::not_found("foreign key", column_path(&op.table, &op.name)))?;
            table.foreign_keys.remove(position);
            Ok(())
        }
        MigrationOperation::CreateIndex(op) => database
            .require_table_mut(&op.table)?
            .add_index(op.index.clone()),
        MigrationOperation::DropIndex(op) => {
            let table = database.require_table_mut(&op.table)?;
            let position = table
                .indexes
                .iter()
                .position(|ix| ix.name == op.name)
                .ok_or_else(|| ModelError::not_found("index", column_path(&op.table, &op.name)))?;
            table.indexes.remove(position);
            Ok(())
        }
        MigrationOperation::RenameIndex(op) => {
            let table = database.require_table_mut(&op.table)?;
            if table.index(&op.new_name).is_some() {
                return Err(ModelError::duplicate("index", column_path(&op.table, &op.new_name)));
            }
            let index = table
                .indexes
                .iter_mut()
                .find(|ix| ix.name == op.name)
                .ok_or_else(|| ModelError::not_found("index", column_path(&op.table, &op.name)))?;
            index.name.clone_from(&op.new_name);
            Ok(())
        }
        MigrationOperation::CreateSequence(op) => database.add_sequence(op.sequence.clone()),
        MigrationOperation::AlterSequence(op) => {
            let sequence = database
                .sequence_mut(&op.name)
                .ok_or_else(|| ModelError::not_found("sequence", &op.name))?;
            sequence.increment_by = op.increment_by;
            sequence.annotations = op.annotations.clone();
            Ok(())
        }
        MigrationOperation::DropSequence(op) => database.remove_sequence(&op.name).map(|_| ()),
        MigrationOperation::RenameSequence(op) => {
            if database.sequence(&op.new_name).is_some() {
                return Err(ModelError::duplicate("sequence", &op.new_name));
            }
            let sequence = database
                .sequence_mut(&op.name)
                .ok_or_else(|| ModelError::not_found("sequence", &op.name))?;
            sequence.name = op.new_name.clone();
            Ok(())
        }
        MigrationOperation::RestartSequence(op) => {
            let sequence = database
                .sequence_mut(&op.name)
                .ok_or_else(|| ModelError::not_found("sequence", &op.name))?;
            sequence.start_value = op.start_value;
            Ok(())
        }
        // Data and script operations leave the schema as it is.
        MigrationOperation::Sql(_) | MigrationOperation::CopyData(_) => Ok(()),
    }
}

/// Applies one operation and hands the database back.
pub fn apply(mut database: Database, operation: &MigrationOperation) -> Result<Database> {
    modify(&mut database, operation)?;
    Ok(database)
}

/// Applies operations in order, stopping at the first failure.
pub fn apply_all(database: Database, operations: &[MigrationOperation]) -> Result<Database> {
    operations.iter().try_fold(database, apply)
}

fn column_path(table: &ObjectName, name: &str) -> String {
    format!("{}.{}", table, name)
}

fn create_table(database: &mut Database, op: &CreateTableOperation) -> Result<()> {
    let mut table = Table::new(op.name.clone());
    table.annotations = op.annotations.clone();
    for column in &op.columns {
        table.add_column(column.clone())?;
    }
    if let Some(primary_key) = &op.primary_key {
        table.set_primary_key(primary_key.clone())?;
    }
    for unique in &op.unique_constraints {
        table.add_unique_constraint(unique.clone())?;
    }
    database.add_table(table)
}

fn drop_table(database: &mut Database, name: &ObjectName) -> Result<()> {
    if let Some((owner, fk)) = database.foreign_keys_referencing(name).into_iter().next() {
        return Err(ModelError::ObjectInUse {
            kind: "table",
            name: name.to_string(),
            used_by: format!("foreign key {} on {}", fk, owner),
        });
    }
    database.remove_table(name).map(|_| ())
}

fn rename_table(database: &mut Database, old: &ObjectName, new: ObjectName) -> Result<()> {
    if database.table(&new).is_some() {
        return Err(ModelError::duplicate("table", &new));
    }
    database.require_table_mut(old)?.name = new.clone();
    for table in &mut database.tables {
        for fk in &mut table.foreign_keys {
            if &fk.principal_table == old {
                fk.principal_table = new.clone();
            }
        }
    }
    Ok(())
}

/// Foreign keys anywhere in the database that point at `columns` of `table`.
fn referencing_foreign_keys(
    database: &Database,
    table: &ObjectName,
    columns: &[String],
) -> Option<String> {
    database.tables.iter().find_map(|t| {
        t.foreign_keys
            .iter()
            .find(|fk| &fk.principal_table == table && fk.principal_columns == columns)
            .map(|fk| format!("foreign key {} on {}", fk.name, t.name))
    })
}

fn drop_column(database: &mut Database, table_name: &ObjectName, name: &str) -> Result<()> {
    let table = database.require_table(table_name)?;
    if !table.has_column(name) {
        return Err(ModelError::not_found("column", column_path(table_name, name)));
    }
    if let Some(user) = table.users_of_column(name).into_iter().next() {
        return Err(ModelError::ObjectInUse {
            kind: "column",
            name: column_path(table_name, name),
            used_by: user,
        });
    }
    let referenced_by = database.tables.iter().find_map(|t| {
        t.foreign_keys
            .iter()
            .find(|fk| {
                &fk.principal_table == table_name && fk.principal_columns.iter().any(|c| c == name)
            })
            .map(|fk| format!("foreign key {} on {}", fk.name, t.name))
    });
    if let Some(used_by) = referenced_by {
        return Err(ModelError::ObjectInUse {
            kind: "column",
            name: column_path(table_name, name),
            used_by,
        });
    }

    let table = database.require_table_mut(table_name)?;
    table.columns.retain(|c| c.name != name);
    Ok(())
}

fn rename_column(
    database: &mut Database,
    table_name: &ObjectName,
    old: &str,
    new: &str,
) -> Result<()> {
    let table = database.require_table_mut(table_name)?;
    if table.has_column(new) {
        return Err(ModelError::duplicate("column", column_path(table_name, new)));
    }
    let column = table
        .column_mut(old)
        .ok_or_else(|| ModelError::not_found("column", column_path(table_name, old)))?;
    column.name = new.to_string();
    table.rename_column_references(old, new);

    for other in database.tables.iter_mut().filter(|t| &t.name != table_name) {
        for fk in &mut other.foreign_keys {
            if &fk.principal_table == table_name {
                for column in fk.principal_columns.iter_mut().filter(|c| c.as_str() == old) {
                    *column = new.to_string();
                }
            }
        }
    }
    Ok(())
}

fn drop_primary_key(database: &mut Database, table_name: &ObjectName, name: &str) -> Result<()> {
    let table = database.require_table(table_name)?;
    let primary_key = table
        .primary_key
        .as_ref()
        .filter(|pk| pk.name == name)
        .ok_or_else(|| ModelError::not_found("primary key", column_path(table_name, name)))?;
    if let Some(used_by) = referencing_foreign_keys(database, table_name, &primary_key.columns) {
        return Err(ModelError::ObjectInUse {
            kind: "primary key",
            name: name.to_string(),
            used_by,
        });
    }
    database.require_table_mut(table_name)?.primary_key = None;
    Ok(())
}

fn drop_unique_constraint(
    database: &mut Database,
    table_name: &ObjectName,
    name: &str,
) -> Result<()> {
    let table = database.require_table(table_name)?;
    let unique = table
        .unique_constraint(name)
        .ok_or_else(|| ModelError::not_found("unique constraint", column_path(table_name, name)))?;
    let still_keyed = table
        .primary_key
        .as_ref()
        .is_some_and(|pk| pk.columns == unique.columns);
    if !still_keyed
        && let Some(used_by) = referencing_foreign_keys(database, table_name, &unique.columns)
    {
        return Err(ModelError::ObjectInUse {
            kind: "unique constraint",
            name: name.to_string(),
            used_by,
        });
    }
    database
        .require_table_mut(table_name)?
        .unique_constraints
        .retain(|uc| uc.name != name);
    Ok(())
}

fn add_foreign_key(database: &mut Database, op: &AddForeignKeyOperation) -> Result<()> {
    let foreign_key = &op.foreign_key;
    let principal = database.require_table(&foreign_key.principal_table)?;
    if !principal.has_key_on(&foreign_key.principal_columns) {
        return Err(ModelError::not_found(
            "principal key",
            format!(
                "{}({})",
                foreign_key.principal_table,
                foreign_key.principal_columns.join(", ")
            ),
        ));
    }
    database
        .require_table_mut(&op.table)?
        .add_foreign_key(foreign_key.clone())
}
