//! Migration operations
//!
//! One closed enum, one payload struct per kind. Operations refer to
//! tables, columns and constraints by name only, never by identity, since
//! source and target models are unrelated object graphs.

use crate::catalog::{Annotations, DbObjectId, ObjectName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use column::*;
pub use constraint::*;
pub use index::*;
pub use sequence::*;
pub use sql::*;
pub use table::*;

pub mod column;
pub mod constraint;
pub mod index;
pub mod sequence;
pub mod sql;
pub mod table;

/// Facts every operation payload exposes.
pub trait Operation {
    fn db_object_id(&self) -> DbObjectId;

    fn is_destructive(&self) -> bool {
        false
    }

    fn annotations(&self) -> &Annotations;

    /// Pre-change annotations; only alter operations carry them.
    fn old_annotations(&self) -> Option<&Annotations> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MigrationOperation {
    CreateTable(CreateTableOperation),
    DropTable(DropTableOperation),
    RenameTable(RenameTableOperation),
    MoveTable(MoveTableOperation),
    AddColumn(AddColumnOperation),
    DropColumn(DropColumnOperation),
    AlterColumn(AlterColumnOperation),
    RenameColumn(RenameColumnOperation),
    AddPrimaryKey(AddPrimaryKeyOperation),
    DropPrimaryKey(DropPrimaryKeyOperation),
    AddUniqueConstraint(AddUniqueConstraintOperation),
    DropUniqueConstraint(DropUniqueConstraintOperation),
    AddForeignKey(AddForeignKeyOperation),
    DropForeignKey(DropForeignKeyOperation),
    CreateIndex(CreateIndexOperation),
    DropIndex(DropIndexOperation),
    RenameIndex(RenameIndexOperation),
    CreateSequence(CreateSequenceOperation),
    AlterSequence(AlterSequenceOperation),
    DropSequence(DropSequenceOperation),
    RenameSequence(RenameSequenceOperation),
    RestartSequence(RestartSequenceOperation),
    Sql(SqlOperation),
    CopyData(CopyDataOperation),
}

macro_rules! dispatch {
    ($value:expr, $op:ident => $body:expr) => {
        match $value {
            MigrationOperation::CreateTable($op) => $body,
            MigrationOperation::DropTable($op) => $body,
            MigrationOperation::RenameTable($op) => $body,
            MigrationOperation::MoveTable($op) => $body,
            MigrationOperation::AddColumn($op) => $body,
            MigrationOperation::DropColumn($op) => $body,
            MigrationOperation::AlterColumn($op) => $body,
            MigrationOperation::RenameColumn($op) => $body,
            MigrationOperation::AddPrimaryKey($op) => $body,
            MigrationOperation::DropPrimaryKey($op) => $body,
            MigrationOperation::AddUniqueConstraint($op) => $body,
            MigrationOperation::DropUniqueConstraint($op) => $body,
            MigrationOperation::AddForeignKey($op) => $body,
            MigrationOperation::DropForeignKey($op) => $body,
            MigrationOperation::CreateIndex($op) => $body,
            MigrationOperation::DropIndex($op) => $body,
            MigrationOperation::RenameIndex($op) => $body,
            MigrationOperation::CreateSequence($op) => $body,
            MigrationOperation::AlterSequence($op) => $body,
            MigrationOperation::DropSequence($op) => $body,
            MigrationOperation::RenameSequence($op) => $body,
            MigrationOperation::RestartSequence($op) => $body,
            MigrationOperation::Sql($op) => $body,
            MigrationOperation::CopyData($op) => $body,
        }
    };
}

impl Operation for MigrationOperation {
    fn db_object_id(&self) -> DbObjectId {
        dispatch!(self, op => op.db_object_id())
    }

    fn is_destructive(&self) -> bool {
        dispatch!(self, op => op.is_destructive())
    }

    fn annotations(&self) -> &Annotations {
        dispatch!(self, op => op.annotations())
    }

    fn old_annotations(&self) -> Option<&Annotations> {
        dispatch!(self, op => op.old_annotations())
    }
}

impl MigrationOperation {
    /// Operation kind without the payload, e.g. `"RenameColumn"`.
    pub fn kind(&self) -> &'static str {
        match self {
            MigrationOperation::CreateTable(_) => "CreateTable",
            MigrationOperation::DropTable(_) => "DropTable",
            MigrationOperation::RenameTable(_) => "RenameTable",
            MigrationOperation::MoveTable(_) => "MoveTable",
            MigrationOperation::AddColumn(_) => "AddColumn",
            MigrationOperation::DropColumn(_) => "DropColumn",
            MigrationOperation::AlterColumn(_) => "AlterColumn",
            MigrationOperation::RenameColumn(_) => "RenameColumn",
            MigrationOperation::AddPrimaryKey(_) => "AddPrimaryKey",
            MigrationOperation::DropPrimaryKey(_) => "DropPrimaryKey",
            MigrationOperation::AddUniqueConstraint(_) => "AddUniqueConstraint",
            MigrationOperation::DropUniqueConstraint(_) => "DropUniqueConstraint",
            MigrationOperation::AddForeignKey(_) => "AddForeignKey",
            MigrationOperation::DropForeignKey(_) => "DropForeignKey",
            MigrationOperation::CreateIndex(_) => "CreateIndex",
            MigrationOperation::DropIndex(_) => "DropIndex",
            MigrationOperation::RenameIndex(_) => "RenameIndex",
            MigrationOperation::CreateSequence(_) => "CreateSequence",
            MigrationOperation::AlterSequence(_) => "AlterSequence",
            MigrationOperation::DropSequence(_) => "DropSequence",
            MigrationOperation::RenameSequence(_) => "RenameSequence",
            MigrationOperation::RestartSequence(_) => "RestartSequence",
            MigrationOperation::Sql(_) => "Sql",
            MigrationOperation::CopyData(_) => "CopyData",
        }
    }

    /// The table an operation works on, if any.
    pub fn table(&self) -> Option<&ObjectName> {
        match self {
            MigrationOperation::CreateTable(op) => Some(&op.name),
            MigrationOperation::DropTable(op) => Some(&op.name),
            MigrationOperation::RenameTable(op) => Some(&op.name),
            MigrationOperation::MoveTable(op) => Some(&op.name),
            MigrationOperation::AddColumn(op) => Some(&op.table),
            MigrationOperation::DropColumn(op) => Some(&op.table),
            MigrationOperation::AlterColumn(op) => Some(&op.table),
            MigrationOperation::RenameColumn(op) => Some(&op.table),
            MigrationOperation::AddPrimaryKey(op) => Some(&op.table),
            MigrationOperation::DropPrimaryKey(op) => Some(&op.table),
            MigrationOperation::AddUniqueConstraint(op) => Some(&op.table),
            MigrationOperation::DropUniqueConstraint(op) => Some(&op.table),
            MigrationOperation::AddForeignKey(op) => Some(&op.table),
            MigrationOperation::DropForeignKey(op) => Some(&op.table),
            MigrationOperation::CreateIndex(op) => Some(&op.table),
            MigrationOperation::DropIndex(op) => Some(&op.table),
            MigrationOperation::RenameIndex(op) => Some(&op.table),
            MigrationOperation::CopyData(op) => Some(&op.target_table),
            MigrationOperation::CreateSequence(_)
            | MigrationOperation::AlterSequence(_)
            | MigrationOperation::DropSequence(_)
            | MigrationOperation::RenameSequence(_)
            | MigrationOperation::RestartSequence(_)
            | MigrationOperation::Sql(_) => None,
        }
    }

    /// The bag [`Operation::annotations`] reads, for payloads that keep
    /// their annotations on the object they add.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            MigrationOperation::CreateTable(op) => &mut op.annotations,
            MigrationOperation::DropTable(op) => &mut op.annotations,
            MigrationOperation::RenameTable(op) => &mut op.annotations,
            MigrationOperation::MoveTable(op) => &mut op.annotations,
            MigrationOperation::AddColumn(op) => &mut op.column.annotations,
            MigrationOperation::DropColumn(op) => &mut op.annotations,
            MigrationOperation::AlterColumn(op) => &mut op.column.annotations,
            MigrationOperation::RenameColumn(op) => &mut op.annotations,
            MigrationOperation::AddPrimaryKey(op) => &mut op.primary_key.annotations,
            MigrationOperation::DropPrimaryKey(op) => &mut op.annotations,
            MigrationOperation::AddUniqueConstraint(op) => &mut op.unique_constraint.annotations,
            MigrationOperation::DropUniqueConstraint(op) => &mut op.annotations,
            MigrationOperation::AddForeignKey(op) => &mut op.foreign_key.annotations,
            MigrationOperation::DropForeignKey(op) => &mut op.annotations,
            MigrationOperation::CreateIndex(op) => &mut op.index.annotations,
            MigrationOperation::DropIndex(op) => &mut op.annotations,
            MigrationOperation::RenameIndex(op) => &mut op.annotations,
            MigrationOperation::CreateSequence(op) => &mut op.sequence.annotations,
            MigrationOperation::AlterSequence(op) => &mut op.annotations,
            MigrationOperation::DropSequence(op) => &mut op.annotations,
            MigrationOperation::RenameSequence(op) => &mut op.annotations,
            MigrationOperation::RestartSequence(op) => &mut op.annotations,
            MigrationOperation::Sql(op) => &mut op.annotations,
            MigrationOperation::CopyData(op) => &mut op.annotations,
        }
    }

    pub fn annotation(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.annotations_mut().set(name, value);
        self
    }

    /// Sets a pre-change annotation on alter operations; other kinds have
    /// none and ignore it.
    pub fn old_annotation(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        match self {
            MigrationOperation::AlterSequence(op) => op.old_annotations.set(name, value),
            MigrationOperation::AlterColumn(op) => op.old_column.annotations.set(name, value),
            _ => {}
        }
        self
    }

    pub fn is_create(&self) -> bool {
        matches!(
            self,
            MigrationOperation::CreateTable(_)
                | MigrationOperation::AddColumn(_)
                | MigrationOperation::AddPrimaryKey(_)
                | MigrationOperation::AddUniqueConstraint(_)
                | MigrationOperation::AddForeignKey(_)
                | MigrationOperation::CreateIndex(_)
                | MigrationOperation::CreateSequence(_)
        )
    }

    pub fn is_drop(&self) -> bool {
        matches!(
            self,
            MigrationOperation::DropTable(_)
                | MigrationOperation::DropColumn(_)
                | MigrationOperation::DropPrimaryKey(_)
                | MigrationOperation::DropUniqueConstraint(_)
                | MigrationOperation::DropForeignKey(_)
                | MigrationOperation::DropIndex(_)
                | MigrationOperation::DropSequence(_)
        )
    }
}

impl fmt::Display for MigrationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOperation::CreateTable(op) => write!(f, "CreateTable {}", op.name),
            MigrationOperation::DropTable(op) => write!(f, "DropTable {}", op.name),
            MigrationOperation::RenameTable(op) => {
                write!(f, "RenameTable {} -> {}", op.name, op.new_name)
            }
            MigrationOperation::MoveTable(op) => write!(
                f,
                "MoveTable {} -> {}",
                op.name,
                op.new_schema.as_deref().unwrap_or("<default>")
            ),
            MigrationOperation::AddColumn(op) => {
                write!(f, "AddColumn {}.{}", op.table, op.column.name)
            }
            MigrationOperation::DropColumn(op) => write!(f, "DropColumn {}.{}", op.table, op.name),
            MigrationOperation::AlterColumn(op) => {
                write!(f, "AlterColumn {}.{}", op.table, op.column.name)
            }
            MigrationOperation::RenameColumn(op) => write!(
                f,
                "RenameColumn {}.{} -> {}",
                op.table, op.name, op.new_name
            ),
            MigrationOperation::AddPrimaryKey(op) => {
                write!(f, "AddPrimaryKey {} on {}", op.primary_key.name, op.table)
            }
            MigrationOperation::DropPrimaryKey(op) => {
                write!(f, "DropPrimaryKey {} on {}", op.name, op.table)
            }
            MigrationOperation::AddUniqueConstraint(op) => write!(
                f,
                "AddUniqueConstraint {} on {}",
                op.unique_constraint.name, op.table
            ),
            MigrationOperation::DropUniqueConstraint(op) => {
                write!(f, "DropUniqueConstraint {} on {}", op.name, op.table)
            }
            MigrationOperation::AddForeignKey(op) => write!(
                f,
                "AddForeignKey {} on {} -> {}",
                op.foreign_key.name, op.table, op.foreign_key.principal_table
            ),
            MigrationOperation::DropForeignKey(op) => {
                write!(f, "DropForeignKey {} on {}", op.name, op.table)
            }
            MigrationOperation::CreateIndex(op) => {
                write!(f, "CreateIndex {} on {}", op.index.name, op.table)
            }
            MigrationOperation::DropIndex(op) => write!(f, "DropIndex {} on {}", op.name, op.table),
            MigrationOperation::RenameIndex(op) => write!(
                f,
                "RenameIndex {} -> {} on {}",
                op.name, op.new_name, op.table
            ),
            MigrationOperation::CreateSequence(op) => {
                write!(f, "CreateSequence {}", op.sequence.name)
            }
            MigrationOperation::AlterSequence(op) => write!(f, "AlterSequence {}", op.name),
            MigrationOperation::DropSequence(op) => write!(f, "DropSequence {}", op.name),
            MigrationOperation::RenameSequence(op) => {
                write!(f, "RenameSequence {} -> {}", op.name, op.new_name)
            }
            MigrationOperation::RestartSequence(op) => {
                write!(f, "RestartSequence {} at {}", op.name, op.start_value)
            }
            MigrationOperation::Sql(_) => write!(f, "Sql"),
            MigrationOperation::CopyData(op) => {
                write!(f, "CopyData {} -> {}", op.source_table, op.target_table)
            }
        }
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident($payload:ty)),* $(,)?) => {
        $(
            impl From<$payload> for MigrationOperation {
                fn from(op: $payload) -> Self {
                    MigrationOperation::$variant(op)
                }
            }
        )*
    };
}

impl_from_payload!(
    CreateTable(CreateTableOperation),
    DropTable(DropTableOperation),
    RenameTable(RenameTableOperation),
    MoveTable(MoveTableOperation),
    AddColumn(AddColumnOperation),
    DropColumn(DropColumnOperation),
    AlterColumn(AlterColumnOperation),
    RenameColumn(RenameColumnOperation),
    AddPrimaryKey(AddPrimaryKeyOperation),
    DropPrimaryKey(DropPrimaryKeyOperation),
    AddUniqueConstraint(AddUniqueConstraintOperation),
    DropUniqueConstraint(DropUniqueConstraintOperation),
    AddForeignKey(AddForeignKeyOperation),
    DropForeignKey(DropForeignKeyOperation),
    CreateIndex(CreateIndexOperation),
    DropIndex(DropIndexOperation),
    RenameIndex(RenameIndexOperation),
    CreateSequence(CreateSequenceOperation),
    AlterSequence(AlterSequenceOperation),
    DropSequence(DropSequenceOperation),
    RenameSequence(RenameSequenceOperation),
    RestartSequence(RestartSequenceOperation),
    Sql(SqlOperation),
    CopyData(CopyDataOperation),
);
