use super::Operation;
use crate::catalog::{Annotations, Column, DbObjectId, ObjectName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddColumnOperation {
    pub table: ObjectName,
    pub column: Column,
}

impl AddColumnOperation {
    pub fn new(table: ObjectName, column: Column) -> Self {
        Self { table, column }
    }
}

impl Operation for AddColumnOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Column {
            table: self.table.clone(),
            name: self.column.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.column.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropColumnOperation {
    pub table: ObjectName,
    pub name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropColumnOperation {
    pub fn new(table: ObjectName, name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropColumnOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Column {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn is_destructive(&self) -> bool {
        true
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Replaces a column definition. `column` is the complete new definition;
/// `old_column` is what it replaces, so that generators can tell which
/// facets changed and what has to be dropped first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterColumnOperation {
    pub table: ObjectName,
    pub column: Column,
    pub old_column: Column,
    #[serde(default)]
    pub is_destructive_change: bool,
}

impl AlterColumnOperation {
    pub fn new(table: ObjectName, old_column: Column, column: Column) -> Self {
        let is_destructive_change = old_column.is_destructive_change_to(&column);
        Self {
            table,
            column,
            old_column,
            is_destructive_change,
        }
    }
}

impl Operation for AlterColumnOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Column {
            table: self.table.clone(),
            name: self.column.name.clone(),
        }
    }

    fn is_destructive(&self) -> bool {
        self.is_destructive_change
    }

    fn annotations(&self) -> &Annotations {
        &self.column.annotations
    }

    fn old_annotations(&self) -> Option<&Annotations> {
        Some(&self.old_column.annotations)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameColumnOperation {
    pub table: ObjectName,
    pub name: String,
    pub new_name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl RenameColumnOperation {
    pub fn new(table: ObjectName, name: &str, new_name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            new_name: new_name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for RenameColumnOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Column {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
