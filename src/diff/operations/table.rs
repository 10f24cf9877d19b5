use super::Operation;
use crate::catalog::{
    Annotations, Column, DbObjectId, ObjectName, PrimaryKey, Table, UniqueConstraint,
};
use serde::{Deserialize, Serialize};

/// Creates a table with its columns, primary key and unique constraints.
/// Foreign keys and indexes follow as separate operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableOperation {
    pub name: ObjectName,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_constraints: Vec<UniqueConstraint>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl CreateTableOperation {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: None,
            unique_constraints: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// Everything of `table` except its foreign keys and indexes.
    pub fn from_table(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            columns: table.columns.clone(),
            primary_key: table.primary_key.clone(),
            unique_constraints: table.unique_constraints.clone(),
            annotations: table.annotations.clone(),
        }
    }

    pub fn column(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(&mut self, primary_key: PrimaryKey) -> &mut Self {
        self.primary_key = Some(primary_key);
        self
    }

    pub fn unique_constraint(&mut self, unique: UniqueConstraint) -> &mut Self {
        self.unique_constraints.push(unique);
        self
    }
}

impl Operation for CreateTableOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Table {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTableOperation {
    pub name: ObjectName,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropTableOperation {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropTableOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Table {
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

/// Renames a table within its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameTableOperation {
    pub name: ObjectName,
    pub new_name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl RenameTableOperation {
    pub fn new(name: ObjectName, new_name: &str) -> Self {
        Self {
            name,
            new_name: new_name.to_string(),
            annotations: Annotations::new(),
        }
    }

    pub fn renamed(&self) -> ObjectName {
        self.name.with_name(&self.new_name)
    }
}

impl Operation for RenameTableOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Table {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Moves a table to another schema, keeping its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTableOperation {
    pub name: ObjectName,
    pub new_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl MoveTableOperation {
    pub fn new(name: ObjectName, new_schema: Option<&str>) -> Self {
        Self {
            name,
            new_schema: new_schema.map(str::to_string),
            annotations: Annotations::new(),
        }
    }

    pub fn moved(&self) -> ObjectName {
        self.name.with_schema(self.new_schema.as_deref())
    }
}

impl Operation for MoveTableOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Table {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
