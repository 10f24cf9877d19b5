use super::Operation;
use crate::catalog::{Annotations, DbObjectId, Index, ObjectName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexOperation {
    pub table: ObjectName,
    pub index: Index,
}

impl CreateIndexOperation {
    pub fn new(table: ObjectName, index: Index) -> Self {
        Self { table, index }
    }
}

impl Operation for CreateIndexOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Index {
            table: self.table.clone(),
            name: self.index.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.index.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropIndexOperation {
    pub table: ObjectName,
    pub name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropIndexOperation {
    pub fn new(table: ObjectName, name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropIndexOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Index {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameIndexOperation {
    pub table: ObjectName,
    pub name: String,
    pub new_name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl RenameIndexOperation {
    pub fn new(table: ObjectName, name: &str, new_name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            new_name: new_name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for RenameIndexOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Index {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
