use super::Operation;
use crate::catalog::{Annotations, DbObjectId, ObjectName};
use serde::{Deserialize, Serialize};

/// Raw SQL passed through to the script unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlOperation {
    pub sql: String,
    #[serde(default)]
    pub suppress_transaction: bool,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl SqlOperation {
    pub fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            suppress_transaction: false,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for SqlOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Script
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Copies rows between tables, column lists matched by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyDataOperation {
    pub source_table: ObjectName,
    pub source_columns: Vec<String>,
    pub target_table: ObjectName,
    pub target_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl CopyDataOperation {
    pub fn new(
        source_table: ObjectName,
        source_columns: Vec<String>,
        target_table: ObjectName,
        target_columns: Vec<String>,
    ) -> Self {
        Self {
            source_table,
            source_columns,
            target_table,
            target_columns,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for CopyDataOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Table {
            name: self.target_table.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
