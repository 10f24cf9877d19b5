use super::Operation;
use crate::catalog::{
    Annotations, DbObjectId, ForeignKey, ObjectName, PrimaryKey, UniqueConstraint,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPrimaryKeyOperation {
    pub table: ObjectName,
    pub primary_key: PrimaryKey,
}

impl AddPrimaryKeyOperation {
    pub fn new(table: ObjectName, primary_key: PrimaryKey) -> Self {
        Self { table, primary_key }
    }
}

impl Operation for AddPrimaryKeyOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.primary_key.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.primary_key.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropPrimaryKeyOperation {
    pub table: ObjectName,
    pub name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropPrimaryKeyOperation {
    pub fn new(table: ObjectName, name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropPrimaryKeyOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddUniqueConstraintOperation {
    pub table: ObjectName,
    pub unique_constraint: UniqueConstraint,
}

impl AddUniqueConstraintOperation {
    pub fn new(table: ObjectName, unique_constraint: UniqueConstraint) -> Self {
        Self {
            table,
            unique_constraint,
        }
    }
}

impl Operation for AddUniqueConstraintOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.unique_constraint.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.unique_constraint.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropUniqueConstraintOperation {
    pub table: ObjectName,
    pub name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropUniqueConstraintOperation {
    pub fn new(table: ObjectName, name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropUniqueConstraintOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddForeignKeyOperation {
    pub table: ObjectName,
    pub foreign_key: ForeignKey,
}

impl AddForeignKeyOperation {
    pub fn new(table: ObjectName, foreign_key: ForeignKey) -> Self {
        Self { table, foreign_key }
    }
}

impl Operation for AddForeignKeyOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.foreign_key.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.foreign_key.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropForeignKeyOperation {
    pub table: ObjectName,
    pub name: String,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropForeignKeyOperation {
    pub fn new(table: ObjectName, name: &str) -> Self {
        Self {
            table,
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropForeignKeyOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Constraint {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
