use super::Operation;
use crate::catalog::{Annotations, DbObjectId, ObjectName, Sequence};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSequenceOperation {
    pub sequence: Sequence,
}

impl CreateSequenceOperation {
    pub fn new(sequence: Sequence) -> Self {
        Self { sequence }
    }
}

impl Operation for CreateSequenceOperation {
    fn db_object_id(&self) -> DbObjectId {
        self.sequence.id()
    }

    fn annotations(&self) -> &Annotations {
        &self.sequence.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterSequenceOperation {
    pub name: ObjectName,
    pub increment_by: i64,
    pub old_increment_by: i64,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub old_annotations: Annotations,
}

impl AlterSequenceOperation {
    pub fn new(name: ObjectName, old_increment_by: i64, increment_by: i64) -> Self {
        Self {
            name,
            increment_by,
            old_increment_by,
            annotations: Annotations::new(),
            old_annotations: Annotations::new(),
        }
    }
}

impl Operation for AlterSequenceOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Sequence {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn old_annotations(&self) -> Option<&Annotations> {
        Some(&self.old_annotations)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropSequenceOperation {
    pub name: ObjectName,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl DropSequenceOperation {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for DropSequenceOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Sequence {
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

/// Renames a sequence, possibly into another schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameSequenceOperation {
    pub name: ObjectName,
    pub new_name: ObjectName,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl RenameSequenceOperation {
    pub fn new(name: ObjectName, new_name: ObjectName) -> Self {
        Self {
            name,
            new_name,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for RenameSequenceOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Sequence {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartSequenceOperation {
    pub name: ObjectName,
    pub start_value: i64,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl RestartSequenceOperation {
    pub fn new(name: ObjectName, start_value: i64) -> Self {
        Self {
            name,
            start_value,
            annotations: Annotations::new(),
        }
    }
}

impl Operation for RestartSequenceOperation {
    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Sequence {
            name: self.name.clone(),
        }
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
