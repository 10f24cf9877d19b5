use super::annotations::Annotations;
use super::id::{DbObjectId, ObjectName};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEQUENCE_TYPE: &str = "bigint";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: ObjectName,
    #[serde(default = "default_type_name")]
    pub type_name: String,
    #[serde(default = "one")]
    pub start_value: i64,
    #[serde(default = "one")]
    pub increment_by: i64,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

fn default_type_name() -> String {
    DEFAULT_SEQUENCE_TYPE.to_string()
}

fn one() -> i64 {
    1
}

impl Sequence {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            type_name: default_type_name(),
            start_value: 1,
            increment_by: 1,
            annotations: Annotations::new(),
        }
    }

    pub fn with_type_name(mut self, type_name: &str) -> Self {
        self.type_name = type_name.to_string();
        self
    }

    pub fn with_start_value(mut self, start_value: i64) -> Self {
        self.start_value = start_value;
        self
    }

    pub fn with_increment_by(mut self, increment_by: i64) -> Self {
        self.increment_by = increment_by;
        self
    }

    pub fn id(&self) -> DbObjectId {
        DbObjectId::Sequence {
            name: self.name.clone(),
        }
    }
}
