use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table or sequence name with an optional schema.
///
/// Names are case-sensitive. The display form is `schema.name`, or just
/// `name` when no schema is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Validating constructor. Rejects empty names and empty schemas.
    pub fn try_new(schema: Option<&str>, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(ModelError::EmptyName { kind: "object" });
        }
        if let Some(schema) = schema
            && schema.is_empty()
        {
            return Err(ModelError::EmptyName { kind: "schema" });
        }
        Ok(Self::new(schema, name))
    }

    /// Parses `name` or `schema.name`.
    pub fn parse(qualified: &str) -> Result<Self> {
        let parts: Vec<&str> = qualified.split('.').collect();
        match parts.as_slice() {
            [name] if !name.is_empty() => Ok(Self::new(None, name)),
            [schema, name] if !schema.is_empty() && !name.is_empty() => {
                Ok(Self::new(Some(schema), name))
            }
            _ => Err(ModelError::MalformedName(qualified.to_string())),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Same schema, different simple name.
    pub fn with_name(&self, name: &str) -> Self {
        Self {
            schema: self.schema.clone(),
            name: name.to_string(),
        }
    }

    /// Same simple name, different schema.
    pub fn with_schema(&self, schema: Option<&str>) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for ObjectName {
    /// Infallible conversion for literals; a string with more than one dot
    /// keeps everything after the first dot as the name.
    fn from(value: &str) -> Self {
        match value.split_once('.') {
            Some((schema, name)) => ObjectName::new(Some(schema), name),
            None => ObjectName::new(None, value),
        }
    }
}

/// Identifies the database object an operation touches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DbObjectId {
    Table { name: ObjectName },
    Column { table: ObjectName, name: String },
    Constraint { table: ObjectName, name: String },
    Index { table: ObjectName, name: String },
    Sequence { name: ObjectName },
    Script,
}

impl fmt::Display for DbObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbObjectId::Table { name } => write!(f, "table {}", name),
            DbObjectId::Column { table, name } => write!(f, "column {}.{}", table, name),
            DbObjectId::Constraint { table, name } => {
                write!(f, "constraint {} on {}", name, table)
            }
            DbObjectId::Index { table, name } => write!(f, "index {} on {}", name, table),
            DbObjectId::Sequence { name } => write!(f, "sequence {}", name),
            DbObjectId::Script => write!(f, "script"),
        }
    }
}
