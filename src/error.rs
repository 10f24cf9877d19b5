use thiserror::Error;

/// Errors raised while building, diffing or replaying models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("malformed schema-qualified name '{0}'")]
    MalformedName(String),

    #[error("entity type '{0}' is not defined")]
    UnknownEntity(String),

    #[error("property '{property}' is not defined on entity type '{entity}'")]
    UnknownProperty { entity: String, property: String },

    #[error(
        "foreign key '{name}' has {dependent} dependent column(s) but {principal} principal column(s)"
    )]
    ForeignKeyColumnMismatch {
        name: String,
        dependent: usize,
        principal: usize,
    },

    #[error("property '{property}' of entity type '{entity}' has both a default value and a default SQL expression")]
    ConflictingDefaults { entity: String, property: String },

    #[error("entity type '{0}' has an inheritance cycle")]
    InheritanceCycle(String),

    #[error("entity type '{0}' has no primary key")]
    MissingPrimaryKey(String),

    #[error("{kind} '{name}' already exists")]
    DuplicateObject { kind: &'static str, name: String },

    #[error("{kind} '{name}' does not exist")]
    ObjectNotFound { kind: &'static str, name: String },

    #[error("{kind} '{name}' is still used by {used_by}")]
    ObjectInUse {
        kind: &'static str,
        name: String,
        used_by: String,
    },

    #[error("unsupported type '{clr_type}' for column '{column}' of table '{table}'")]
    UnsupportedType {
        table: String,
        column: String,
        clr_type: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ModelError {
    pub fn not_found(kind: &'static str, name: impl ToString) -> Self {
        ModelError::ObjectNotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn duplicate(kind: &'static str, name: impl ToString) -> Self {
        ModelError::DuplicateObject {
            kind,
            name: name.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModelError {
    fn from(err: serde_yaml::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
