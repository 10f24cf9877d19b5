use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical (language-level) type of a property.
///
/// Unknown names are kept as `Custom` so that a model can mention a type
/// that only some dialects (or an explicit store type) can map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClrType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Char,
    String,
    Bytes,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
    Custom(String),
}

impl ClrType {
    /// Value types are not nullable unless declared so.
    pub fn is_value_type(&self) -> bool {
        !matches!(self, ClrType::String | ClrType::Bytes | ClrType::Custom(_))
    }

    fn integer_rank(&self) -> Option<u8> {
        match self {
            ClrType::Byte => Some(1),
            ClrType::Int16 => Some(2),
            ClrType::Int32 => Some(3),
            ClrType::Int64 => Some(4),
            _ => None,
        }
    }

    /// Whether every value of `self` is representable in `target`.
    pub fn widens_to(&self, target: &ClrType) -> bool {
        if self == target {
            return true;
        }
        if let (Some(from), Some(to)) = (self.integer_rank(), target.integer_rank()) {
            return from <= to;
        }
        match (self, target) {
            (_, ClrType::String) => !matches!(self, ClrType::Bytes | ClrType::Custom(_)),
            (ClrType::Single, ClrType::Double) => true,
            (from, ClrType::Decimal) | (from, ClrType::Double) => {
                from.integer_rank().is_some_and(|rank| rank <= 3)
            }
            (ClrType::DateTime, ClrType::DateTimeOffset) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClrType::Bool => "bool",
            ClrType::Byte => "byte",
            ClrType::Int16 => "int16",
            ClrType::Int32 => "int32",
            ClrType::Int64 => "int64",
            ClrType::Single => "single",
            ClrType::Double => "double",
            ClrType::Decimal => "decimal",
            ClrType::Char => "char",
            ClrType::String => "string",
            ClrType::Bytes => "bytes",
            ClrType::DateTime => "date_time",
            ClrType::DateTimeOffset => "date_time_offset",
            ClrType::TimeSpan => "time_span",
            ClrType::Guid => "guid",
            ClrType::Custom(name) => name,
        }
    }
}

impl From<String> for ClrType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bool" => ClrType::Bool,
            "byte" => ClrType::Byte,
            "int16" => ClrType::Int16,
            "int32" => ClrType::Int32,
            "int64" => ClrType::Int64,
            "single" => ClrType::Single,
            "double" => ClrType::Double,
            "decimal" => ClrType::Decimal,
            "char" => ClrType::Char,
            "string" => ClrType::String,
            "bytes" => ClrType::Bytes,
            "date_time" => ClrType::DateTime,
            "date_time_offset" => ClrType::DateTimeOffset,
            "time_span" => ClrType::TimeSpan,
            "guid" => ClrType::Guid,
            _ => ClrType::Custom(value),
        }
    }
}

impl From<ClrType> for String {
    fn from(value: ClrType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ClrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the store generates a value for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueGenerated {
    #[default]
    Never,
    OnAdd,
    OnAddOrUpdate,
}

impl ValueGenerated {
    pub fn is_never(&self) -> bool {
        matches!(self, ValueGenerated::Never)
    }
}

/// Literal column default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(value) => write!(f, "{}", value),
            DefaultValue::Int(value) => write!(f, "{}", value),
            DefaultValue::Float(value) => write!(f, "{:?}", value),
            DefaultValue::String(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Int(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Int(value.into())
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::String(value.to_string())
    }
}
