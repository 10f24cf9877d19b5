use super::annotations::Annotations;
use super::constraint::{ForeignKey, PrimaryKey, UniqueConstraint};
use super::id::{DbObjectId, ObjectName};
use super::index::Index;
use crate::error::{ModelError, Result};
use crate::model::{ClrType, DefaultValue, ValueGenerated};
use serde::{Deserialize, Serialize};

/// A column default: either a literal or a SQL expression, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Value(DefaultValue),
    Sql(String),
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub clr_type: ClrType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_length: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
    #[serde(default, skip_serializing_if = "ValueGenerated::is_never")]
    pub value_generated: ValueGenerated,
    #[serde(default, skip_serializing_if = "is_false")]
    pub concurrency_token: bool,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl Column {
    /// New column with the nullability implied by its type.
    pub fn new(name: &str, clr_type: ClrType) -> Self {
        Self {
            name: name.to_string(),
            nullable: !clr_type.is_value_type(),
            clr_type,
            max_length: None,
            precision: None,
            scale: None,
            fixed_length: None,
            unicode: None,
            default: None,
            computed_sql: None,
            store_type: None,
            value_generated: ValueGenerated::Never,
            concurrency_token: false,
            annotations: Annotations::new(),
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    pub fn with_computed_sql(mut self, sql: &str) -> Self {
        self.computed_sql = Some(sql.to_string());
        self
    }

    pub fn with_value_generated(mut self, value_generated: ValueGenerated) -> Self {
        self.value_generated = value_generated;
        self
    }

    pub fn with_concurrency_token(mut self, concurrency_token: bool) -> Self {
        self.concurrency_token = concurrency_token;
        self
    }

    pub fn with_store_type(mut self, store_type: &str) -> Self {
        self.store_type = Some(store_type.to_string());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.set_default_value(value);
        self
    }

    pub fn with_default_sql(mut self, sql: &str) -> Self {
        self.set_default_sql(sql);
        self
    }

    /// Replaces any default SQL.
    pub fn set_default_value(&mut self, value: impl Into<DefaultValue>) {
        self.default = Some(ColumnDefault::Value(value.into()));
    }

    /// Replaces any literal default.
    pub fn set_default_sql(&mut self, sql: &str) {
        self.default = Some(ColumnDefault::Sql(sql.to_string()));
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        match &self.default {
            Some(ColumnDefault::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn default_sql(&self) -> Option<&str> {
        match &self.default {
            Some(ColumnDefault::Sql(sql)) => Some(sql),
            _ => None,
        }
    }

    /// True when every facet except the name is equal.
    pub fn same_definition(&self, other: &Column) -> bool {
        let mut renamed = self.clone();
        renamed.name.clone_from(&other.name);
        renamed == *other
    }

    /// Whether moving from `self` to `new` may lose data or fail on existing rows.
    pub fn is_destructive_change_to(&self, new: &Column) -> bool {
        if self.nullable && !new.nullable {
            return true;
        }
        if !self.clr_type.widens_to(&new.clr_type) {
            return true;
        }
        if self.store_type != new.store_type {
            return true;
        }
        let shrinks = |old: Option<u32>, new: Option<u32>| match (old, new) {
            (None, Some(_)) => true,
            (Some(old), Some(new)) => new < old,
            _ => false,
        };
        shrinks(self.max_length, new.max_length)
            || shrinks(self.precision.map(u32::from), new.precision.map(u32::from))
            || shrinks(self.scale.map(u32::from), new.scale.map(u32::from))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: ObjectName,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_constraints: Vec<UniqueConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl Table {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: None,
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    pub fn id(&self) -> DbObjectId {
        DbObjectId::Table {
            name: self.name.clone(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn unique_constraint(&self, name: &str) -> Option<&UniqueConstraint> {
        self.unique_constraints.iter().find(|u| u.name == name)
    }

    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Primary key, unique constraints and foreign keys share one namespace.
    pub fn has_constraint(&self, name: &str) -> bool {
        self.primary_key.as_ref().is_some_and(|pk| pk.name == name)
            || self.unique_constraint(name).is_some()
            || self.foreign_key(name).is_some()
    }

    /// Is there a primary key or unique constraint over exactly these columns?
    pub fn has_key_on(&self, columns: &[String]) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns == columns)
            || self.unique_constraints.iter().any(|uc| uc.columns == columns)
    }

    fn check_columns_exist(&self, kind: &'static str, owner: &str, columns: &[String]) -> Result<()> {
        if let Some(missing) = columns.iter().find(|c| !self.has_column(c)) {
            return Err(ModelError::not_found(
                "column",
                format!("{}.{} (used by {} {})", self.name, missing, kind, owner),
            ));
        }
        Ok(())
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if column.name.is_empty() {
            return Err(ModelError::EmptyName { kind: "column" });
        }
        if self.has_column(&column.name) {
            return Err(ModelError::duplicate(
                "column",
                format!("{}.{}", self.name, column.name),
            ));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn set_primary_key(&mut self, primary_key: PrimaryKey) -> Result<()> {
        if self.primary_key.is_some() {
            return Err(ModelError::duplicate(
                "primary key",
                format!("{} on {}", primary_key.name, self.name),
            ));
        }
        if self.has_constraint(&primary_key.name) {
            return Err(ModelError::duplicate("constraint", &primary_key.name));
        }
        self.check_columns_exist("primary key", &primary_key.name, &primary_key.columns)?;
        self.primary_key = Some(primary_key);
        Ok(())
    }

    pub fn add_unique_constraint(&mut self, unique: UniqueConstraint) -> Result<()> {
        if self.has_constraint(&unique.name) {
            return Err(ModelError::duplicate("constraint", &unique.name));
        }
        self.check_columns_exist("unique constraint", &unique.name, &unique.columns)?;
        self.unique_constraints.push(unique);
        Ok(())
    }

    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> Result<()> {
        if self.has_constraint(&foreign_key.name) {
            return Err(ModelError::duplicate("constraint", &foreign_key.name));
        }
        self.check_columns_exist("foreign key", &foreign_key.name, &foreign_key.columns)?;
        self.foreign_keys.push(foreign_key);
        Ok(())
    }

    pub fn add_index(&mut self, index: Index) -> Result<()> {
        if self.index(&index.name).is_some() {
            return Err(ModelError::duplicate(
                "index",
                format!("{} on {}", index.name, self.name),
            ));
        }
        self.check_columns_exist("index", &index.name, &index.columns)?;
        self.indexes.push(index);
        Ok(())
    }

    /// Names of keys, foreign keys and indexes of this table that use `column`.
    pub fn users_of_column(&self, column: &str) -> Vec<String> {
        let uses = |columns: &[String]| columns.iter().any(|c| c == column);
        let mut users = Vec::new();
        if let Some(pk) = &self.primary_key
            && uses(&pk.columns)
        {
            users.push(pk.name.clone());
        }
        users.extend(
            self.unique_constraints
                .iter()
                .filter(|uc| uses(&uc.columns))
                .map(|uc| uc.name.clone()),
        );
        users.extend(
            self.foreign_keys
                .iter()
                .filter(|fk| uses(&fk.columns))
                .map(|fk| fk.name.clone()),
        );
        users.extend(
            self.indexes
                .iter()
                .filter(|ix| uses(&ix.columns))
                .map(|ix| ix.name.clone()),
        );
        users
    }

    /// Renames a column and every local reference to it.
    pub(crate) fn rename_column_references(&mut self, old: &str, new: &str) {
        let rename = |columns: &mut Vec<String>| {
            for column in columns.iter_mut().filter(|c| c.as_str() == old) {
                *column = new.to_string();
            }
        };
        if let Some(pk) = &mut self.primary_key {
            rename(&mut pk.columns);
        }
        for uc in &mut self.unique_constraints {
            rename(&mut uc.columns);
        }
        for fk in &mut self.foreign_keys {
            rename(&mut fk.columns);
            if fk.principal_table == self.name {
                rename(&mut fk.principal_columns);
            }
        }
        for index in &mut self.indexes {
            rename(&mut index.columns);
        }
    }
}
