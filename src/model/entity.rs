use super::types::{ClrType, DefaultValue, ValueGenerated};
use crate::catalog::{Annotations, ReferentialAction};
use serde::{Deserialize, Serialize};

fn names(properties: &[&str]) -> Vec<String> {
    properties.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub clr_type: ClrType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
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
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_sql: Option<String>,
    #[serde(default, skip_serializing_if = "ValueGenerated::is_never")]
    pub value_generated: ValueGenerated,
    #[serde(default)]
    pub concurrency_token: bool,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl Property {
    pub fn new(name: &str, clr_type: ClrType) -> Self {
        Self {
            name: name.to_string(),
            clr_type,
            nullable: None,
            column: None,
            store_type: None,
            max_length: None,
            precision: None,
            scale: None,
            fixed_length: None,
            unicode: None,
            default_value: None,
            default_sql: None,
            computed_sql: None,
            value_generated: ValueGenerated::Never,
            concurrency_token: false,
            annotations: Annotations::new(),
        }
    }

    /// Column name, defaulting to the property name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    pub fn has_column_name(&mut self, column: &str) -> &mut Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn is_nullable(&mut self, nullable: bool) -> &mut Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn has_store_type(&mut self, store_type: &str) -> &mut Self {
        self.store_type = Some(store_type.to_string());
        self
    }

    pub fn has_max_length(&mut self, max_length: u32) -> &mut Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn has_precision(&mut self, precision: u8, scale: u8) -> &mut Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn is_fixed_length(&mut self, fixed_length: bool) -> &mut Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    pub fn is_unicode(&mut self, unicode: bool) -> &mut Self {
        self.unicode = Some(unicode);
        self
    }

    /// Clears any default SQL.
    pub fn has_default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default_value = Some(value.into());
        self.default_sql = None;
        self
    }

    /// Clears any literal default.
    pub fn has_default_sql(&mut self, sql: &str) -> &mut Self {
        self.default_sql = Some(sql.to_string());
        self.default_value = None;
        self
    }

    pub fn has_computed_sql(&mut self, sql: &str) -> &mut Self {
        self.computed_sql = Some(sql.to_string());
        self
    }

    pub fn generated(&mut self, value_generated: ValueGenerated) -> &mut Self {
        self.value_generated = value_generated;
        self
    }

    pub fn is_concurrency_token(&mut self, concurrency_token: bool) -> &mut Self {
        self.concurrency_token = concurrency_token;
        self
    }

    pub fn annotation(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.annotations.set(name, value);
        self
    }
}

/// Primary or alternate key declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDecl {
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl KeyDecl {
    pub fn new(properties: &[&str]) -> Self {
        Self {
            properties: names(properties),
            name: None,
            annotations: Annotations::new(),
        }
    }

    pub fn has_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn is_clustered(&mut self, clustered: bool) -> &mut Self {
        self.annotations.set_clustered(clustered);
        self
    }
}

/// Relationship from this entity (dependent) to a principal entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDecl {
    pub properties: Vec<String>,
    pub principal: String,
    /// Defaults to the principal's primary key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "ReferentialAction::is_no_action")]
    pub on_delete: ReferentialAction,
    #[serde(default, skip_serializing_if = "ReferentialAction::is_no_action")]
    pub on_update: ReferentialAction,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl ForeignKeyDecl {
    pub fn new(principal: &str, properties: &[&str]) -> Self {
        Self {
            properties: names(properties),
            principal: principal.to_string(),
            principal_properties: None,
            name: None,
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
            annotations: Annotations::new(),
        }
    }

    pub fn has_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn has_principal_key(&mut self, properties: &[&str]) -> &mut Self {
        self.principal_properties = Some(names(properties));
        self
    }

    pub fn on_delete(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_update = action;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDecl {
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl IndexDecl {
    pub fn new(properties: &[&str]) -> Self {
        Self {
            properties: names(properties),
            name: None,
            unique: false,
            annotations: Annotations::new(),
        }
    }

    pub fn has_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn is_unique(&mut self, unique: bool) -> &mut Self {
        self.unique = unique;
        self
    }

    pub fn is_clustered(&mut self, clustered: bool) -> &mut Self {
        self.annotations.set_clustered(clustered);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_keys: Vec<KeyDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDecl>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl EntityType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base_type: None,
            table: None,
            schema: None,
            properties: Vec::new(),
            key: None,
            alternate_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Adds the property, or retypes the existing one of that name.
    pub fn property(&mut self, name: &str, clr_type: ClrType) -> &mut Property {
        match self.properties.iter().position(|p| p.name == name) {
            Some(position) => {
                let property = &mut self.properties[position];
                property.clr_type = clr_type;
                property
            }
            None => {
                self.properties.push(Property::new(name, clr_type));
                let last = self.properties.len() - 1;
                &mut self.properties[last]
            }
        }
    }

    pub fn to_table(&mut self, table: &str, schema: Option<&str>) -> &mut Self {
        self.table = Some(table.to_string());
        self.schema = schema.map(str::to_string);
        self
    }

    pub fn derives_from(&mut self, base_type: &str) -> &mut Self {
        self.base_type = Some(base_type.to_string());
        self
    }

    pub fn key(&mut self, properties: &[&str]) -> &mut KeyDecl {
        self.key.insert(KeyDecl::new(properties))
    }

    pub fn alternate_key(&mut self, properties: &[&str]) -> &mut KeyDecl {
        self.alternate_keys.push(KeyDecl::new(properties));
        let last = self.alternate_keys.len() - 1;
        &mut self.alternate_keys[last]
    }

    pub fn foreign_key(&mut self, principal: &str, properties: &[&str]) -> &mut ForeignKeyDecl {
        self.foreign_keys
            .push(ForeignKeyDecl::new(principal, properties));
        let last = self.foreign_keys.len() - 1;
        &mut self.foreign_keys[last]
    }

    pub fn index(&mut self, properties: &[&str]) -> &mut IndexDecl {
        self.indexes.push(IndexDecl::new(properties));
        let last = self.indexes.len() - 1;
        &mut self.indexes[last]
    }

    pub fn annotation(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.annotations.set(name, value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment_by: Option<i64>,
}

impl SequenceDecl {
    pub fn new(name: &str, schema: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            schema: schema.map(str::to_string),
            type_name: None,
            start_value: None,
            increment_by: None,
        }
    }

    pub fn has_type(&mut self, type_name: &str) -> &mut Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn starts_at(&mut self, start_value: i64) -> &mut Self {
        self.start_value = Some(start_value);
        self
    }

    pub fn increments_by(&mut self, increment_by: i64) -> &mut Self {
        self.increment_by = Some(increment_by);
        self
    }
}
