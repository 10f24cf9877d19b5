//! Logical model: entity types, their properties, keys, relationships and
//! indexes, independent of how they are stored.
//!
//! Models are built either with the fluent API:
//!
//! ```
//! use modeldiff::model::{ClrType, Model};
//!
//! let mut model = Model::new();
//! model.entity("Blog", |e| {
//!     e.property("Id", ClrType::Int32);
//!     e.property("Title", ClrType::String).has_max_length(200);
//!     e.key(&["Id"]);
//! });
//! assert!(model.validate().is_ok());
//! ```
//!
//! or deserialized from YAML (see [`crate::schema_loader`]).

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod entity;
pub mod types;

pub use entity::{EntityType, ForeignKeyDecl, IndexDecl, KeyDecl, Property, SequenceDecl};
pub use types::{ClrType, DefaultValue, ValueGenerated};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,
    #[serde(default)]
    pub entity_types: Vec<EntityType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<SequenceDecl>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_schema(mut self, schema: &str) -> Self {
        self.default_schema = Some(schema.to_string());
        self
    }

    /// Adds (or reopens) an entity type and lets `configure` describe it.
    pub fn entity(&mut self, name: &str, configure: impl FnOnce(&mut EntityType)) -> &mut Self {
        let position = match self.entity_types.iter().position(|e| e.name == name) {
            Some(position) => position,
            None => {
                self.entity_types.push(EntityType::new(name));
                self.entity_types.len() - 1
            }
        };
        configure(&mut self.entity_types[position]);
        self
    }

    pub fn sequence(&mut self, name: &str, schema: Option<&str>) -> &mut SequenceDecl {
        self.sequences.push(SequenceDecl::new(name, schema));
        let last = self.sequences.len() - 1;
        &mut self.sequences[last]
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.iter().find(|e| e.name == name)
    }

    pub fn require_entity(&self, name: &str) -> Result<&EntityType> {
        self.entity_type(name)
            .ok_or_else(|| ModelError::UnknownEntity(name.to_string()))
    }

    /// The entity followed by its ancestors, nearest first.
    pub fn lineage<'a>(&'a self, entity: &'a EntityType) -> Result<Vec<&'a EntityType>> {
        let mut lineage = vec![entity];
        let mut seen = HashSet::from([entity.name.as_str()]);
        let mut current = entity;
        while let Some(base) = &current.base_type {
            let base = self.require_entity(base)?;
            if !seen.insert(base.name.as_str()) {
                return Err(ModelError::InheritanceCycle(entity.name.clone()));
            }
            lineage.push(base);
            current = base;
        }
        Ok(lineage)
    }

    /// Properties visible on an entity: inherited ones first, then its own.
    pub fn all_properties<'a>(&'a self, entity: &'a EntityType) -> Result<Vec<&'a Property>> {
        let mut properties = Vec::new();
        for ancestor in self.lineage(entity)?.into_iter().rev() {
            properties.extend(ancestor.properties.iter());
        }
        Ok(properties)
    }

    pub fn find_property<'a>(
        &'a self,
        entity: &'a EntityType,
        name: &str,
    ) -> Result<&'a Property> {
        self.all_properties(entity)?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ModelError::UnknownProperty {
                entity: entity.name.clone(),
                property: name.to_string(),
            })
    }

    /// Primary key declared on the entity or inherited from an ancestor.
    pub fn primary_key<'a>(&'a self, entity: &'a EntityType) -> Result<Option<&'a KeyDecl>> {
        Ok(self
            .lineage(entity)?
            .into_iter()
            .find_map(|e| e.key.as_ref()))
    }

    /// Table name and schema an entity maps to. Derived types share the
    /// table of their root unless they name their own.
    pub fn table_of(&self, entity: &EntityType) -> Result<(Option<String>, String)> {
        let lineage = self.lineage(entity)?;
        let root = lineage.last().copied().unwrap_or(entity);
        let table = entity
            .table
            .clone()
            .or_else(|| lineage.iter().find_map(|e| e.table.clone()))
            .unwrap_or_else(|| root.name.clone());
        let schema = entity
            .schema
            .clone()
            .or_else(|| lineage.iter().find_map(|e| e.schema.clone()))
            .or_else(|| self.default_schema.clone());
        Ok((schema, table))
    }

    /// Checks names and cross references. Called by the database builder
    /// before projecting.
    pub fn validate(&self) -> Result<()> {
        let mut entity_names = HashSet::new();
        for entity in &self.entity_types {
            if entity.name.is_empty() {
                return Err(ModelError::EmptyName {
                    kind: "entity type",
                });
            }
            if !entity_names.insert(entity.name.as_str()) {
                return Err(ModelError::duplicate("entity type", &entity.name));
            }
        }

        for entity in &self.entity_types {
            self.validate_entity(entity)?;
        }

        for sequence in &self.sequences {
            if sequence.name.is_empty() {
                return Err(ModelError::EmptyName { kind: "sequence" });
            }
        }
        Ok(())
    }

    fn validate_entity(&self, entity: &EntityType) -> Result<()> {
        self.lineage(entity)?;

        let mut property_names = HashSet::new();
        for property in &entity.properties {
            if property.name.is_empty() {
                return Err(ModelError::EmptyName { kind: "property" });
            }
            if !property_names.insert(property.name.as_str()) {
                return Err(ModelError::duplicate(
                    "property",
                    format!("{}.{}", entity.name, property.name),
                ));
            }
            if property.column.as_deref() == Some("") {
                return Err(ModelError::EmptyName { kind: "column" });
            }
            if property.default_value.is_some() && property.default_sql.is_some() {
                return Err(ModelError::ConflictingDefaults {
                    entity: entity.name.clone(),
                    property: property.name.clone(),
                });
            }
        }

        let check = |properties: &[String]| -> Result<()> {
            for name in properties {
                self.find_property(entity, name)?;
            }
            Ok(())
        };

        if let Some(key) = &entity.key {
            check(&key.properties)?;
        }
        for key in &entity.alternate_keys {
            check(&key.properties)?;
        }
        for index in &entity.indexes {
            check(&index.properties)?;
        }
        for fk in &entity.foreign_keys {
            check(&fk.properties)?;
            let principal = self.require_entity(&fk.principal)?;
            let principal_properties = match &fk.principal_properties {
                Some(properties) => properties.clone(),
                None => self
                    .primary_key(principal)?
                    .map(|k| k.properties.clone())
                    .ok_or_else(|| ModelError::MissingPrimaryKey(principal.name.clone()))?,
            };
            for name in &principal_properties {
                self.find_property(principal, name)?;
            }
            if fk.properties.is_empty() || fk.properties.len() != principal_properties.len() {
                return Err(ModelError::ForeignKeyColumnMismatch {
                    name: fk
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("{} -> {}", entity.name, principal.name)),
                    dependent: fk.properties.len(),
                    principal: principal_properties.len(),
                });
            }
        }
        Ok(())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Appends the entity types and sequences of `other`.
    pub fn extend(&mut self, other: Model) {
        if self.default_schema.is_none() {
            self.default_schema = other.default_schema;
        }
        self.entity_types.extend(other.entity_types);
        self.sequences.extend(other.sequences);
    }
}
