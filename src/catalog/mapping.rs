//! Which logical entities and properties ended up in which tables and
//! columns. The differ uses this to pair tables and columns by logical
//! identity before falling back to physical names.

use super::Database;
use super::id::ObjectName;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    pub entity: String,
    pub property: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMapping {
    pub table: ObjectName,
    #[serde(default)]
    pub entity_types: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyMapping>,
}

impl TableMapping {
    pub fn new(table: ObjectName) -> Self {
        Self {
            table,
            entity_types: Vec::new(),
            properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub tables: Vec<TableMapping>,
}

impl Mapping {
    /// Mapping for a database with no logical model behind it: every column
    /// stands for a property of the same name.
    pub fn from_database(database: &Database) -> Self {
        let tables = database
            .tables
            .iter()
            .map(|table| TableMapping {
                table: table.name.clone(),
                entity_types: Vec::new(),
                properties: table
                    .columns
                    .iter()
                    .map(|column| PropertyMapping {
                        entity: String::new(),
                        property: column.name.clone(),
                        column: column.name.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { tables }
    }

    pub fn table(&self, name: &ObjectName) -> Option<&TableMapping> {
        self.tables.iter().find(|t| &t.table == name)
    }

    pub fn table_mut(&mut self, name: &ObjectName) -> Option<&mut TableMapping> {
        self.tables.iter_mut().find(|t| &t.table == name)
    }
}

/// A database together with the mapping it was projected with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub database: Database,
    #[serde(default)]
    pub mapping: Mapping,
}

impl Projection {
    pub fn from_database(database: Database) -> Self {
        let mapping = Mapping::from_database(&database);
        Self { database, mapping }
    }

    /// Property mappings of a table; synthesized from its columns when the
    /// mapping has no entry for it.
    pub fn properties_of(&self, table: &ObjectName) -> Vec<PropertyMapping> {
        if let Some(mapping) = self.mapping.table(table)
            && !mapping.properties.is_empty()
        {
            return mapping.properties.clone();
        }
        self.database
            .table(table)
            .map(|t| {
                t.columns
                    .iter()
                    .map(|c| PropertyMapping {
                        entity: String::new(),
                        property: c.name.clone(),
                        column: c.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn entity_types_of(&self, table: &ObjectName) -> &[String] {
        self.mapping
            .table(table)
            .map(|t| t.entity_types.as_slice())
            .unwrap_or(&[])
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
