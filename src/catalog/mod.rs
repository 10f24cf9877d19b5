//! Physical database model: tables, columns, keys, indexes and sequences.
//!
//! A `Database` is a plain value. It is built from a logical model by
//! [`builder::DatabaseBuilder`], changed only through its add/remove
//! methods (which [`modifier`] drives from migration operations), and
//! compared with [`Database::is_equivalent`].

use crate::error::{ModelError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod annotations;
pub mod builder;
pub mod constraint;
pub mod id;
pub mod index;
pub mod mapping;
pub mod modifier;
pub mod sequence;
pub mod table;

pub use annotations::{Annotated, Annotations};
pub use constraint::{ForeignKey, PrimaryKey, ReferentialAction, UniqueConstraint};
pub use id::{DbObjectId, ObjectName};
pub use index::Index;
pub use mapping::{Mapping, Projection, PropertyMapping, TableMapping};
pub use sequence::Sequence;
pub use table::{Column, ColumnDefault, Table};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<Sequence>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.sequences.is_empty()
    }

    pub fn table(&self, name: &ObjectName) -> Option<&Table> {
        self.tables.iter().find(|t| &t.name == name)
    }

    pub fn table_mut(&mut self, name: &ObjectName) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| &t.name == name)
    }

    pub fn require_table(&self, name: &ObjectName) -> Result<&Table> {
        self.table(name)
            .ok_or_else(|| ModelError::not_found("table", name))
    }

    pub fn require_table_mut(&mut self, name: &ObjectName) -> Result<&mut Table> {
        self.table_mut(name)
            .ok_or_else(|| ModelError::not_found("table", name))
    }

    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if table.name.name.is_empty() {
            return Err(ModelError::EmptyName { kind: "table" });
        }
        if self.table(&table.name).is_some() {
            return Err(ModelError::duplicate("table", &table.name));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn remove_table(&mut self, name: &ObjectName) -> Result<Table> {
        let position = self
            .tables
            .iter()
            .position(|t| &t.name == name)
            .ok_or_else(|| ModelError::not_found("table", name))?;
        Ok(self.tables.remove(position))
    }

    pub fn sequence(&self, name: &ObjectName) -> Option<&Sequence> {
        self.sequences.iter().find(|s| &s.name == name)
    }

    pub fn sequence_mut(&mut self, name: &ObjectName) -> Option<&mut Sequence> {
        self.sequences.iter_mut().find(|s| &s.name == name)
    }

    pub fn add_sequence(&mut self, sequence: Sequence) -> Result<()> {
        if sequence.name.name.is_empty() {
            return Err(ModelError::EmptyName { kind: "sequence" });
        }
        if self.sequence(&sequence.name).is_some() {
            return Err(ModelError::duplicate("sequence", &sequence.name));
        }
        self.sequences.push(sequence);
        Ok(())
    }

    pub fn remove_sequence(&mut self, name: &ObjectName) -> Result<Sequence> {
        let position = self
            .sequences
            .iter()
            .position(|s| &s.name == name)
            .ok_or_else(|| ModelError::not_found("sequence", name))?;
        Ok(self.sequences.remove(position))
    }

    /// Foreign keys of *other* tables whose principal is `table`, as
    /// `(owning table, foreign key name)`.
    pub fn foreign_keys_referencing(&self, table: &ObjectName) -> Vec<(ObjectName, String)> {
        self.tables
            .iter()
            .filter(|t| &t.name != table)
            .flat_map(|t| {
                t.foreign_keys
                    .iter()
                    .filter(|fk| &fk.principal_table == table)
                    .map(|fk| (t.name.clone(), fk.name.clone()))
            })
            .collect()
    }

    /// Structural equality that ignores declaration order everywhere,
    /// including column order. Table annotations are only read when a table
    /// is created, so they are not compared either.
    pub fn is_equivalent(&self, other: &Database) -> bool {
        normalized(self) == normalized(other)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

fn normalized(database: &Database) -> Database {
    let tables = database
        .tables
        .iter()
        .cloned()
        .map(|mut table| {
            table.columns.sort_by(|a, b| a.name.cmp(&b.name));
            table.unique_constraints.sort_by(|a, b| a.name.cmp(&b.name));
            table.foreign_keys.sort_by(|a, b| a.name.cmp(&b.name));
            table.indexes.sort_by(|a, b| a.name.cmp(&b.name));
            table.annotations = Annotations::new();
            table
        })
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect();
    let sequences = database
        .sequences
        .iter()
        .cloned()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect();
    Database { tables, sequences }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClrType;

    fn table(name: &str) -> Table {
        let mut table = Table::new(ObjectName::from(name));
        table.add_column(Column::new("Id", ClrType::Int32)).unwrap();
        table
    }

    #[test]
    fn test_table_names_are_unique() {
        let mut db = Database::new();
        db.add_table(table("dbo.T")).unwrap();
        db.add_table(table("other.T")).unwrap();
        assert!(db.add_table(table("dbo.T")).is_err());
    }

    #[test]
    fn test_remove_missing_table_fails() {
        let mut db = Database::new();
        let err = db.remove_table(&ObjectName::from("dbo.T")).unwrap_err();
        assert_eq!(err, ModelError::not_found("table", "dbo.T"));
    }

    #[test]
    fn test_equivalence_ignores_table_order() {
        let mut a = Database::new();
        a.add_table(table("A")).unwrap();
        a.add_table(table("B")).unwrap();
        let mut b = Database::new();
        b.add_table(table("B")).unwrap();
        b.add_table(table("A")).unwrap();
        assert!(a.is_equivalent(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_equivalence_ignores_column_order() {
        let mut first = table("A");
        first.add_column(Column::new("X", ClrType::Int32)).unwrap();
        first.add_column(Column::new("Y", ClrType::Int32)).unwrap();
        let mut second = table("A");
        second.add_column(Column::new("Y", ClrType::Int32)).unwrap();
        second.add_column(Column::new("X", ClrType::Int32)).unwrap();

        let a = Database {
            tables: vec![first],
            sequences: vec![],
        };
        let b = Database {
            tables: vec![second],
            sequences: vec![],
        };
        assert!(a.is_equivalent(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut db = Database::new();
        let mut t = table("dbo.T");
        t.add_column(Column::new("Name", ClrType::String).with_default_sql("''"))
            .unwrap();
        t.set_primary_key(PrimaryKey::new("PK_T", vec!["Id".to_string()]))
            .unwrap();
        db.add_table(t).unwrap();
        db.add_sequence(Sequence::new(ObjectName::from("dbo.S")))
            .unwrap();

        let yaml = db.to_yaml().unwrap();
        assert_eq!(Database::from_yaml(&yaml).unwrap(), db);
    }
}
