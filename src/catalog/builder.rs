//! Projects a logical [`Model`] onto tables, columns, keys, indexes and
//! foreign keys.

use super::mapping::{Mapping, Projection, PropertyMapping, TableMapping};
use super::{
    Column, Database, ForeignKey, Index, ObjectName, PrimaryKey, Sequence, Table,
    UniqueConstraint,
};
use crate::catalog::sequence::DEFAULT_SEQUENCE_TYPE;
use crate::constants::DISCRIMINATOR_COLUMN;
use crate::error::Result;
use crate::model::{ClrType, EntityType, Model, Property};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct DatabaseBuilder<'a> {
    model: &'a Model,
}

/// Entity types grouped by the table they map to, in first-seen order.
struct TableGroup<'a> {
    name: ObjectName,
    entities: Vec<&'a EntityType>,
}

impl<'a> DatabaseBuilder<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Builds the physical database for a model.
    pub fn build(model: &Model) -> Result<Database> {
        Ok(Self::project(model)?.database)
    }

    /// Builds the physical database and the property mapping used for it.
    pub fn project(model: &Model) -> Result<Projection> {
        DatabaseBuilder::new(model).run()
    }

    fn run(&self) -> Result<Projection> {
        self.model.validate()?;

        let groups = self.group_by_table()?;
        let mut database = Database::new();
        let mut mapping = Mapping::default();

        for group in &groups {
            let (table, table_mapping) = self.build_table(group)?;
            debug!(
                "Projected {} entity type(s) onto table {}",
                group.entities.len(),
                table.name
            );
            database.add_table(table)?;
            mapping.tables.push(table_mapping);
        }

        for group in &groups {
            for entity in &group.entities {
                for fk in &entity.foreign_keys {
                    self.add_foreign_key(&mut database, &group.name, entity, fk)?;
                }
            }
        }

        for decl in &self.model.sequences {
            let schema = decl
                .schema
                .as_deref()
                .or(self.model.default_schema.as_deref());
            let mut sequence = Sequence::new(ObjectName::try_new(schema, &decl.name)?);
            sequence.type_name = decl
                .type_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SEQUENCE_TYPE.to_string());
            sequence.start_value = decl.start_value.unwrap_or(1);
            sequence.increment_by = decl.increment_by.unwrap_or(1);
            database.add_sequence(sequence)?;
        }

        Ok(Projection { database, mapping })
    }

    fn group_by_table(&self) -> Result<Vec<TableGroup<'a>>> {
        let mut groups: Vec<TableGroup<'a>> = Vec::new();
        for entity in &self.model.entity_types {
            let (schema, table) = self.model.table_of(entity)?;
            let name = ObjectName::try_new(schema.as_deref(), &table)?;
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => group.entities.push(entity),
                None => groups.push(TableGroup {
                    name,
                    entities: vec![entity],
                }),
            }
        }
        Ok(groups)
    }

    fn column_names(&self, entity: &EntityType, properties: &[String]) -> Result<Vec<String>> {
        properties
            .iter()
            .map(|name| {
                self.model
                    .find_property(entity, name)
                    .map(|p| p.column_name().to_string())
            })
            .collect()
    }

    fn build_table(&self, group: &TableGroup<'a>) -> Result<(Table, TableMapping)> {
        let mut table = Table::new(group.name.clone());
        let mut table_mapping = TableMapping::new(group.name.clone());
        let mut owners: HashMap<String, HashSet<&str>> = HashMap::new();

        for entity in &group.entities {
            table_mapping.entity_types.push(entity.name.clone());
            for (name, value) in entity.annotations.iter() {
                table.annotations.set(name, value.clone());
            }

            for property in self.model.all_properties(entity)? {
                let column_name = property.column_name();
                if !table.has_column(column_name) {
                    table.add_column(column_for(property))?;
                }
                owners
                    .entry(column_name.to_string())
                    .or_default()
                    .insert(entity.name.as_str());

                let already_mapped = table_mapping
                    .properties
                    .iter()
                    .any(|m| m.property == property.name && m.column == column_name);
                if !already_mapped {
                    table_mapping.properties.push(PropertyMapping {
                        entity: entity.name.clone(),
                        property: property.name.clone(),
                        column: column_name.to_string(),
                    });
                }
            }
        }

        for entity in &group.entities {
            if let Some(key) = self.model.primary_key(entity)? {
                let columns = self.column_names(entity, &key.properties)?;
                let name = key
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("PK_{}", group.name.name));
                let mut primary_key = PrimaryKey::new(&name, columns);
                primary_key.annotations = key.annotations.clone();
                table.set_primary_key(primary_key)?;
                break;
            }
        }

        // Columns not shared by every entity in a hierarchy hold no value
        // for the other entity types.
        let key_columns = table
            .primary_key
            .as_ref()
            .map(|pk| pk.columns.clone())
            .unwrap_or_default();
        for column in &mut table.columns {
            if key_columns.contains(&column.name) {
                column.nullable = false;
            } else if group.entities.len() > 1
                && owners
                    .get(&column.name)
                    .is_some_and(|o| o.len() < group.entities.len())
            {
                column.nullable = true;
            }
        }

        if group.entities.len() > 1 && !table.has_column(DISCRIMINATOR_COLUMN) {
            table.add_column(
                Column::new(DISCRIMINATOR_COLUMN, ClrType::String)
                    .with_nullable(false)
                    .with_default_value(""),
            )?;
        }

        for entity in &group.entities {
            for key in &entity.alternate_keys {
                let columns = self.column_names(entity, &key.properties)?;
                let name = key
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("AK_{}_{}", group.name.name, columns.join("_")));
                let mut unique = UniqueConstraint::new(&name, columns);
                unique.annotations = key.annotations.clone();
                if table.unique_constraint(&name) != Some(&unique) {
                    table.add_unique_constraint(unique)?;
                }
            }

            for decl in &entity.indexes {
                let columns = self.column_names(entity, &decl.properties)?;
                let name = decl
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("IX_{}_{}", group.name.name, columns.join("_")));
                let mut index = Index::new(&name, columns, decl.unique);
                index.annotations = decl.annotations.clone();
                if table.index(&name) != Some(&index) {
                    table.add_index(index)?;
                }
            }
        }

        Ok((table, table_mapping))
    }

    fn add_foreign_key(
        &self,
        database: &mut Database,
        table_name: &ObjectName,
        entity: &EntityType,
        decl: &crate::model::ForeignKeyDecl,
    ) -> Result<()> {
        let principal = self.model.require_entity(&decl.principal)?;
        let (schema, principal_table) = self.model.table_of(principal)?;
        let principal_table = ObjectName::try_new(schema.as_deref(), &principal_table)?;

        let principal_properties = match &decl.principal_properties {
            Some(properties) => properties.clone(),
            None => self
                .model
                .primary_key(principal)?
                .map(|k| k.properties.clone())
                .unwrap_or_default(),
        };
        let columns = self.column_names(entity, &decl.properties)?;
        let principal_columns = self.column_names(principal, &principal_properties)?;

        let name = decl.name.clone().unwrap_or_else(|| {
            format!(
                "FK_{}_{}_{}",
                table_name.name,
                principal_table.name,
                columns.join("_")
            )
        });
        let mut foreign_key = ForeignKey::new(
            &name,
            columns,
            principal_table.clone(),
            principal_columns.clone(),
        )?;
        foreign_key.on_delete = decl.on_delete;
        foreign_key.on_update = decl.on_update;
        foreign_key.annotations = decl.annotations.clone();

        // A relationship to something other than the primary key needs an
        // alternate key on the principal.
        let principal = database.require_table_mut(&principal_table)?;
        if !principal.has_key_on(&principal_columns) {
            let key_name = format!("AK_{}_{}", principal_table.name, principal_columns.join("_"));
            debug!("Adding alternate key {} for {}", key_name, name);
            principal.add_unique_constraint(UniqueConstraint::new(&key_name, principal_columns))?;
        }

        let table = database.require_table_mut(table_name)?;
        if table.foreign_key(&name) != Some(&foreign_key) {
            table.add_foreign_key(foreign_key)?;
        }
        Ok(())
    }
}

fn column_for(property: &Property) -> Column {
    let mut column = Column::new(property.column_name(), property.clr_type.clone());
    if let Some(nullable) = property.nullable {
        column.nullable = nullable;
    }
    column.max_length = property.max_length;
    column.precision = property.precision;
    column.scale = property.scale;
    column.fixed_length = property.fixed_length;
    column.unicode = property.unicode;
    if let Some(value) = &property.default_value {
        column.set_default_value(value.clone());
    }
    if let Some(sql) = &property.default_sql {
        column.set_default_sql(sql);
    }
    column.computed_sql = property.computed_sql.clone();
    column.store_type = property.store_type.clone();
    column.value_generated = property.value_generated;
    column.concurrency_token = property.concurrency_token;
    column.annotations = property.annotations.clone();
    column
}
