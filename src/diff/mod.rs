//! Model differ: computes the ordered operations that turn a database
//! matching one model into a database matching another.
//!
//! Tables are paired first (see [`matching`]), then each concern is diffed
//! on its own and its operations are filed under a [`Phase`]. The phases
//! fix the emission order so that nothing is dropped while still
//! referenced and nothing is referenced before it exists.

pub mod columns;
pub mod constraints;
pub mod indexes;
pub mod matching;
pub mod operations;
pub mod ordering;
pub mod renames;
pub mod sequences;
pub mod tables;

use crate::catalog::builder::DatabaseBuilder;
use crate::catalog::{Database, ObjectName, Projection, Table};
use crate::constants::{FUZZY_MATCH_THRESHOLD, TEMP_NAME_PREFIX};
use crate::error::Result;
use crate::model::Model;
use matching::ColumnMap;
use operations::MigrationOperation;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Minimum property overlap for pairing tables whose names differ.
    pub fuzzy_threshold: f64,
    pub temp_name_prefix: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            temp_name_prefix: TEMP_NAME_PREFIX.to_string(),
        }
    }
}

/// State scoped to one diff call.
#[derive(Debug)]
pub struct DiffSession {
    temp_name_prefix: String,
    temp_counter: usize,
}

impl DiffSession {
    pub fn new(temp_name_prefix: &str) -> Self {
        Self {
            temp_name_prefix: temp_name_prefix.to_string(),
            temp_counter: 0,
        }
    }

    pub fn next_temp_name(&mut self) -> String {
        let name = format!("{}{}", self.temp_name_prefix, self.temp_counter);
        self.temp_counter += 1;
        name
    }
}

/// Emission order of operations. Variants are declared in the order their
/// operations appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    DropForeignKeys,
    DropIndexes,
    DropPrimaryKeys,
    DropUniqueConstraints,
    DropTables,
    DropSequences,
    RenameTables,
    RenameSequences,
    ChangeSequences,
    DropColumns,
    RenameColumns,
    RenameIndexes,
    AlterColumns,
    AddColumns,
    CreateTables,
    AddPrimaryKeys,
    AddUniqueConstraints,
    AddForeignKeys,
    CreateIndexes,
}

#[derive(Debug, Default)]
pub struct Plan {
    phases: BTreeMap<Phase, Vec<MigrationOperation>>,
}

impl Plan {
    pub fn push(&mut self, phase: Phase, operation: impl Into<MigrationOperation>) {
        self.phases.entry(phase).or_default().push(operation.into());
    }

    pub fn into_operations(self) -> Vec<MigrationOperation> {
        self.phases.into_values().flatten().collect()
    }
}

/// A source table and the target table it was paired with.
#[derive(Debug)]
pub struct TablePair<'a> {
    pub source: &'a Table,
    pub target: &'a Table,
    pub columns: ColumnMap,
}

impl TablePair<'_> {
    pub fn is_renamed(&self) -> bool {
        self.source.name != self.target.name
    }
}

#[derive(Debug)]
pub struct DiffContext<'a> {
    pub source: &'a Database,
    pub target: &'a Database,
    /// Paired tables in source declaration order.
    pub pairs: Vec<TablePair<'a>>,
}

impl<'a> DiffContext<'a> {
    pub fn new(source: &'a Projection, target: &'a Projection, threshold: f64) -> Self {
        let pairs = matching::match_tables(source, target, threshold)
            .into_iter()
            .map(|m| {
                let source_table = &source.database.tables[m.source];
                let target_table = &target.database.tables[m.target];
                let columns = matching::match_columns(
                    source_table,
                    &source.properties_of(&source_table.name),
                    target_table,
                    &target.properties_of(&target_table.name),
                );
                TablePair {
                    source: source_table,
                    target: target_table,
                    columns,
                }
            })
            .collect();
        Self {
            source: &source.database,
            target: &target.database,
            pairs,
        }
    }

    pub fn pair_by_source(&self, name: &ObjectName) -> Option<&TablePair<'a>> {
        self.pairs.iter().find(|p| &p.source.name == name)
    }

    pub fn pair_by_target(&self, name: &ObjectName) -> Option<&TablePair<'a>> {
        self.pairs.iter().find(|p| &p.target.name == name)
    }

    /// Source tables with no counterpart, in source order.
    pub fn dropped_tables(&self) -> Vec<&'a Table> {
        self.source
            .tables
            .iter()
            .filter(|t| self.pair_by_source(&t.name).is_none())
            .collect()
    }

    /// Target tables with no counterpart, in target order.
    pub fn new_tables(&self) -> Vec<&'a Table> {
        self.target
            .tables
            .iter()
            .filter(|t| self.pair_by_target(&t.name).is_none())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelDiffer {
    options: DiffOptions,
}

impl ModelDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn diff(&self, source: &Model, target: &Model) -> Result<Vec<MigrationOperation>> {
        let source = DatabaseBuilder::project(source)?;
        let target = DatabaseBuilder::project(target)?;
        Ok(self.diff_projections(&source, &target))
    }

    /// Operations that build `model` from an empty database.
    pub fn create_schema(&self, model: &Model) -> Result<Vec<MigrationOperation>> {
        self.diff(&Model::new(), model)
    }

    /// Operations that remove everything `model` describes.
    pub fn drop_schema(&self, model: &Model) -> Result<Vec<MigrationOperation>> {
        self.diff(model, &Model::new())
    }

    /// Diff of two bare databases, pairing columns by name only.
    pub fn diff_databases(&self, source: &Database, target: &Database) -> Vec<MigrationOperation> {
        self.diff_projections(
            &Projection::from_database(source.clone()),
            &Projection::from_database(target.clone()),
        )
    }

    pub fn diff_projections(
        &self,
        source: &Projection,
        target: &Projection,
    ) -> Vec<MigrationOperation> {
        debug!(
            "Diffing {} source table(s) against {} target table(s)",
            source.database.tables.len(),
            target.database.tables.len()
        );
        let mut session = DiffSession::new(&self.options.temp_name_prefix);
        let context = DiffContext::new(source, target, self.options.fuzzy_threshold);
        let mut plan = Plan::default();

        tables::diff_tables(&context, &mut session, &mut plan);
        let recreated_keys = constraints::diff_keys(&context, &mut plan);
        constraints::diff_foreign_keys(&context, &recreated_keys, &mut plan);
        columns::diff_columns(&context, &mut session, &mut plan);
        indexes::diff_indexes(&context, &mut session, &mut plan);
        sequences::diff_sequences(context.source, context.target, &mut plan);

        let operations = plan.into_operations();
        info!("Diff produced {} operation(s)", operations.len());
        operations
    }
}
