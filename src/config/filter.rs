use crate::catalog::{ObjectName, Projection};
use crate::config::types::{ObjectPatterns, Objects};
use glob::Pattern;
use tracing::debug;

/// Object filter for determining which tables and sequences take part in a diff
pub struct ObjectFilter {
    include: ObjectPatterns,
    exclude: ObjectPatterns,
}

impl ObjectFilter {
    /// Create a new object filter from configuration
    pub fn new(config: &Objects) -> Self {
        Self {
            include: config.include.clone(),
            exclude: config.exclude.clone(),
        }
    }

    /// Check if a schema should be included. Unqualified objects are matched
    /// with an empty schema name.
    pub fn should_include_schema(&self, schema_name: &str) -> bool {
        if self.matches_patterns(&self.exclude.schemas, schema_name) {
            return false;
        }

        if !self.include.schemas.is_empty() {
            return self.matches_patterns(&self.include.schemas, schema_name);
        }

        true
    }

    /// Check if a table should be included
    pub fn should_include_table(&self, name: &ObjectName) -> bool {
        if !self.should_include_schema(name.schema().unwrap_or_default()) {
            return false;
        }

        if self.matches_patterns(&self.exclude.tables, &name.name) {
            return false;
        }

        if !self.include.tables.is_empty() {
            return self.matches_patterns(&self.include.tables, &name.name);
        }

        true
    }

    /// Apply filter to a projection, removing filtered tables, the foreign
    /// keys that point at them, and sequences in filtered schemas
    pub fn filter_projection(&self, mut projection: Projection) -> Projection {
        let before = projection.database.tables.len();

        projection
            .database
            .tables
            .retain(|table| self.should_include_table(&table.name));

        for table in &mut projection.database.tables {
            table
                .foreign_keys
                .retain(|fk| self.should_include_table(&fk.principal_table));
        }

        projection
            .database
            .sequences
            .retain(|sequence| self.should_include_schema(sequence.name.schema().unwrap_or_default()));

        projection
            .mapping
            .tables
            .retain(|mapping| self.should_include_table(&mapping.table));

        debug!(
            "Object filter kept {} of {} table(s)",
            projection.database.tables.len(),
            before
        );
        projection
    }

    fn matches_patterns(&self, patterns: &[String], name: &str) -> bool {
        patterns.iter().any(|pattern| {
            Pattern::new(pattern)
                .map(|p| p.matches(name))
                .unwrap_or_else(|_| pattern == name)
        })
    }
}
