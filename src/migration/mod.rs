//! Incremental migrations: diff the last snapshot against the current model,
//! generate an `up`/`down` module and advance the snapshot.

use crate::catalog::builder::DatabaseBuilder;
use crate::catalog::{Projection, modifier};
use crate::codegen::MigrationCodeGenerator;
use crate::constants::{MIGRATION_FILE_EXTENSION, MIGRATION_ID_FORMAT, SNAPSHOT_FILENAME};
use crate::diff::ModelDiffer;
use crate::diff::operations::MigrationOperation;
use crate::error::Result;
use crate::model::Model;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The database a migration history has produced so far, with the mapping of
/// the model it was last scaffolded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSnapshot {
    pub projection: Projection,
}

impl ModelSnapshot {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    pub fn from_model(model: &Model) -> Result<Self> {
        Ok(Self::new(DatabaseBuilder::project(model)?))
    }

    pub fn to_yaml(&self) -> Result<String> {
        self.projection.to_yaml()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(Self::new(Projection::from_yaml(yaml)?))
    }

    /// Reads a snapshot file; `None` when no migration has been scaffolded yet.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot = Self::from_yaml(&yaml)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(Some(snapshot))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScaffoldedMigration {
    pub id: String,
    pub name: String,
    pub up: Vec<MigrationOperation>,
    pub down: Vec<MigrationOperation>,
    pub code: String,
    pub snapshot: ModelSnapshot,
}

impl ScaffoldedMigration {
    pub fn has_changes(&self) -> bool {
        !self.up.is_empty()
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, MIGRATION_FILE_EXTENSION)
    }

    /// Writes `<id>.rs` into `dir` and replaces the snapshot next to it.
    /// Returns the path of the migration file.
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        self.write_with_snapshot(dir, &dir.join(SNAPSHOT_FILENAME))
    }

    pub fn write_with_snapshot(&self, dir: &Path, snapshot_path: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let migration_path = dir.join(self.file_name());
        std::fs::write(&migration_path, &self.code)
            .with_context(|| format!("Failed to write migration {}", migration_path.display()))?;
        info!("Wrote migration {}", migration_path.display());

        self.snapshot.save(snapshot_path)?;
        info!("Wrote snapshot {}", snapshot_path.display());

        Ok(migration_path)
    }
}

#[derive(Debug, Default)]
pub struct MigrationScaffolder {
    differ: ModelDiffer,
    code_generator: MigrationCodeGenerator,
}

impl MigrationScaffolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_differ(differ: ModelDiffer) -> Self {
        Self {
            differ,
            code_generator: MigrationCodeGenerator::new(),
        }
    }

    pub fn scaffold(
        &self,
        name: &str,
        previous: Option<&ModelSnapshot>,
        target: &Model,
    ) -> Result<ScaffoldedMigration> {
        let target = DatabaseBuilder::project(target)?;
        self.scaffold_projection(name, previous, target, Utc::now())
    }

    /// Scaffolds against an already projected target, stamping the
    /// migration with `timestamp`.
    pub fn scaffold_projection(
        &self,
        name: &str,
        previous: Option<&ModelSnapshot>,
        target: Projection,
        timestamp: DateTime<Utc>,
    ) -> Result<ScaffoldedMigration> {
        let empty = ModelSnapshot::default();
        let previous = previous.unwrap_or(&empty);

        let up = self
            .differ
            .diff_projections(&previous.projection, &target);
        let down = self
            .differ
            .diff_projections(&target, &previous.projection);

        let id = migration_id(timestamp, name);
        let code = self.code_generator.generate_migration(&id, &up, &down);

        let database = modifier::apply_all(previous.projection.database.clone(), &up)?;
        if !database.is_equivalent(&target.database) {
            warn!(
                "Replaying migration {} does not reproduce the target model; the snapshot follows the replayed database",
                id
            );
        }
        let snapshot = ModelSnapshot::new(Projection {
            database,
            mapping: target.mapping,
        });

        info!(
            "Scaffolded migration {} with {} up and {} down operation(s)",
            id,
            up.len(),
            down.len()
        );

        Ok(ScaffoldedMigration {
            id,
            name: sanitize_name(name),
            up,
            down,
            code,
            snapshot,
        })
    }
}

/// `YYYYMMDDHHMMSS_<name>`
pub fn migration_id(timestamp: DateTime<Utc>, name: &str) -> String {
    format!(
        "{}_{}",
        timestamp.format(MIGRATION_ID_FORMAT),
        sanitize_name(name)
    )
}

/// Keeps alphanumerics and collapses everything else into single underscores.
pub fn sanitize_name(name: &str) -> String {
    let mut result = String::new();
    let mut last_was_underscore = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            result.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            result.push('_');
            last_was_underscore = true;
        }
    }

    result.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClrType;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    fn blog_model() -> Model {
        let mut model = Model::new().with_default_schema("dbo");
        model.entity("Blog", |e| {
            e.property("Id", ClrType::Int32);
            e.property("Url", ClrType::String);
            e.key(&["Id"]);
        });
        model
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("add_blogs"), "add_blogs");
        assert_eq!(sanitize_name("add blogs!"), "add_blogs");
        assert_eq!(sanitize_name("__rename--posts__"), "rename_posts");
    }

    #[test]
    fn test_migration_id() {
        assert_eq!(
            migration_id(timestamp(), "Add blogs"),
            "20240305140709_Add_blogs"
        );
    }

    #[test]
    fn test_first_migration_creates_everything() {
        let target = DatabaseBuilder::project(&blog_model()).unwrap();
        let migration = MigrationScaffolder::new()
            .scaffold_projection("initial", None, target.clone(), timestamp())
            .unwrap();

        assert_eq!(migration.id, "20240305140709_initial");
        assert!(migration.has_changes());
        assert!(matches!(migration.up[0], MigrationOperation::CreateTable(_)));
        assert!(matches!(migration.down[0], MigrationOperation::DropTable(_)));
        assert!(migration.snapshot.projection.database.is_equivalent(&target.database));
        assert_eq!(migration.snapshot.projection.mapping, target.mapping);
        assert!(migration.code.contains("pub const ID: &str = \"20240305140709_initial\";"));
    }

    #[test]
    fn test_unchanged_model_scaffolds_empty_migration() {
        let snapshot = ModelSnapshot::from_model(&blog_model()).unwrap();
        let target = DatabaseBuilder::project(&blog_model()).unwrap();
        let migration = MigrationScaffolder::new()
            .scaffold_projection("noop", Some(&snapshot), target, timestamp())
            .unwrap();

        assert!(!migration.has_changes());
        assert!(migration.down.is_empty());
        assert_eq!(migration.snapshot, snapshot);
    }

    #[test]
    fn test_write_to_persists_code_and_snapshot() {
        let dir = TempDir::new().unwrap();
        let target = DatabaseBuilder::project(&blog_model()).unwrap();
        let migration = MigrationScaffolder::new()
            .scaffold_projection("initial", None, target, timestamp())
            .unwrap();

        let path = migration.write_to(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("20240305140709_initial.rs"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), migration.code);
        let loaded = ModelSnapshot::load(&dir.path().join(SNAPSHOT_FILENAME))
            .unwrap()
            .unwrap();
        assert_eq!(loaded, migration.snapshot);
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let loaded = ModelSnapshot::load(&dir.path().join(SNAPSHOT_FILENAME)).unwrap();
        assert!(loaded.is_none());
    }
}
