use crate::render::Dialect;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub dialect: Option<String>,
    pub directories: Option<DirectoriesInput>,
    pub objects: Option<ObjectsInput>,
    pub migration: Option<MigrationInput>,
    pub output: Option<OutputInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    pub dialect: Dialect,
    pub directories: Directories,
    pub objects: Objects,
    pub migration: Migration,
    pub output: Output,
}

// Directory configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoriesInput {
    pub models: Option<String>,
    pub migrations: Option<String>,
    pub snapshot_file: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Directories {
    pub models: String,
    pub migrations: String,
    pub snapshot_file: String,
}

impl Directories {
    pub fn models_path(&self, root: &Path) -> PathBuf {
        root.join(&self.models)
    }

    pub fn migrations_path(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations)
    }

    /// The snapshot lives inside the migrations directory.
    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.migrations_path(root).join(&self.snapshot_file)
    }
}

// Object filtering configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectsInput {
    pub include: Option<ObjectPatternsInput>,
    pub exclude: Option<ObjectPatternsInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectPatternsInput {
    pub schemas: Option<Vec<String>>,
    pub tables: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Objects {
    pub include: ObjectPatterns,
    pub exclude: ObjectPatterns,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectPatterns {
    pub schemas: Vec<String>,
    pub tables: Vec<String>,
}

// Migration configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationInput {
    pub default_schema: Option<String>,
    pub fuzzy_threshold: Option<f64>,
    pub temp_name_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Migration {
    pub default_schema: Option<String>,
    pub fuzzy_threshold: f64,
    pub temp_name_prefix: String,
}

// Output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputInput {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Output {
    pub format: OutputFormat,
}

/// How `diff`, `create` and `drop` print operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// SQL script for the configured dialect
    #[default]
    Sql,
    /// Rust statements against a migration builder
    Code,
    /// One colored line per operation
    Summary,
    /// Operations as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Sql => "sql",
            OutputFormat::Code => "code",
            OutputFormat::Summary => "summary",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(OutputFormat::Sql),
            "code" => Ok(OutputFormat::Code),
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}', expected one of: sql, code, summary, json",
                other
            )),
        }
    }
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DirectoryArgs {
    #[arg(long, help = "Models directory or file")]
    pub models_dir: Option<String>,

    #[arg(long, help = "Migrations directory path")]
    pub migrations_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ObjectFilterArgs {
    #[arg(long, help = "Include only these schemas (glob patterns)")]
    pub schemas: Option<Vec<String>>,

    #[arg(long, help = "Include only these tables (glob patterns)")]
    pub tables: Option<Vec<String>>,

    #[arg(long, help = "Exclude these schemas (glob patterns)")]
    pub exclude_schemas: Option<Vec<String>>,

    #[arg(long, help = "Exclude these tables (glob patterns)")]
    pub exclude_tables: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct MigrationArgs {
    #[arg(long, help = "Schema for tables and sequences that name none")]
    pub default_schema: Option<String>,

    #[arg(long, help = "Minimum property overlap for pairing renamed tables")]
    pub fuzzy_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    #[arg(long, value_enum, help = "Output format")]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum, help = "SQL dialect")]
    pub dialect: Option<Dialect>,
}

// Conversion functions from CLI args to config input
impl From<DirectoryArgs> for DirectoriesInput {
    fn from(args: DirectoryArgs) -> Self {
        Self {
            models: args.models_dir,
            migrations: args.migrations_dir,
            snapshot_file: None, // Snapshot file name comes from file only
        }
    }
}

impl From<ObjectFilterArgs> for ObjectsInput {
    fn from(args: ObjectFilterArgs) -> Self {
        let include = if args.schemas.is_some() || args.tables.is_some() {
            Some(ObjectPatternsInput {
                schemas: args.schemas,
                tables: args.tables,
            })
        } else {
            None
        };

        let exclude = if args.exclude_schemas.is_some() || args.exclude_tables.is_some() {
            Some(ObjectPatternsInput {
                schemas: args.exclude_schemas,
                tables: args.exclude_tables,
            })
        } else {
            None
        };

        Self { include, exclude }
    }
}

impl From<MigrationArgs> for MigrationInput {
    fn from(args: MigrationArgs) -> Self {
        Self {
            default_schema: args.default_schema,
            fuzzy_threshold: args.fuzzy_threshold,
            temp_name_prefix: None,
        }
    }
}

impl From<OutputArgs> for ConfigInput {
    fn from(args: OutputArgs) -> Self {
        Self {
            dialect: args.dialect.map(|d| d.to_string()),
            output: args.format.map(|f| OutputInput {
                format: Some(f.to_string()),
            }),
            ..Default::default()
        }
    }
}
