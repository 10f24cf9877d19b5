use crate::config::{merge::Merge, types::*};
use crate::render::Dialect;
use anyhow::{Result, anyhow};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            dialect: self.resolve_dialect(defaults.dialect)?,
            directories: self.resolve_directories(&defaults.directories),
            objects: self.resolve_objects(&defaults.objects),
            migration: self.resolve_migration(&defaults.migration)?,
            output: self.resolve_output(&defaults.output)?,
        })
    }

    fn resolve_dialect(&self, default: Dialect) -> Result<Dialect> {
        match &self.config_input.dialect {
            Some(dialect) => dialect.parse().map_err(|e: String| anyhow!(e)),
            None => Ok(default),
        }
    }

    fn resolve_directories(&self, defaults: &Directories) -> Directories {
        let dir_input = self.config_input.directories.as_ref();

        Directories {
            models: dir_input
                .and_then(|d| d.models.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.models.clone()),
            migrations: dir_input
                .and_then(|d| d.migrations.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.migrations.clone()),
            snapshot_file: dir_input
                .and_then(|d| d.snapshot_file.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.snapshot_file.clone()),
        }
    }

    fn resolve_objects(&self, defaults: &Objects) -> Objects {
        let obj_input = self.config_input.objects.as_ref();

        let patterns = |input: Option<&ObjectPatternsInput>, defaults: &ObjectPatterns| {
            input
                .map(|p| ObjectPatterns {
                    schemas: p
                        .schemas
                        .as_ref()
                        .cloned()
                        .unwrap_or_else(|| defaults.schemas.clone()),
                    tables: p
                        .tables
                        .as_ref()
                        .cloned()
                        .unwrap_or_else(|| defaults.tables.clone()),
                })
                .unwrap_or_else(|| defaults.clone())
        };

        Objects {
            include: patterns(obj_input.and_then(|o| o.include.as_ref()), &defaults.include),
            exclude: patterns(obj_input.and_then(|o| o.exclude.as_ref()), &defaults.exclude),
        }
    }

    fn resolve_migration(&self, defaults: &Migration) -> Result<Migration> {
        let mig_input = self.config_input.migration.as_ref();

        let fuzzy_threshold = mig_input
            .and_then(|m| m.fuzzy_threshold)
            .unwrap_or(defaults.fuzzy_threshold);
        if !(fuzzy_threshold > 0.0 && fuzzy_threshold <= 1.0) {
            return Err(anyhow!(
                "migration.fuzzy_threshold must be greater than 0 and at most 1, got {}",
                fuzzy_threshold
            ));
        }

        let temp_name_prefix = mig_input
            .and_then(|m| m.temp_name_prefix.as_ref())
            .cloned()
            .unwrap_or_else(|| defaults.temp_name_prefix.clone());
        if temp_name_prefix.is_empty() {
            return Err(anyhow!("migration.temp_name_prefix must not be empty"));
        }

        Ok(Migration {
            default_schema: mig_input
                .and_then(|m| m.default_schema.as_ref())
                .cloned()
                .or_else(|| defaults.default_schema.clone()),
            fuzzy_threshold,
            temp_name_prefix,
        })
    }

    fn resolve_output(&self, defaults: &Output) -> Result<Output> {
        let format = match self
            .config_input
            .output
            .as_ref()
            .and_then(|o| o.format.as_ref())
        {
            Some(format) => format.parse().map_err(|e: String| anyhow!(e))?,
            None => defaults.format,
        };
        Ok(Output { format })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
