use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            dialect: self.dialect.merge(other.dialect),
            directories: match (self.directories, other.directories) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
            objects: match (self.objects, other.objects) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
            migration: match (self.migration, other.migration) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
            output: self.output.merge(other.output),
        }
    }
}

// Field-wise merges for sections that both sources commonly set
impl DirectoriesInput {
    pub fn merge_with(self, other: DirectoriesInput) -> DirectoriesInput {
        DirectoriesInput {
            models: other.models.or(self.models),
            migrations: other.migrations.or(self.migrations),
            snapshot_file: other.snapshot_file.or(self.snapshot_file),
        }
    }
}

impl ObjectsInput {
    pub fn merge_with(self, other: ObjectsInput) -> ObjectsInput {
        ObjectsInput {
            include: other.include.or(self.include),
            exclude: other.exclude.or(self.exclude),
        }
    }
}

impl MigrationInput {
    pub fn merge_with(self, other: MigrationInput) -> MigrationInput {
        MigrationInput {
            default_schema: other.default_schema.or(self.default_schema),
            fuzzy_threshold: other.fuzzy_threshold.or(self.fuzzy_threshold),
            temp_name_prefix: other.temp_name_prefix.or(self.temp_name_prefix),
        }
    }
}
