// Temporary names used to break rename cycles
pub const TEMP_NAME_PREFIX: &str = "__mig_tmp__";

// Minimum share of common properties for two tables to be paired without a name match
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

// Configuration file name
pub const CONFIG_FILENAME: &str = "modeldiff.yaml";

// Migration file naming conventions
pub const MIGRATION_ID_FORMAT: &str = "%Y%m%d%H%M%S";
pub const MIGRATION_FILE_EXTENSION: &str = "rs";
pub const SNAPSHOT_FILENAME: &str = "model_snapshot.yaml";

// Annotation keys understood by the SQL generators
pub const CLUSTERED_ANNOTATION: &str = "Relational:Clustered";

// Column that tells entity types apart in a table shared by a hierarchy
pub const DISCRIMINATOR_COLUMN: &str = "Discriminator";
