use crate::config::types::*;
use crate::constants::{FUZZY_MATCH_THRESHOLD, SNAPSHOT_FILENAME, TEMP_NAME_PREFIX};

// Config, Objects and Output derive Default

impl Default for Directories {
    fn default() -> Self {
        Self {
            models: "models".to_string(),
            migrations: "migrations".to_string(),
            snapshot_file: SNAPSHOT_FILENAME.to_string(),
        }
    }
}

impl Default for Migration {
    fn default() -> Self {
        Self {
            default_schema: None,
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            temp_name_prefix: TEMP_NAME_PREFIX.to_string(),
        }
    }
}
