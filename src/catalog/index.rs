use super::annotations::Annotations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl Index {
    pub fn new(name: &str, columns: Vec<String>, unique: bool) -> Self {
        Self {
            name: name.to_string(),
            columns,
            unique,
            annotations: Annotations::new(),
        }
    }

    pub fn is_clustered(&self) -> bool {
        self.annotations.clustered().unwrap_or(false)
    }
}
