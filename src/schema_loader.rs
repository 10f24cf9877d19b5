use crate::model::Model;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads a logical model from a single YAML file or from every `.yaml` /
/// `.yml` file below a directory.
pub struct SchemaLoader {
    path: PathBuf,
}

impl SchemaLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Model> {
        if self.path.is_dir() {
            self.load_directory()
        } else if self.path.is_file() {
            load_model_file(&self.path)
        } else {
            bail!("Model path does not exist: {}", self.path.display())
        }
    }

    /// Files are merged in path order, so the first file that names a
    /// default schema decides it.
    fn load_directory(&self) -> Result<Model> {
        let mut files = Vec::new();
        discover_model_files(&self.path, &mut files)?;
        files.sort();

        let mut model = Model::new();
        for file in &files {
            model.extend(load_model_file(file)?);
        }
        debug!(
            "Loaded {} entity type(s) from {} file(s) in {}",
            model.entity_types.len(),
            files.len(),
            self.path.display()
        );
        Ok(model)
    }
}

/// Convenience for [`SchemaLoader::load`].
pub fn load_model(path: &Path) -> Result<Model> {
    SchemaLoader::new(path).load()
}

fn load_model_file(path: &Path) -> Result<Model> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Model::new());
    }
    Model::from_yaml(&content)
        .with_context(|| format!("Failed to parse model file: {}", path.display()))
}

fn discover_model_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            discover_model_files(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, relative_path: &str, content: &str) {
        let path = dir.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    const BLOGS: &str = r#"
default_schema: dbo
entity_types:
  - name: Blog
    properties:
      - name: Id
        type: int32
      - name: Url
        type: string
        max_length: 200
    key:
      properties: [Id]
"#;

    const POSTS: &str = r#"
entity_types:
  - name: Post
    properties:
      - name: Id
        type: int32
      - name: BlogId
        type: int32
    key:
      properties: [Id]
    foreign_keys:
      - principal: Blog
        properties: [BlogId]
"#;

    #[test]
    fn test_single_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "blogs.yaml", BLOGS);

        let model = load_model(&dir.path().join("blogs.yaml")).unwrap();

        assert_eq!(model.default_schema.as_deref(), Some("dbo"));
        assert_eq!(model.entity_types.len(), 1);
        assert_eq!(model.entity_types[0].properties[1].max_length, Some(200));
    }

    #[test]
    fn test_directory_merges_files_in_path_order() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b/posts.yml", POSTS);
        write_file(dir.path(), "a_blogs.yaml", BLOGS);
        write_file(dir.path(), "notes.txt", "not a model");
        write_file(dir.path(), "empty.yaml", "");

        let model = load_model(dir.path()).unwrap();

        let names: Vec<_> = model.entity_types.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Blog", "Post"]);
        assert_eq!(model.default_schema.as_deref(), Some("dbo"));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = load_model(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_yaml_names_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "broken.yaml", "entity_types: [");

        let err = load_model(&dir.path().join("broken.yaml")).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}
