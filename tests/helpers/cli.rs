use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BLOGS: &str = r#"
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

pub const BLOGS_AND_POSTS: &str = r#"
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

/// A throwaway project directory the binary runs in.
pub struct CliTestHelper {
    pub temp_dir: TempDir,
}

impl CliTestHelper {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// `modeldiff` with the project directory as working directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("modeldiff").expect("binary should be built");
        cmd.current_dir(self.root());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn files_in(&self, relative_dir: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(relative_dir))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
